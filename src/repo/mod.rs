use std::collections::BTreeSet;

use anyhow::Result;

use crate::domain::identity::UserProfile;
use crate::domain::merge_request::{Discussion, MergeRequest, ProjectId, UserId};

pub mod gitlab;
pub mod memory;

/// Read-only view of the code-review platform.
///
/// Any failing call aborts the run, so implementations report non-success
/// responses as errors instead of empty results.
pub trait ReviewPlatform {
    async fn resolve_project(&self, project: &str) -> Result<ProjectId>;
    /// Open merge requests, drafts included.
    async fn open_merge_requests(&self, project_id: ProjectId) -> Result<Vec<MergeRequest>>;
    async fn approvers(&self, project_id: ProjectId, mr_iid: u64) -> Result<BTreeSet<UserId>>;
    async fn discussions(&self, project_id: ProjectId, mr_iid: u64) -> Result<Vec<Discussion>>;
    async fn user(&self, user_id: UserId) -> Result<UserProfile>;
}
