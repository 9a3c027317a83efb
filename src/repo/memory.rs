use std::collections::{BTreeSet, HashMap};

use anyhow::{Result, anyhow};
use time::OffsetDateTime;
use time::macros::datetime;

use super::ReviewPlatform;
use crate::domain::identity::UserProfile;
use crate::domain::merge_request::{Discussion, MergeRequest, Note, ProjectId, UserId};

/// In-process review platform, used by `--demo` and the pipeline tests.
#[derive(Default)]
pub struct InMemoryPlatform {
    projects: HashMap<String, ProjectId>,
    merge_requests: HashMap<ProjectId, Vec<MergeRequest>>,
    approvals: HashMap<(ProjectId, u64), BTreeSet<UserId>>,
    discussions: HashMap<(ProjectId, u64), Vec<Discussion>>,
    users: HashMap<UserId, UserProfile>,
}

impl InMemoryPlatform {
    pub fn with_project(mut self, name: &str, id: ProjectId) -> Self {
        self.projects.insert(name.to_string(), id);
        self.merge_requests.entry(id).or_default();
        self
    }

    pub fn with_user(mut self, profile: UserProfile) -> Self {
        self.users.insert(profile.id, profile);
        self
    }

    pub fn with_merge_request(mut self, project_id: ProjectId, mr: MergeRequest) -> Self {
        self.merge_requests.entry(project_id).or_default().push(mr);
        self
    }

    pub fn with_approvals(
        mut self,
        project_id: ProjectId,
        mr_iid: u64,
        approvers: impl IntoIterator<Item = UserId>,
    ) -> Self {
        self.approvals
            .insert((project_id, mr_iid), approvers.into_iter().collect());
        self
    }

    pub fn with_discussion(
        mut self,
        project_id: ProjectId,
        mr_iid: u64,
        discussion: Discussion,
    ) -> Self {
        self.discussions
            .entry((project_id, mr_iid))
            .or_default()
            .push(discussion);
        self
    }

    /// Seeded data for `--demo`. Pair it with [`DEMO_NOW`].
    pub fn demo() -> Self {
        let user = |id: UserId, username: &str, name: &str, email: Option<&str>| UserProfile {
            id,
            username: username.to_string(),
            name: Some(name.to_string()),
            public_email: email.map(str::to_string),
        };
        let mr = |iid: u64,
                  title: &str,
                  author: UserId,
                  updated_at: OffsetDateTime,
                  reviewers: &[UserId]| MergeRequest {
            iid,
            title: title.to_string(),
            url: format!("https://gitlab.example.com/demo/backend/-/merge_requests/{iid}"),
            author,
            is_draft: false,
            updated_at,
            reviewers: reviewers.iter().copied().collect(),
        };

        let mut draft = mr(4, "Draft: rewrite config loader", 3, DEMO_NOW, &[1]);
        draft.is_draft = true;

        Self::default()
            .with_project("demo/backend", 100)
            .with_project("demo/frontend", 200)
            .with_user(user(1, "alice", "Alice Martin", Some("alice@example.com")))
            .with_user(user(2, "bob", "Bob Chen", None))
            .with_user(user(3, "carol", "Carol Diaz", Some("carol@example.com")))
            .with_user(user(4, "dave", "", Some("dave@example.com")))
            .with_merge_request(
                100,
                mr(1, "Add request tracing", 3, datetime!(2024-03-04 10:00 UTC), &[1, 2]),
            )
            .with_approvals(100, 1, [1])
            .with_merge_request(
                100,
                mr(2, "Fix pagination off-by-one", 1, datetime!(2024-03-06 15:00 UTC), &[3]),
            )
            .with_discussion(
                100,
                2,
                Discussion {
                    notes: vec![Note {
                        author: 3,
                        resolved: Some(false),
                    }],
                },
            )
            .with_merge_request(
                100,
                mr(3, "Bump dependencies", 4, datetime!(2024-03-07 08:00 UTC), &[1]),
            )
            .with_approvals(100, 3, [1])
            .with_merge_request(100, draft)
    }
}

/// Clock used together with [`InMemoryPlatform::demo`].
pub const DEMO_NOW: OffsetDateTime = datetime!(2024-03-07 12:00 UTC);

impl ReviewPlatform for InMemoryPlatform {
    async fn resolve_project(&self, project: &str) -> Result<ProjectId> {
        self.projects
            .get(project)
            .copied()
            .ok_or_else(|| anyhow!("project search for {project:?} failed (404 Not Found)"))
    }

    async fn open_merge_requests(&self, project_id: ProjectId) -> Result<Vec<MergeRequest>> {
        self.merge_requests
            .get(&project_id)
            .cloned()
            .ok_or_else(|| anyhow!("project {project_id} not found (404 Not Found)"))
    }

    async fn approvers(&self, project_id: ProjectId, mr_iid: u64) -> Result<BTreeSet<UserId>> {
        Ok(self
            .approvals
            .get(&(project_id, mr_iid))
            .cloned()
            .unwrap_or_default())
    }

    async fn discussions(&self, project_id: ProjectId, mr_iid: u64) -> Result<Vec<Discussion>> {
        Ok(self
            .discussions
            .get(&(project_id, mr_iid))
            .cloned()
            .unwrap_or_default())
    }

    async fn user(&self, user_id: UserId) -> Result<UserProfile> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| anyhow!("user {user_id} not found (404 Not Found)"))
    }
}
