use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::identity::UserProfile;
use crate::domain::merge_request::{Discussion, MergeRequest, Note, ProjectId, UserId};

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabProject {
    pub id: ProjectId,
    pub name: String,
    pub path_with_namespace: String,
}

/// User reference embedded in MR, note and approval payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct GitlabUserRef {
    pub id: UserId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabMergeRequest {
    pub iid: u64,
    pub title: String,
    pub web_url: String,
    pub author: GitlabUserRef,
    #[serde(default)]
    pub draft: Option<bool>,
    // Older instances only send this one.
    #[serde(default)]
    pub work_in_progress: Option<bool>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub reviewers: Option<Vec<GitlabUserRef>>,
}

impl From<GitlabMergeRequest> for MergeRequest {
    fn from(mr: GitlabMergeRequest) -> Self {
        let is_draft = mr.draft.unwrap_or(false) || mr.work_in_progress.unwrap_or(false);
        Self {
            iid: mr.iid,
            title: mr.title,
            url: mr.web_url,
            author: mr.author.id,
            is_draft,
            updated_at: mr.updated_at,
            reviewers: mr
                .reviewers
                .unwrap_or_default()
                .into_iter()
                .map(|r| r.id)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabApprovals {
    #[serde(default)]
    pub approved_by: Vec<GitlabApprovedBy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabApprovedBy {
    pub user: GitlabUserRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabDiscussion {
    #[serde(default)]
    pub notes: Vec<GitlabNote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabNote {
    pub author: GitlabUserRef,
    #[serde(default)]
    pub resolved: Option<bool>,
}

impl From<GitlabDiscussion> for Discussion {
    fn from(discussion: GitlabDiscussion) -> Self {
        Self {
            notes: discussion
                .notes
                .into_iter()
                .map(|n| Note {
                    author: n.author.id,
                    resolved: n.resolved,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_email: Option<String>,
}

impl From<GitlabUser> for UserProfile {
    fn from(user: GitlabUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            public_email: user.public_email,
        }
    }
}
