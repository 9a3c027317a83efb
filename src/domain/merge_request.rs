use std::collections::BTreeSet;

use time::OffsetDateTime;

pub type UserId = u64;
pub type ProjectId = u64;

#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub iid: u64,
    pub title: String,
    pub url: String,
    pub author: UserId,
    pub is_draft: bool,
    pub updated_at: OffsetDateTime,
    pub reviewers: BTreeSet<UserId>,
}

#[derive(Debug, Clone, Default)]
pub struct Discussion {
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone)]
pub struct Note {
    pub author: UserId,
    /// `None` when the note is not resolvable at all.
    pub resolved: Option<bool>,
}

impl Note {
    pub fn is_unresolved(&self) -> bool {
        self.resolved == Some(false)
    }
}
