use std::collections::BTreeSet;

use time::OffsetDateTime;

use crate::domain::merge_request::{Discussion, MergeRequest, UserId};
use crate::usecase::staleness::staleness_label;

/// Who should be reminded about a merge request, and how old it looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attention {
    pub notify: BTreeSet<UserId>,
    pub stale_label: Option<String>,
}

/// Reviewers that still have to approve.
pub fn pending_reviewers(mr: &MergeRequest, approvers: &BTreeSet<UserId>) -> BTreeSet<UserId> {
    mr.reviewers.difference(approvers).copied().collect()
}

/// Authors of at least one note explicitly flagged as unresolved.
pub fn unresolved_discussion_authors(discussions: &[Discussion]) -> BTreeSet<UserId> {
    discussions
        .iter()
        .flat_map(|d| d.notes.iter())
        .filter(|n| n.is_unresolved())
        .map(|n| n.author)
        .collect()
}

/// Decide who to notify about `mr`.
///
/// Pending reviewers are notified unless the ball is in the author's court:
/// when there are open threads, or nobody is left to review, the thread
/// authors are dropped and the MR author is added. Both conditions share the
/// same branch even though the removal is a no-op when nobody is pending.
pub fn evaluate(
    mr: &MergeRequest,
    approvers: &BTreeSet<UserId>,
    discussions: &[Discussion],
    now: OffsetDateTime,
    stale_after_days: u32,
) -> Attention {
    let mut notify = pending_reviewers(mr, approvers);
    let blocked = unresolved_discussion_authors(discussions);

    if !blocked.is_empty() || notify.is_empty() {
        notify.retain(|id| !blocked.contains(id));
        notify.insert(mr.author);
    }

    Attention {
        notify,
        stale_label: staleness_label(mr.updated_at, now, stale_after_days),
    }
}
