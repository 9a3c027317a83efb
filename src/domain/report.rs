use std::fmt;

use super::identity::Identity;

/// One merge request line of the reminder card.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub title: String,
    pub url: String,
    pub stale_label: Option<String>,
    /// Notified identities that have a resolvable email.
    pub mentions: Vec<Identity>,
}

#[derive(Debug, Clone)]
pub struct ProjectReport {
    pub project: String,
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub projects: Vec<ProjectReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub people: usize,
    pub merge_requests: usize,
    pub delivered: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Notified {} people about {} MRs",
            self.people, self.merge_requests
        )
    }
}
