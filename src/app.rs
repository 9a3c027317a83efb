use std::collections::BTreeSet;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::identity::Identity;
use crate::domain::merge_request::{ProjectId, UserId};
use crate::domain::report::{ProjectReport, Report, ReportEntry, Summary};
use crate::notify::{Notifier, card};
use crate::repo::ReviewPlatform;
use crate::usecase::attention::evaluate;

/// One reminder run: collect, evaluate, render, deliver.
pub struct App<P: ReviewPlatform, N: Notifier> {
    platform: P,
    notifier: N,
    config: Config,
    now: OffsetDateTime,
}

/// Run-local accumulators.
#[derive(Default)]
struct Notified {
    merge_requests: BTreeSet<(ProjectId, u64)>,
    people: BTreeSet<UserId>,
}

impl<P: ReviewPlatform, N: Notifier> App<P, N> {
    pub fn new(platform: P, notifier: N, config: Config) -> Self {
        Self {
            platform,
            notifier,
            config,
            now: OffsetDateTime::now_utc(),
        }
    }

    pub fn with_now(mut self, now: OffsetDateTime) -> Self {
        self.now = now;
        self
    }

    pub async fn run(&self) -> Result<Summary> {
        if self.config.projects.is_empty() {
            warn!("no projects configured");
        }

        let mut report = Report::default();
        let mut notified = Notified::default();
        for project in &self.config.projects {
            let section = self
                .collect_project(project, &mut notified)
                .await
                .with_context(|| format!("failed to collect merge requests for {project}"))?;
            if !section.entries.is_empty() {
                report.projects.push(section);
            }
        }

        let delivered = if notified.people.is_empty() {
            info!("nothing to remind anyone about");
            false
        } else {
            let message = card::render(&report);
            self.notifier.deliver(&message).await?;
            true
        };

        Ok(Summary {
            people: notified.people.len(),
            merge_requests: notified.merge_requests.len(),
            delivered,
        })
    }

    async fn collect_project(&self, project: &str, notified: &mut Notified) -> Result<ProjectReport> {
        let project_id = self.platform.resolve_project(project).await?;
        let merge_requests = self.platform.open_merge_requests(project_id).await?;
        info!(project, project_id, count = merge_requests.len(), "fetched open merge requests");

        let mut entries = Vec::new();
        for mr in merge_requests {
            if mr.is_draft {
                debug!(project, iid = mr.iid, "skipping draft");
                continue;
            }

            let approvers = self.platform.approvers(project_id, mr.iid).await?;
            let discussions = self.platform.discussions(project_id, mr.iid).await?;
            let attention = evaluate(
                &mr,
                &approvers,
                &discussions,
                self.now,
                self.config.stale_after_days,
            );
            if attention.notify.is_empty() {
                continue;
            }
            debug!(project, iid = mr.iid, notify = ?attention.notify, "merge request needs attention");

            let mut mentions = Vec::new();
            for &user_id in &attention.notify {
                let profile = self.platform.user(user_id).await?;
                let identity = Identity::resolve(profile, &self.config.user_emails);
                if identity.is_mentionable() {
                    mentions.push(identity);
                } else {
                    debug!(user_id = identity.id, username = %identity.username, "no email, cannot mention");
                }
            }

            notified.merge_requests.insert((project_id, mr.iid));
            notified.people.extend(attention.notify.iter().copied());
            entries.push(ReportEntry {
                title: mr.title,
                url: mr.url,
                stale_label: attention.stale_label,
                mentions,
            });
        }

        Ok(ProjectReport {
            project: project.to_string(),
            entries,
        })
    }
}
