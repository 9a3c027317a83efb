use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};

use crate::domain::identity::EmailOverrides;

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token: String,
    pub projects: Vec<String>,
    /// `None` only for dry runs.
    pub webhook_url: Option<String>,
    pub user_emails: EmailOverrides,
    pub stale_after_days: u32,
}

/// Raw values as they come from flags or the environment.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub projects: Option<String>,
    pub webhook_url: Option<String>,
    pub user_emails: Option<String>,
    pub stale_after_days: u32,
    pub dry_run: bool,
}

impl Config {
    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let api_url = required(raw.api_url, "GITLAB_API_URL")?;
        let token = required(raw.token, "GITLAB_PRIVATE_TOKEN")?;
        let projects = parse_projects(raw.projects.as_deref().unwrap_or_default());
        let webhook_url = match non_blank(raw.webhook_url) {
            Some(url) => Some(url),
            None if raw.dry_run => None,
            None => return Err(anyhow!("TEAMS_WEBHOOK_URL is required (or pass --dry-run)")),
        };
        let user_emails = match non_blank(raw.user_emails) {
            Some(json) => parse_user_emails(&json)?,
            None => EmailOverrides::new(),
        };

        Ok(Self {
            api_url,
            token,
            projects,
            webhook_url,
            user_emails,
            stale_after_days: raw.stale_after_days,
        })
    }

    /// Configuration for `--demo`, matching the seeded in-memory platform.
    pub fn demo() -> Self {
        Self {
            api_url: String::new(),
            token: String::new(),
            projects: vec!["demo/backend".to_string(), "demo/frontend".to_string()],
            webhook_url: None,
            user_emails: EmailOverrides::from([("bob".to_string(), "bob@example.com".to_string())]),
            stale_after_days: 2,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    non_blank(value).ok_or_else(|| anyhow!("{name} is required and must not be empty"))
}

/// Comma-separated list, blanks and repeats dropped, first occurrence wins.
pub fn parse_projects(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && seen.insert(*p))
        .map(str::to_string)
        .collect()
}

pub fn parse_user_emails(raw: &str) -> Result<EmailOverrides> {
    serde_json::from_str(raw)
        .context("USER_EMAILS must be a JSON object mapping usernames to emails")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw() -> RawConfig {
        RawConfig {
            api_url: Some("https://gitlab.example.com/api/v4".to_string()),
            token: Some("  glpat-secret \n".to_string()),
            projects: Some("acme/api, acme/web,,".to_string()),
            webhook_url: Some("https://example.webhook.office.com/hook".to_string()),
            user_emails: Some(r#"{"bob": "bob@example.com"}"#.to_string()),
            stale_after_days: 2,
            dry_run: false,
        }
    }

    #[test]
    fn builds_from_raw_values() {
        let config = Config::from_raw(raw()).unwrap();
        assert_eq!(config.token, "glpat-secret");
        assert_eq!(config.projects, vec!["acme/api", "acme/web"]);
        assert_eq!(
            config.user_emails.get("bob").map(String::as_str),
            Some("bob@example.com")
        );
    }

    #[test]
    fn blank_token_is_rejected() {
        let err = Config::from_raw(RawConfig {
            token: Some("   ".to_string()),
            ..raw()
        })
        .unwrap_err();
        assert!(err.to_string().contains("GITLAB_PRIVATE_TOKEN"));
    }

    #[test]
    fn webhook_required_unless_dry_run() {
        let missing = RawConfig {
            webhook_url: None,
            ..raw()
        };
        assert!(Config::from_raw(missing.clone()).is_err());

        let config = Config::from_raw(RawConfig {
            dry_run: true,
            ..missing
        })
        .unwrap();
        assert_eq!(config.webhook_url, None);
    }

    #[test]
    fn invalid_user_emails_json_is_an_error() {
        let err = Config::from_raw(RawConfig {
            user_emails: Some("bob=bob@example.com".to_string()),
            ..raw()
        })
        .unwrap_err();
        assert!(err.to_string().contains("USER_EMAILS"));
    }

    #[test]
    fn missing_projects_yield_empty_list() {
        let config = Config::from_raw(RawConfig {
            projects: None,
            ..raw()
        })
        .unwrap();
        assert!(config.projects.is_empty());
    }

    #[test]
    fn repeated_projects_are_listed_once() {
        assert_eq!(
            parse_projects("acme/web, acme/api,acme/web ,acme/api"),
            vec!["acme/web", "acme/api"]
        );
    }
}
