//! Adaptive Card payload for Teams incoming webhooks.

use serde::Serialize;

use crate::domain::identity::Identity;
use crate::domain::report::{Report, ReportEntry};

const TITLE: &str = "Outstanding MR review requests";
const SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    #[serde(rename = "contentType")]
    pub content_type: &'static str,
    pub content: AdaptiveCard,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdaptiveCard {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub body: Vec<TextBlock>,
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub version: &'static str,
    pub msteams: MsTeams,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<&'static str>,
    pub text: String,
}

impl TextBlock {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: "TextBlock",
            weight: None,
            text: text.into(),
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            weight: Some("Bolder"),
            ..Self::plain(text)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MsTeams {
    pub entities: Vec<MentionEntity>,
    pub width: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentionEntity {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
    pub mentioned: Mentioned,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mentioned {
    pub id: String,
    pub name: String,
}

fn mention_tag(identity: &Identity) -> String {
    format!("<at>{}</at>", identity.display_name)
}

fn entry_line(entry: &ReportEntry) -> String {
    match &entry.stale_label {
        Some(label) => format!("[{}]({}) - {label}", entry.title, entry.url),
        None => format!("[{}]({})", entry.title, entry.url),
    }
}

/// Build the card. Identities without an email never reach this point.
pub fn render(report: &Report) -> Message {
    let mut body = vec![TextBlock::bold(TITLE)];
    let mut entities = Vec::new();

    for project in &report.projects {
        body.push(TextBlock::bold(&project.project));
        for entry in &project.entries {
            body.push(TextBlock::plain(entry_line(entry)));
            let tags: Vec<String> = entry.mentions.iter().map(mention_tag).collect();
            body.push(TextBlock::plain(tags.join(" ")));

            entities.extend(entry.mentions.iter().filter_map(|identity| {
                let email = identity.email.clone()?;
                Some(MentionEntity {
                    kind: "mention",
                    text: mention_tag(identity),
                    mentioned: Mentioned {
                        id: email,
                        name: identity.display_name.clone(),
                    },
                })
            }));
        }
    }

    Message {
        kind: "message",
        attachments: vec![Attachment {
            content_type: "application/vnd.microsoft.card.adaptive",
            content: AdaptiveCard {
                kind: "AdaptiveCard",
                body,
                schema: SCHEMA,
                version: "1.0",
                msteams: MsTeams {
                    entities,
                    width: "Full",
                },
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::ProjectReport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn alice() -> Identity {
        Identity {
            id: 10,
            username: "alice".to_string(),
            display_name: "Alice Martin".to_string(),
            email: Some("alice@example.com".to_string()),
        }
    }

    #[test]
    fn renders_project_sections_and_mentions() {
        let report = Report {
            projects: vec![ProjectReport {
                project: "acme/api".to_string(),
                entries: vec![ReportEntry {
                    title: "Add caching layer".to_string(),
                    url: "https://gitlab.example.com/acme/api/-/merge_requests/42".to_string(),
                    stale_label: Some("3 days old".to_string()),
                    mentions: vec![alice()],
                }],
            }],
        };

        let value = serde_json::to_value(render(&report)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "message",
                "attachments": [{
                    "contentType": "application/vnd.microsoft.card.adaptive",
                    "content": {
                        "type": "AdaptiveCard",
                        "body": [
                            {"type": "TextBlock", "weight": "Bolder", "text": "Outstanding MR review requests"},
                            {"type": "TextBlock", "weight": "Bolder", "text": "acme/api"},
                            {"type": "TextBlock", "text": "[Add caching layer](https://gitlab.example.com/acme/api/-/merge_requests/42) - 3 days old"},
                            {"type": "TextBlock", "text": "<at>Alice Martin</at>"}
                        ],
                        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
                        "version": "1.0",
                        "msteams": {
                            "entities": [{
                                "type": "mention",
                                "text": "<at>Alice Martin</at>",
                                "mentioned": {"id": "alice@example.com", "name": "Alice Martin"}
                            }],
                            "width": "Full"
                        }
                    }
                }]
            })
        );
    }

    #[test]
    fn entry_without_mentions_keeps_its_line() {
        let report = Report {
            projects: vec![ProjectReport {
                project: "acme/web".to_string(),
                entries: vec![ReportEntry {
                    title: "Fix login".to_string(),
                    url: "https://gitlab.example.com/acme/web/-/merge_requests/1".to_string(),
                    stale_label: None,
                    mentions: vec![],
                }],
            }],
        };
        let message = render(&report);
        let card = &message.attachments[0].content;
        assert_eq!(card.body.len(), 4);
        assert_eq!(card.body[2].text, "[Fix login](https://gitlab.example.com/acme/web/-/merge_requests/1)");
        assert_eq!(card.body[3].text, "");
        assert!(card.msteams.entities.is_empty());
    }
}
