use std::collections::HashMap;

use super::merge_request::UserId;

/// User profile as returned by the review platform.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub public_email: Option<String>,
}

/// Operator-supplied `username -> email` fallbacks for users without a public email.
pub type EmailOverrides = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn resolve(profile: UserProfile, overrides: &EmailOverrides) -> Self {
        let display_name = non_blank(profile.name).unwrap_or_else(|| profile.username.clone());
        let email = non_blank(profile.public_email)
            .or_else(|| overrides.get(&profile.username).cloned());
        Self {
            id: profile.id,
            username: profile.username,
            display_name,
            email,
        }
    }

    pub fn is_mentionable(&self) -> bool {
        self.email.is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
