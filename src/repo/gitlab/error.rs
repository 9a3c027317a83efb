use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitlabError {
    /// Non-success response; `body` carries what GitLab sent back.
    #[error("GitLab request {endpoint} failed with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("no GitLab project matches {0:?}")]
    ProjectNotFound(String),

    #[error("GitLab token is not a valid header value")]
    InvalidToken,

    #[error("GitLab request {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}
