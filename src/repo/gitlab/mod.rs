//! GitLab API v4 client.

pub mod error;
pub mod model;

use std::collections::BTreeSet;

use anyhow::Result;
use reqwest::{Client, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ReviewPlatform;
use crate::domain::identity::UserProfile;
use crate::domain::merge_request::{Discussion, MergeRequest, ProjectId, UserId};
use error::GitlabError;
use model::{GitlabApprovals, GitlabDiscussion, GitlabMergeRequest, GitlabProject, GitlabUser};

const PER_PAGE: &str = "100";

#[derive(Debug, Clone)]
pub struct GitlabClient {
    client: Client,
    /// Base URL including `/api/v4`.
    api_url: String,
}

impl GitlabClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, GitlabError> {
        let mut headers = header::HeaderMap::new();
        let mut token =
            header::HeaderValue::from_str(token).map_err(|_| GitlabError::InvalidToken)?;
        token.set_sensitive(true);
        headers.insert("PRIVATE-TOKEN", token);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| GitlabError::Http {
                endpoint: api_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_url, endpoint)
    }

    async fn send(
        &self,
        endpoint: &str,
        query: &(impl Serialize + ?Sized),
    ) -> Result<Response, GitlabError> {
        debug!(endpoint, "GET");
        let response = self
            .client
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(|source| GitlabError::Http {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GitlabError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        endpoint: &str,
    ) -> Result<T, GitlabError> {
        response.json::<T>().await.map_err(|source| GitlabError::Http {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &(impl Serialize + ?Sized),
    ) -> Result<T, GitlabError> {
        let response = self.send(endpoint, query).await?;
        Self::decode(response, endpoint).await
    }

    /// Follow `x-next-page` until GitLab reports no further page.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, GitlabError> {
        let mut all = Vec::new();
        let mut page = "1".to_string();
        loop {
            let mut params = query.to_vec();
            params.push(("per_page", PER_PAGE));
            params.push(("page", page.as_str()));

            let response = self.send(endpoint, &params).await?;
            let next_page = next_page(&response);
            let items: Vec<T> = Self::decode(response, endpoint).await?;
            all.extend(items);

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }
        Ok(all)
    }

    pub async fn search_projects(&self, search: &str) -> Result<Vec<GitlabProject>, GitlabError> {
        self.get("/search", &[("scope", "projects"), ("search", search)])
            .await
    }
}

fn next_page(response: &Response) -> Option<String> {
    response
        .headers()
        .get("x-next-page")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Digits-only identifiers are project ids and skip the search.
pub fn numeric_project_id(project: &str) -> Option<ProjectId> {
    if project.is_empty() || !project.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    project.parse().ok()
}

/// Prefer an exact path or name match, otherwise GitLab's first hit.
pub fn pick_project(search: &str, projects: &[GitlabProject]) -> Option<ProjectId> {
    projects
        .iter()
        .find(|p| p.path_with_namespace == search || p.name == search)
        .or_else(|| projects.first())
        .map(|p| p.id)
}

impl ReviewPlatform for GitlabClient {
    async fn resolve_project(&self, project: &str) -> Result<ProjectId> {
        if let Some(id) = numeric_project_id(project) {
            return Ok(id);
        }
        let projects = self.search_projects(project).await?;
        let id = pick_project(project, &projects)
            .ok_or_else(|| GitlabError::ProjectNotFound(project.to_string()))?;
        debug!(project, id, "resolved project");
        Ok(id)
    }

    async fn open_merge_requests(&self, project_id: ProjectId) -> Result<Vec<MergeRequest>> {
        let endpoint = format!("/projects/{project_id}/merge_requests");
        let mrs: Vec<GitlabMergeRequest> = self
            .get_all_pages(&endpoint, &[("state", "opened")])
            .await?;
        Ok(mrs.into_iter().map(MergeRequest::from).collect())
    }

    async fn approvers(&self, project_id: ProjectId, mr_iid: u64) -> Result<BTreeSet<UserId>> {
        let endpoint = format!("/projects/{project_id}/merge_requests/{mr_iid}/approvals");
        let approvals: GitlabApprovals = self.get(&endpoint, &[] as &[(&str, &str)]).await?;
        Ok(approvals
            .approved_by
            .into_iter()
            .map(|a| a.user.id)
            .collect())
    }

    async fn discussions(&self, project_id: ProjectId, mr_iid: u64) -> Result<Vec<Discussion>> {
        let endpoint = format!("/projects/{project_id}/merge_requests/{mr_iid}/discussions");
        let discussions: Vec<GitlabDiscussion> = self.get_all_pages(&endpoint, &[]).await?;
        Ok(discussions.into_iter().map(Discussion::from).collect())
    }

    async fn user(&self, user_id: UserId) -> Result<UserProfile> {
        let endpoint = format!("/users/{user_id}");
        let user: GitlabUser = self.get(&endpoint, &[] as &[(&str, &str)]).await?;
        Ok(user.into())
    }
}
