// GitHub API endpoint functions.
// Typed methods for the two repository endpoints the site uses.

use async_trait::async_trait;

use crate::error::Result;
use crate::projects::RepoSource;

use super::client::GitHubClient;
use super::types::Repository;

/// Largest page the API serves; the site never paginates past it.
pub const USER_REPOS_PER_PAGE: u32 = 100;

impl GitHubClient {
    /// Get a specific repository.
    pub async fn get_repo(&self, owner: &str, repo: &str) -> Result<Repository> {
        let response = self.get(&format!("/repos/{}/{}", owner, repo)).await?;
        let repository: Repository = response.json().await?;
        Ok(repository)
    }

    /// Get a user's public repositories, most recently updated first.
    pub async fn get_user_repos(&self, user: &str) -> Result<Vec<Repository>> {
        let params = [
            ("sort", "updated"),
            ("per_page", &USER_REPOS_PER_PAGE.to_string()),
        ];
        let response = self
            .get_with_params(&format!("/users/{}/repos", user), &params)
            .await?;
        let repos: Vec<Repository> = response.json().await?;
        Ok(repos)
    }
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn repository(&self, owner: &str, name: &str) -> Result<Repository> {
        self.get_repo(owner, name).await
    }

    async fn user_repositories(&self, user: &str) -> Result<Vec<Repository>> {
        self.get_user_repos(user).await
    }
}
