//! Fetches public GitHub statistics for the portfolio owner.
//!
//! The interpreter only sees the [`ProfileSource`] trait, so tests can swap
//! in canned sources. The real implementation talks to the GitHub REST API
//! and degrades gracefully when fields are missing.

use anyhow::{bail, Result};
use async_trait::async_trait;
use log::info;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// How long a fetched snapshot stays valid before `scrape` refetches.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(30 * 60);

const GITHUB_API: &str = "https://api.github.com";
const TOP_REPO_COUNT: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub name: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub forks: u64,
    pub url: String,
}

/// One successful fetch of the owner's public statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub name: String,
    pub bio: String,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    pub repositories: Vec<RepoInfo>,
}

/// Source of profile snapshots. Implemented by the GitHub scraper and by
/// canned fixtures in tests.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self) -> Result<ProfileSnapshot>;
}

// Wire format of the GitHub REST API. Every field the API may omit or null
// out falls back to a default, mirroring what the site actually returns for
// sparse accounts.

#[derive(Deserialize)]
struct GithubUser {
    name: Option<String>,
    bio: Option<String>,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    following: u64,
    #[serde(default)]
    public_repos: u64,
}

#[derive(Deserialize)]
struct GithubRepo {
    name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    html_url: String,
}

pub struct GithubScraper {
    client: reqwest::Client,
    username: String,
    display_name: String,
}

impl GithubScraper {
    pub fn new(username: &str, display_name: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("portfolio-terminal/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            username: username.to_string(),
            display_name: display_name.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            bail!("GitHub API returned {} for {}", response.status(), url);
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProfileSource for GithubScraper {
    async fn fetch(&self) -> Result<ProfileSnapshot> {
        info!("fetching GitHub profile for '{}'", self.username);

        let user_url = format!("{}/users/{}", GITHUB_API, self.username);
        let repos_url = format!(
            "{}/users/{}/repos?sort=stars&per_page={}",
            GITHUB_API, self.username, TOP_REPO_COUNT
        );

        let (user, repos) = tokio::try_join!(
            self.get_json::<GithubUser>(&user_url),
            self.get_json::<Vec<GithubRepo>>(&repos_url)
        )?;

        let repositories = repos
            .into_iter()
            .map(|repo| RepoInfo {
                name: repo.name,
                description: repo
                    .description
                    .unwrap_or_else(|| "No description available".to_string()),
                language: repo.language.unwrap_or_else(|| "Unknown".to_string()),
                stars: repo.stargazers_count,
                forks: repo.forks_count,
                url: repo.html_url,
            })
            .collect();

        Ok(ProfileSnapshot {
            name: user.name.unwrap_or_else(|| self.display_name.clone()),
            bio: user
                .bio
                .unwrap_or_else(|| "Software developer".to_string()),
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
            repositories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_user_fields_default() {
        let json = r#"{"login":"ghost","name":null,"bio":null}"#;
        let user: GithubUser = serde_json::from_str(json).unwrap();
        assert!(user.name.is_none());
        assert_eq!(user.followers, 0);
        assert_eq!(user.public_repos, 0);
    }

    #[test]
    fn repo_fields_deserialize_with_nulls() {
        let json = r#"[{
            "name": "portfolio-terminal",
            "description": null,
            "language": "Rust",
            "stargazers_count": 12,
            "forks_count": 3,
            "html_url": "https://github.com/ghost/portfolio-terminal"
        }]"#;
        let repos: Vec<GithubRepo> = serde_json::from_str(json).unwrap();
        assert_eq!(repos.len(), 1);
        assert!(repos[0].description.is_none());
        assert_eq!(repos[0].stargazers_count, 12);
    }
}
