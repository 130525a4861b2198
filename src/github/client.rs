use crate::domain::{NewRelease, Release, ReleaseUpdate};
use crate::error::{FloatTagsError, Result};
use crate::git::RepoSlug;
use crate::github::ReleaseStore;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub Releases REST client for one repository
pub struct GitHubReleases {
    http: reqwest::Client,
    api_base_url: Url,
    repo: RepoSlug,
    token: String,
}

impl GitHubReleases {
    /// Creates a client against an explicit API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is empty, the base URL cannot be parsed,
    /// or the HTTP client cannot be initialized.
    pub fn new(api_base_url: &str, repo: RepoSlug, token: impl Into<String>) -> Result<Self> {
        Self::with_builder(api_base_url, repo, token.into(), reqwest::Client::builder())
    }

    fn with_builder(
        api_base_url: &str,
        repo: RepoSlug,
        token: String,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(FloatTagsError::config("GitHub token must not be empty"));
        }

        let api_base_url = Url::parse(api_base_url.trim_end_matches('/')).map_err(|e| {
            FloatTagsError::config(format!("Invalid GitHub API URL '{}': {}", api_base_url, e))
        })?;

        let http = builder
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("float-tags/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubReleases {
            http,
            api_base_url,
            repo,
            token,
        })
    }

    /// Build `<base>/repos/<owner>/<repo>/releases/<segments...>`, percent-encoding
    /// each segment so tag names with reserved characters stay intact.
    pub fn releases_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FloatTagsError::config("GitHub API URL cannot be a base"))?;
            path.pop_if_empty()
                .extend(["repos", self.repo.owner.as_str(), self.repo.repo.as_str(), "releases"])
                .extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "GitHub request");
        self.http
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .bearer_auth(&self.token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| FloatTagsError::github(None, e.to_string()))
    }
}

/// Map a response to a release, treating `404` as absent
async fn optional_release(response: Response) -> Result<Option<Release>> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    required_release(response).await.map(Some)
}

async fn required_release(response: Response) -> Result<Release> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());
        return Err(api_error(status, &message));
    }

    response
        .json::<Release>()
        .await
        .map_err(|e| FloatTagsError::github(Some(status.as_u16()), format!("Invalid release payload: {}", e)))
}

/// Turn a failed response into an error, preferring GitHub's `message` field
pub fn api_error(status: StatusCode, body: &str) -> FloatTagsError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body.trim().to_string()
            }
        });
    FloatTagsError::github(Some(status.as_u16()), message)
}

#[async_trait]
impl ReleaseStore for GitHubReleases {
    async fn get_by_tag(&self, tag: &str) -> Result<Option<Release>> {
        let url = self.releases_url(&["tags", tag])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        optional_release(response).await
    }

    async fn get_latest(&self) -> Result<Option<Release>> {
        let url = self.releases_url(&["latest"])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        optional_release(response).await
    }

    async fn create(&self, release: &NewRelease) -> Result<Release> {
        let url = self.releases_url(&[])?;
        let response = self
            .send(self.request(Method::POST, url).json(release))
            .await?;
        let created = required_release(response).await?;
        debug!(id = created.id, tag = %created.tag_name, "created release");
        Ok(created)
    }

    async fn update(&self, update: &ReleaseUpdate) -> Result<Release> {
        let id = update.release_id.to_string();
        let url = self.releases_url(&[id.as_str()])?;
        let response = self
            .send(self.request(Method::PATCH, url).json(update))
            .await?;
        required_release(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request on a local port with a canned response
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 8192];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    fn local_client(base: &str) -> GitHubReleases {
        GitHubReleases::with_builder(
            base,
            RepoSlug::new("octo", "widgets"),
            "token".to_string(),
            reqwest::Client::builder().no_proxy(),
        )
        .unwrap()
    }

    fn client(base: &str) -> GitHubReleases {
        GitHubReleases::new(base, RepoSlug::new("octo", "widgets"), "token").unwrap()
    }

    #[test]
    fn test_releases_url() {
        let c = client(DEFAULT_GITHUB_API_BASE_URL);
        assert_eq!(
            c.releases_url(&["tags", "v1"]).unwrap().as_str(),
            "https://api.github.com/repos/octo/widgets/releases/tags/v1"
        );
        assert_eq!(
            c.releases_url(&[]).unwrap().as_str(),
            "https://api.github.com/repos/octo/widgets/releases"
        );
    }

    #[test]
    fn test_releases_url_keeps_enterprise_prefix() {
        let c = client("https://ghe.example.com/api/v3/");
        assert_eq!(
            c.releases_url(&["latest"]).unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/octo/widgets/releases/latest"
        );
    }

    #[test]
    fn test_releases_url_encodes_tag() {
        let c = client(DEFAULT_GITHUB_API_BASE_URL);
        let url = c.releases_url(&["tags", "v1/beta#2"]).unwrap();
        assert!(url.as_str().ends_with("/releases/tags/v1%2Fbeta%232"), "got {}", url);
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = GitHubReleases::new(DEFAULT_GITHUB_API_BASE_URL, RepoSlug::new("o", "r"), " ");
        assert!(matches!(result, Err(FloatTagsError::Config(_))));
    }

    #[test]
    fn test_api_error_prefers_message_field() {
        let err = api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "Validation Failed", "errors": []}"#,
        );
        assert_eq!(err.to_string(), "GitHub request failed (422): Validation Failed");
    }

    #[test]
    fn test_api_error_falls_back_to_status() {
        let err = api_error(StatusCode::BAD_GATEWAY, "");
        match err {
            FloatTagsError::GitHub { status, message } => {
                assert_eq!(status, Some(502));
                assert!(message.contains("502"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_lookup_not_found_is_none() {
        let base = serve_once("404 Not Found", r#"{"message": "Not Found"}"#).await;
        let found = local_client(&base).get_by_tag("v1").await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_latest_not_found_is_none() {
        let base = serve_once("404 Not Found", r#"{"message": "Not Found"}"#).await;
        assert_eq!(local_client(&base).get_latest().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookup_server_error_keeps_status() {
        let base = serve_once("500 Internal Server Error", r#"{"message": "boom"}"#).await;
        let err = local_client(&base).get_by_tag("v1").await.unwrap_err();
        match err {
            FloatTagsError::GitHub { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_lookup_success_deserializes_release() {
        let base = serve_once(
            "200 OK",
            r#"{"id": 42, "tag_name": "v1", "name": "v1", "body": "notes", "draft": false}"#,
        )
        .await;
        let release = local_client(&base).get_by_tag("v1").await.unwrap().unwrap();
        assert_eq!(
            release,
            Release {
                id: 42,
                tag_name: "v1".to_string(),
                name: Some("v1".to_string()),
                body: Some("notes".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_release_without_body() {
        let base = serve_once("200 OK", r#"{"id": 7, "tag_name": "v2", "name": null, "body": null}"#).await;
        let release = local_client(&base).get_latest().await.unwrap().unwrap();
        assert_eq!(release.id, 7);
        assert_eq!(release.body, None);
    }
}
