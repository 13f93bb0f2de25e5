//! Pushing the release branch and tag.

use crate::config::ReleaseConfig;
use crate::error::{PushError, Result};
use crate::git::{GitOperations, PushTarget, resolve_push_target};
use crate::redact::Redactor;

/// Pushes release refs to the configured remote
#[derive(Debug)]
pub struct PublishClient<'a, G> {
    git: &'a G,
    config: &'a ReleaseConfig,
    redactor: Redactor,
}

impl<'a, G: GitOperations> PublishClient<'a, G> {
    /// Create a client
    pub fn new(git: &'a G, config: &'a ReleaseConfig) -> Self {
        Self {
            git,
            config,
            redactor: config.redactor(),
        }
    }

    /// Resolve the push target, injecting the token when one is configured
    pub async fn push_target(&self) -> Result<PushTarget> {
        let remote = &self.config.remote;
        let key = format!("remote.{}.url", remote);
        let remote_url = self
            .git
            .config_get(&key)
            .await
            .map_err(|e| PushError::RemoteUrl {
                remote: remote.clone(),
                reason: e.to_string(),
            })?;

        resolve_push_target(remote, remote_url.as_deref(), self.config.token.as_deref()).map_err(
            |reason| {
                PushError::RemoteUrl {
                    remote: remote.clone(),
                    reason: self.redactor.redact(&reason).into_owned(),
                }
                .into()
            },
        )
    }

    /// Push the release branch
    pub async fn push_branch(&self, target: &PushTarget) -> Result<()> {
        let branch = &self.config.releases_branch;
        self.push(target, &format!("{branch}:{branch}")).await
    }

    /// Push a single tag
    pub async fn push_tag(&self, target: &PushTarget, tag: &str) -> Result<()> {
        self.push(target, &format!("refs/tags/{tag}")).await
    }

    async fn push(&self, target: &PushTarget, refspec: &str) -> Result<()> {
        self.git
            .push(target.as_arg(), refspec)
            .await
            .map_err(|e| {
                PushError::Rejected {
                    refspec: refspec.to_string(),
                    reason: self.redactor.redact(&e.to_string()).into_owned(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use crate::git::fake::FakeGit;
    use crate::redact::PLACEHOLDER;

    #[tokio::test]
    async fn test_push_without_token_uses_remote_name() {
        let git = FakeGit::on_branch("releases")
            .with_config("remote.origin.url", "git@github.com:acme/widget.git");
        let config = ReleaseConfig::default();
        let client = PublishClient::new(&git, &config);

        let target = client.push_target().await.expect("target");
        client.push_branch(&target).await.expect("branch");
        client.push_tag(&target, "v1.0.0").await.expect("tag");

        assert_eq!(
            git.state().pushed,
            vec![
                ("origin".to_string(), "releases:releases".to_string()),
                ("origin".to_string(), "refs/tags/v1.0.0".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_push_with_token_rewrites_url() {
        let git = FakeGit::on_branch("releases")
            .with_config("remote.origin.url", "https://someone@github.com/acme/widget.git");
        let config = ReleaseConfig {
            token: Some("ghp_abc".to_string()),
            ..Default::default()
        };
        let client = PublishClient::new(&git, &config);

        let target = client.push_target().await.expect("target");
        assert_eq!(target.as_arg(), "https://ghp_abc@github.com/acme/widget.git");
    }

    #[tokio::test]
    async fn test_push_error_never_contains_token() {
        let git = FakeGit::on_branch("releases")
            .with_config("remote.origin.url", "https://github.com/acme/widget.git")
            .failing_on("push");
        let config = ReleaseConfig {
            token: Some("ghp_abc".to_string()),
            ..Default::default()
        };
        let client = PublishClient::new(&git, &config);

        let target = client.push_target().await.expect("target");
        let err = client.push_branch(&target).await.expect_err("push fails");

        let message = err.to_string();
        assert!(matches!(err, ReleaseError::Push(PushError::Rejected { .. })));
        assert!(!message.contains("ghp_abc"), "{message}");
        assert!(message.contains(PLACEHOLDER), "{message}");
    }

    #[tokio::test]
    async fn test_missing_remote_url_with_token() {
        let git = FakeGit::on_branch("releases");
        let config = ReleaseConfig {
            token: Some("ghp_abc".to_string()),
            ..Default::default()
        };

        let err = PublishClient::new(&git, &config)
            .push_target()
            .await
            .expect_err("no url");
        assert!(matches!(err, ReleaseError::Push(PushError::RemoteUrl { .. })));
    }
}
