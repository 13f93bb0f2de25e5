//! Push target resolution.
//!
//! With a token configured, pushes go to `https://<token>@<host>/<path>`, built
//! from the configured remote URL with any existing userinfo stripped.
//! Without a token the remote name is used as-is.

use url::Url;

/// Where `git push` sends refs
#[derive(Clone, PartialEq, Eq)]
pub enum PushTarget {
    /// A configured remote name such as `origin`
    Remote(String),
    /// An explicit URL carrying a credential
    Authenticated(String),
}

impl PushTarget {
    /// Argument passed to `git push`
    pub fn as_arg(&self) -> &str {
        match self {
            PushTarget::Remote(name) => name,
            PushTarget::Authenticated(url) => url,
        }
    }
}

impl std::fmt::Debug for PushTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushTarget::Remote(name) => f.debug_tuple("Remote").field(name).finish(),
            PushTarget::Authenticated(_) => f.write_str("Authenticated(..)"),
        }
    }
}

/// Reduce a remote URL to `host/path`, without scheme or userinfo
///
/// Accepts `https://user:pw@host/owner/repo.git`, `ssh://git@host:22/owner/repo`
/// and scp-like `git@host:owner/repo.git`. Returns `None` for local paths and
/// URLs without a host.
pub fn host_path(remote_url: &str) -> Option<String> {
    let remote_url = remote_url.trim();

    if remote_url.contains("://") {
        let parsed = Url::parse(remote_url).ok()?;
        let host = parsed.host_str().filter(|h| !h.is_empty())?;
        let path = parsed.path().trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        // ssh ports do not carry over to https
        return Some(match (parsed.scheme(), parsed.port()) {
            ("https" | "http", Some(port)) => format!("{}:{}/{}", host, port, path),
            _ => format!("{}/{}", host, path),
        });
    }

    // scp-like syntax: [user@]host:path
    let without_user = remote_url.rsplit_once('@').map_or(remote_url, |(_, rest)| rest);
    let (host, path) = without_user.split_once(':')?;
    if host.is_empty() || host.contains('/') || path.is_empty() {
        return None;
    }
    Some(format!("{}/{}", host, path.trim_start_matches('/')))
}

/// Build the push target for a remote
pub fn resolve_push_target(
    remote: &str,
    remote_url: Option<&str>,
    token: Option<&str>,
) -> std::result::Result<PushTarget, String> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(PushTarget::Remote(remote.to_string()));
    };

    let remote_url =
        remote_url.ok_or_else(|| format!("remote '{}' has no URL configured", remote))?;
    let repo = host_path(remote_url).ok_or_else(|| {
        format!(
            "remote '{}' is not a network URL; cannot attach a token",
            remote
        )
    })?;

    Ok(PushTarget::Authenticated(format!("https://{}@{}", token, repo)))
}
