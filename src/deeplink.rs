//! Share links: parsing incoming URLs into routes and building outgoing ones.

use anyhow::{Context, Result, bail};
use url::Url;

pub const DEFAULT_SHARE_PREFIX: &str = "/ShareVideos";
pub const DEFAULT_SHARE_BASE: &str = "https://vidfeed.app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Video { id: String },
}

/// Parses a share link. The path must start with `prefix`; the id is the
/// last non-empty segment after it.
pub fn parse(link: &str, prefix: &str) -> Result<Route> {
    let url = Url::parse(link.trim()).with_context(|| format!("Invalid link: {link}"))?;
    let prefix = prefix.trim_end_matches('/');
    let path = url.path();

    let Some(rest) = path.strip_prefix(prefix) else {
        bail!("Not a video link: {link}");
    };
    if !(rest.is_empty() || rest.starts_with('/')) {
        bail!("Not a video link: {link}");
    }
    match rest.rsplit('/').find(|s| !s.is_empty()) {
        Some(id) => Ok(Route::Video { id: id.to_string() }),
        None => bail!("Link has no video id: {link}"),
    }
}

pub fn share_url(base: &str, prefix: &str, id: &str) -> String {
    format!(
        "{}/{}/video/{}",
        base.trim_end_matches('/'),
        prefix.trim_matches('/'),
        id
    )
}
