use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::{EmbedLocator, ParseFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `youtu.be` short links.
    YouTubeShort,
    YouTube,
    Facebook,
    Instagram,
}

impl Provider {
    /// Matches a lowercase host against the provider domains, including
    /// subdomains (`www.`, `m.`, ...). Checked in resolution precedence order.
    pub fn for_host(host: &str) -> Option<Self> {
        const DOMAINS: [(&str, Provider); 4] = [
            ("youtu.be", Provider::YouTubeShort),
            ("youtube.com", Provider::YouTube),
            ("facebook.com", Provider::Facebook),
            ("instagram.com", Provider::Instagram),
        ];

        DOMAINS
            .into_iter()
            .find(|(domain, _)| {
                host == *domain
                    || host
                        .strip_suffix(domain)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
            .map(|(_, provider)| provider)
    }

    pub fn name(self) -> &'static str {
        match self {
            Provider::YouTubeShort | Provider::YouTube => "YouTube",
            Provider::Facebook => "Facebook",
            Provider::Instagram => "Instagram",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Instagram post flavour; both embed the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstagramKind {
    Post,
    Reel,
}

impl InstagramKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InstagramKind::Post => "p",
            InstagramKind::Reel => "reel",
        }
    }
}

/// `youtu.be/<id>`: the id is the first path segment.
pub(super) fn youtube_short(url: &Url) -> Result<EmbedLocator, ParseFailure> {
    let id = url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|id| !id.is_empty())
        .ok_or(ParseFailure::MissingVideoId {
            provider: Provider::YouTubeShort,
        })?;
    Ok(EmbedLocator::YouTube { id: id.to_string() })
}

/// `youtube.com/...?v=<id>`.
pub(super) fn youtube_long(url: &Url) -> Result<EmbedLocator, ParseFailure> {
    url.query_pairs()
        .find(|(key, value)| key == "v" && !value.is_empty())
        .map(|(_, id)| EmbedLocator::YouTube { id: id.into_owned() })
        .ok_or(ParseFailure::MissingVideoId {
            provider: Provider::YouTube,
        })
}

/// `instagram.com/(p|reel)/<id>`.
pub(super) fn instagram(url: &Url) -> Result<EmbedLocator, ParseFailure> {
    static POST_REGEX: OnceLock<Regex> = OnceLock::new();
    let pattern = POST_REGEX
        .get_or_init(|| Regex::new(r"/(p|reel)/([^/]+)").expect("Invalid Instagram path regex"));

    let caps = pattern
        .captures(url.path())
        .ok_or(ParseFailure::UnsupportedPath {
            provider: Provider::Instagram,
        })?;

    let kind = match &caps[1] {
        "reel" => InstagramKind::Reel,
        _ => InstagramKind::Post,
    };
    Ok(EmbedLocator::Instagram {
        kind,
        id: caps[2].to_string(),
    })
}
