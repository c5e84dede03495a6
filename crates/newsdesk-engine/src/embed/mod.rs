//! # URL-to-Embed Resolution
//!
//! Maps a pasted video URL to something a frame can display. Only a closed set
//! of providers is supported; everything else is a [`ParseFailure`], which is an
//! ordinary outcome rather than an error to report: the renderer skips the block
//! and the editor's video tool stays waiting for input.
//!
//! Rules, in precedence order:
//!
//! 1. `youtu.be/<id>` → `https://www.youtube.com/embed/<id>`
//! 2. `youtube.com/...?v=<id>` → `https://www.youtube.com/embed/<id>`
//! 3. `facebook.com/...` → the video plugin with the original URL as `href`
//! 4. `instagram.com/(p|reel)/<id>` → `https://www.instagram.com/<p|reel>/<id>/embed`
//!
//! [`resolve`] is pure: the same input always yields the same output.

mod providers;

pub use providers::{InstagramKind, Provider};

use url::Url;

/// Why no embed locator could be derived from a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("not a valid URL")]
    InvalidUrl,
    #[error("no video id in {provider} URL")]
    MissingVideoId { provider: Provider },
    #[error("{provider} URL does not point at an embeddable post")]
    UnsupportedPath { provider: Provider },
    #[error("unsupported video provider")]
    UnsupportedProvider,
}

/// A provider-specific embeddable resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedLocator {
    YouTube { id: String },
    Facebook { href: String },
    Instagram { kind: InstagramKind, id: String },
}

impl EmbedLocator {
    pub fn provider(&self) -> Provider {
        match self {
            EmbedLocator::YouTube { .. } => Provider::YouTube,
            EmbedLocator::Facebook { .. } => Provider::Facebook,
            EmbedLocator::Instagram { .. } => Provider::Instagram,
        }
    }

    /// The URL to place in a frame's `src`.
    pub fn embed_url(&self) -> String {
        match self {
            EmbedLocator::YouTube { id } => format!("https://www.youtube.com/embed/{id}"),
            EmbedLocator::Facebook { href } => format!(
                "https://www.facebook.com/plugins/video.php?href={}&show_text=0",
                urlencoding::encode(href)
            ),
            EmbedLocator::Instagram { kind, id } => {
                format!("https://www.instagram.com/{}/{id}/embed", kind.as_str())
            }
        }
    }
}

/// Resolves a pasted URL to an embed locator.
pub fn resolve(url: &str) -> Result<EmbedLocator, ParseFailure> {
    let input = url.trim();
    let parsed = parse_lenient(input)?;
    let host = parsed
        .host_str()
        .ok_or(ParseFailure::InvalidUrl)?
        .to_ascii_lowercase();

    match Provider::for_host(&host) {
        Some(Provider::YouTubeShort) => providers::youtube_short(&parsed),
        Some(Provider::YouTube) => providers::youtube_long(&parsed),
        Some(Provider::Facebook) => Ok(EmbedLocator::Facebook {
            href: input.to_string(),
        }),
        Some(Provider::Instagram) => providers::instagram(&parsed),
        None => Err(ParseFailure::UnsupportedProvider),
    }
}

/// Convenience: the frame `src` for a URL, if it resolves.
pub fn embed_url(url: &str) -> Option<String> {
    resolve(url).ok().map(|locator| locator.embed_url())
}

/// Parses an absolute http(s) URL. Authors often paste `youtu.be/abc` without
/// a scheme, so a bare `host/path` is retried with `https://`.
fn parse_lenient(input: &str) -> Result<Url, ParseFailure> {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return Err(ParseFailure::InvalidUrl);
    }

    let parsed = match Url::parse(input) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) if looks_like_host(input) => {
            Url::parse(&format!("https://{input}")).map_err(|_| ParseFailure::InvalidUrl)?
        }
        Err(_) => return Err(ParseFailure::InvalidUrl),
    };

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ParseFailure::InvalidUrl),
    }
}

fn looks_like_host(input: &str) -> bool {
    let head = input.split(['/', '?', '#']).next().unwrap_or_default();
    head.contains('.') && !head.starts_with('.') && !head.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://youtu.be/abc123", "https://www.youtube.com/embed/abc123")]
    #[case("https://youtu.be/abc123?t=42", "https://www.youtube.com/embed/abc123")]
    #[case("youtu.be/abc123", "https://www.youtube.com/embed/abc123")]
    #[case(
        "https://www.youtube.com/watch?v=abc123",
        "https://www.youtube.com/embed/abc123"
    )]
    #[case(
        "https://m.youtube.com/watch?feature=share&v=abc123",
        "https://www.youtube.com/embed/abc123"
    )]
    #[case(
        "https://www.instagram.com/reel/XYZ/",
        "https://www.instagram.com/reel/XYZ/embed"
    )]
    #[case(
        "https://instagram.com/p/Cabc_1/?igsh=1",
        "https://www.instagram.com/p/Cabc_1/embed"
    )]
    fn resolves_supported_urls(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolve(input).unwrap().embed_url(), expected);
    }

    #[rstest]
    #[case("https://youtube.com/watch")]
    #[case("https://www.youtube.com/watch?v=")]
    #[case("https://youtu.be/")]
    #[case("not a url")]
    #[case("")]
    #[case("https://www.instagram.com/xyz/")]
    #[case("https://vimeo.com/12345")]
    #[case("ftp://youtu.be/abc")]
    #[case("mailto:someone@youtube.com")]
    fn rejects_unsupported_urls(#[case] input: &str) {
        assert!(resolve(input).is_err(), "expected failure for {input:?}");
    }

    #[test]
    fn short_and_long_forms_agree() {
        assert_eq!(
            resolve("https://youtu.be/abc123"),
            resolve("https://www.youtube.com/watch?v=abc123")
        );
    }

    #[test]
    fn facebook_keeps_original_url_encoded() {
        let url = "https://www.facebook.com/watch/?v=10153231379946729";
        let locator = resolve(url).unwrap();
        assert_eq!(
            locator,
            EmbedLocator::Facebook {
                href: url.to_string()
            }
        );
        assert_eq!(
            locator.embed_url(),
            "https://www.facebook.com/plugins/video.php?href=https%3A%2F%2Fwww.facebook.com%2Fwatch%2F%3Fv%3D10153231379946729&show_text=0"
        );
    }

    #[test]
    fn failures_name_the_reason() {
        assert_eq!(resolve("not a url"), Err(ParseFailure::InvalidUrl));
        assert_eq!(
            resolve("https://youtube.com/watch"),
            Err(ParseFailure::MissingVideoId {
                provider: Provider::YouTube
            })
        );
        assert_eq!(
            resolve("https://www.instagram.com/xyz/"),
            Err(ParseFailure::UnsupportedPath {
                provider: Provider::Instagram
            })
        );
        assert_eq!(
            resolve("https://example.com/video.mp4"),
            Err(ParseFailure::UnsupportedProvider)
        );
    }

    #[test]
    fn lookalike_hosts_are_not_providers() {
        assert!(resolve("https://notyoutube.com/watch?v=abc").is_err());
        assert!(resolve("https://youtube.com.evil.example/watch?v=abc").is_err());
    }
}
