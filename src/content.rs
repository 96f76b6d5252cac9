//! Extracted-content data model.
//!
//! The extraction service returns one of six known shapes, externally
//! tagged (`{"Tweet": {...}}`). Anything else is carried as
//! `Unsupported` rather than rejected, so a new shape on the wire can
//! never break feed parsing.

use serde::{Deserialize, Serialize};

/// Storage prefix the backend uses for media it rehosts itself.
pub const MEDIA_STORAGE_PREFIX: &str = "/media/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetMedia {
    #[serde(rename = "Image", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "Video", default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetContent {
    pub author_name: String,
    pub author_handle: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<TweetMedia>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleContent {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TikTokVideoContent {
    pub video_url: String,
    pub author_handle: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramImageContent {
    pub image_url: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramReelContent {
    pub video_url: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericLinkContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The six known content shapes, externally tagged on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtractedContent {
    Tweet(TweetContent),
    Article(ArticleContent),
    TikTokVideo(TikTokVideoContent),
    InstagramImage(InstagramImageContent),
    InstagramReel(InstagramReelContent),
    GenericLink(GenericLinkContent),
}

/// Closed envelope over the known shapes plus a total fallback.
///
/// Deserialization never fails: a payload matching none of the six
/// shapes lands in `Unsupported` with the raw value preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentEnvelope {
    Known(ExtractedContent),
    Unsupported(serde_json::Value),
}

/// Variant tag of an envelope, usable for exhaustive dispatch without
/// touching the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Tweet,
    Article,
    TikTokVideo,
    InstagramImage,
    InstagramReel,
    GenericLink,
    Unsupported,
}

impl ContentEnvelope {
    /// Total, pure classification; unknown shapes map to `Unsupported`.
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentEnvelope::Known(ExtractedContent::Tweet(_)) => ContentKind::Tweet,
            ContentEnvelope::Known(ExtractedContent::Article(_)) => ContentKind::Article,
            ContentEnvelope::Known(ExtractedContent::TikTokVideo(_)) => ContentKind::TikTokVideo,
            ContentEnvelope::Known(ExtractedContent::InstagramImage(_)) => {
                ContentKind::InstagramImage
            }
            ContentEnvelope::Known(ExtractedContent::InstagramReel(_)) => {
                ContentKind::InstagramReel
            }
            ContentEnvelope::Known(ExtractedContent::GenericLink(_)) => ContentKind::GenericLink,
            ContentEnvelope::Unsupported(_) => ContentKind::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ContentEnvelope::Unsupported(_))
    }
}

/// Resolve a media reference for display. Relative storage paths are
/// joined onto the media origin; anything else is assumed to already be
/// an absolute url and passed through. Pure, no I/O.
pub fn resolve_media_url(path: Option<&str>, media_origin: Option<&str>) -> Option<String> {
    let path = path?;
    if path.starts_with(MEDIA_STORAGE_PREFIX) {
        let origin = media_origin?;
        Some(format!("{}{}", origin.trim_end_matches('/'), path))
    } else {
        Some(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_known_shape() {
        let raw = r#"{"Tweet": {"author_name": "n", "author_handle": "h", "text": "t",
                       "media": {"Video": "/media/clip.mp4"}}}"#;
        let env: ContentEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(env.kind(), ContentKind::Tweet);

        let raw = r#"{"GenericLink": {"title": "t"}}"#;
        let env: ContentEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(env.kind(), ContentKind::GenericLink);
        assert!(env.is_supported());
    }

    #[test]
    fn unknown_shape_falls_back_without_error() {
        let raw = r#"{"Podcast": {"episode": 12}}"#;
        let env: ContentEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(env.kind(), ContentKind::Unsupported);
        assert!(!env.is_supported());

        // Even a non-object payload is carried, never rejected.
        let env: ContentEnvelope = serde_json::from_str("42").unwrap();
        assert_eq!(env.kind(), ContentKind::Unsupported);
    }

    #[test]
    fn media_url_resolution() {
        // Absent path resolves to nothing.
        assert_eq!(resolve_media_url(None, Some("http://api")), None);

        // Relative storage path joins onto the origin.
        assert_eq!(
            resolve_media_url(Some("/media/a.png"), Some("http://api/")),
            Some("http://api/media/a.png".to_string())
        );

        // Relative path without an origin: capability disabled.
        assert_eq!(resolve_media_url(Some("/media/a.png"), None), None);

        // Absolute urls pass through untouched, origin or not.
        assert_eq!(
            resolve_media_url(Some("https://cdn/x.jpg"), None),
            Some("https://cdn/x.jpg".to_string())
        );
    }
}
