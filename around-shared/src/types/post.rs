//! Post document types.
//!
//! This module defines the post shape stored in the search index and returned
//! to clients.

use serde::{Deserialize, Serialize};

use crate::types::coordinate::Coordinate;

/// A geo-tagged text post.
///
/// On the wire and in the search index a post looks like:
///
/// ```json
/// { "user": "jack", "message": "hello", "location": { "lat": 37.0, "lon": -118.0 }, "url": "" }
/// ```
///
/// `url` holds the media link and is the empty string when nothing was
/// attached. A stored `""`, `null` or missing `url` all decode to `None`, so
/// JSON round trips are lossless for every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Display name of the posting user.
    #[serde(rename = "user")]
    pub author: String,

    /// Free text body.
    pub message: String,

    /// Where the post was made.
    pub location: Coordinate,

    /// Public URL of the attached media, if any.
    #[serde(rename = "url", default, with = "empty_as_none")]
    pub media_url: Option<String>,
}

impl Post {
    /// Create a post without media.
    pub fn new(author: impl Into<String>, message: impl Into<String>, location: Coordinate) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
            location,
            media_url: None,
        }
    }

    /// Return this post with its media URL set.
    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }
}

/// A post paired with the identifier it is stored under in the search index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPost {
    pub id: String,
    pub post: Post,
}

impl IndexedPost {
    pub fn new(id: impl Into<String>, post: Post) -> Self {
        Self {
            id: id.into(),
            post,
        }
    }
}

mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|url| !url.is_empty()))
    }
}
