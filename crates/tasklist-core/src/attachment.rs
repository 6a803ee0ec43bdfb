use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub task_id: String,
    /// Publicly fetchable path, always `/uploads/<blob name>`.
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}

/// One of the accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
}

impl ImageType {
    pub fn mime(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Gif => "image/gif",
        }
    }

    /// File extensions that are served back as this type. The first one is
    /// used when the uploaded name carries none of them.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageType::Jpeg => &["jpg", "jpeg"],
            ImageType::Png => &["png"],
            ImageType::Gif => &["gif"],
        }
    }

    fn from_mime(essence: &str) -> Option<Self> {
        [ImageType::Jpeg, ImageType::Png, ImageType::Gif]
            .into_iter()
            .find(|t| t.mime() == essence)
    }
}

/// Check an upload's declared content type against the allow-list.
///
/// Parameters such as `; charset=...` are ignored and the comparison is
/// case-insensitive.
pub fn check_content_type(content_type: &str) -> Result<ImageType, CoreError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ImageType::from_mime(&essence)
        .ok_or_else(|| CoreError::UnsupportedContentType(content_type.to_string()))
}
