use serde::{Deserialize, Serialize};

/// Content category stamped on every stored message record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
    File,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::File => "file",
        }
    }

    /// Parse a stored tag. Unknown tags are a `None`, not a panic — the
    /// caller decides how loudly to fail.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(ContentKind::Text),
            "image" => Some(ContentKind::Image),
            "file" => Some(ContentKind::File),
            _ => None,
        }
    }
}

/// Category a binary attachment may declare. `Text` is excluded on
/// purpose: a blob payload can never masquerade as an inline text record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

impl AttachmentKind {
    /// Classify a declared MIME type. Only the top-level type is consulted,
    /// and only to choose between the image and generic categories.
    pub fn from_mime(mime: &str) -> Self {
        match mime.split('/').next() {
            Some("image") => AttachmentKind::Image,
            _ => AttachmentKind::File,
        }
    }
}

impl From<AttachmentKind> for ContentKind {
    fn from(kind: AttachmentKind) -> Self {
        match kind {
            AttachmentKind::Image => ContentKind::Image,
            AttachmentKind::File => ContentKind::File,
        }
    }
}
