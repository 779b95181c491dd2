//! Preview outcome for a selected revision.

use crate::thumbnail::ThumbnailImage;

/// Why a revision has no preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// The file did not exist at that revision.
    MissingAtRevision,
    /// The content is neither a decodable image nor a container with a preview member.
    NoPreview,
}

#[derive(Debug, Clone)]
pub enum Preview {
    Ready(ThumbnailImage),
    Unavailable(Unavailable),
}

impl Preview {
    pub fn image(&self) -> Option<&ThumbnailImage> {
        match self {
            Preview::Ready(image) => Some(image),
            Preview::Unavailable(_) => None,
        }
    }
}
