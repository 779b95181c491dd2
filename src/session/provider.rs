//! Where the session learns which file is currently of interest.

use std::path::PathBuf;

/// The host's "current document" as a capability handed to sessions.
///
/// `None` (or an empty path) means nothing is open.
pub trait DocumentProvider {
    fn current_path(&self) -> Option<PathBuf>;
}

/// A provider that always reports the same path.
#[derive(Debug, Clone, Default)]
pub struct FixedDocument(pub Option<PathBuf>);

impl FixedDocument {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self(Some(path.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl DocumentProvider for FixedDocument {
    fn current_path(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

impl<F> DocumentProvider for F
where
    F: Fn() -> Option<PathBuf>,
{
    fn current_path(&self) -> Option<PathBuf> {
        self()
    }
}
