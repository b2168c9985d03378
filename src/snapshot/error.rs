//! Snapshot decoding errors.

use std::fmt;

use crate::layer::TreeError;

/// Errors from decoding a binary document snapshot.
///
/// Decoding is atomic: any error leaves the caller without a document
/// rather than with a half-restored one.
#[derive(Debug)]
pub enum SnapshotError {
    /// The byte stream is not a valid snapshot.
    FormatError(String),
    /// The snapshot was written by an unknown format version.
    UnsupportedVersion { found: u32 },
    /// The stored active-layer path does not lead to a leaf layer.
    InvalidActiveLayer,
    /// The snapshot describes a root that is not a group.
    InvalidRoot,
    /// The stored tree violates a structural limit.
    Tree(TreeError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FormatError(msg) => write!(f, "snapshot format error: {msg}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported snapshot version {found}")
            }
            Self::InvalidActiveLayer => {
                write!(f, "snapshot active-layer path does not lead to a layer")
            }
            Self::InvalidRoot => write!(f, "snapshot root is not a group"),
            Self::Tree(e) => write!(f, "snapshot tree error: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TreeError> for SnapshotError {
    fn from(e: TreeError) -> Self {
        Self::Tree(e)
    }
}
