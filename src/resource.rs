//! Resource references and the host-injected resolver.
//!
//! The core never loads textures or fonts itself. Objects store a
//! [`ResourceRef`] — the filename plus whether the host managed to
//! resolve it — and the document queries a [`ResourceResolver`] supplied
//! by the host whenever a reference is created or replaced. Objects whose
//! reference is [`ResourceStatus::Missing`] render with the host's
//! fallback resource and are reported by
//! [`missed_files`](crate::document::Document::missed_files).

use serde::{Deserialize, Serialize};

/// Whether the host resolved a resource filename to a real resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceStatus {
    /// The file resolved to a loaded resource.
    Resolved,
    /// The file could not be resolved; the object uses the host's
    /// fallback resource.
    Missing,
}

/// A reference to an external resource (texture or font) by filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource filename, as stored in the document.
    pub path: String,
    /// Resolution outcome reported by the host.
    pub status: ResourceStatus,
}

impl ResourceRef {
    /// Creates a reference by asking `resolver` about `path`.
    pub fn resolve(path: impl Into<String>, resolver: &dyn ResourceResolver) -> Self {
        let path = path.into();
        let status = resolver.resolve(&path);
        Self { path, status }
    }

    /// Whether this reference fell back to the host's default resource.
    pub fn is_missing(&self) -> bool {
        self.status == ResourceStatus::Missing
    }
}

/// Host-side resource lookup.
///
/// Implemented by the host application over its texture/font managers.
/// The core calls it synchronously; long-running loads must be finished
/// (or short-circuited to [`ResourceStatus::Missing`]) before the call
/// returns.
pub trait ResourceResolver {
    /// Reports whether `path` resolves to a loadable resource.
    fn resolve(&self, path: &str) -> ResourceStatus;
}

/// Closures are resolvers; convenient for tests and small hosts.
impl<F: Fn(&str) -> ResourceStatus> ResourceResolver for F {
    fn resolve(&self, path: &str) -> ResourceStatus {
        self(path)
    }
}

/// A resolver that reports every path as resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveAll;

impl ResourceResolver for ResolveAll {
    fn resolve(&self, _path: &str) -> ResourceStatus {
        ResourceStatus::Resolved
    }
}
