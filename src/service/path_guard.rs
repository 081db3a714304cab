//! Containment checks for caller-supplied paths

use std::path::{Component, Path, PathBuf};

use crate::error::{ApiError, ApiResult};

/// Lexically resolve `.` and `..` without touching the filesystem.
/// `..` at the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && !path.is_absolute() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Whether `name` is exactly one normal path component
pub fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

/// Restricts caller paths to a set of allowed roots.
///
/// An empty root list accepts every path.
#[derive(Debug, Clone, Default)]
pub struct PathGuard {
    allowed_roots: Vec<PathBuf>,
}

impl PathGuard {
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        Self {
            allowed_roots: roots
                .into_iter()
                .map(|root| normalize_path(root.as_ref()))
                .collect(),
        }
    }

    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn is_restricted(&self) -> bool {
        !self.allowed_roots.is_empty()
    }

    pub fn allows(&self, path: &Path) -> bool {
        if !self.is_restricted() {
            return true;
        }
        let normalized = normalize_path(path);
        self.allowed_roots.iter().any(|root| normalized.starts_with(root))
    }

    /// Fail with `PermissionDenied` unless `path` lies under an allowed root
    pub fn check(&self, path: &Path) -> ApiResult<()> {
        if self.allows(path) {
            Ok(())
        } else {
            log::warn!("Rejected path outside allowed roots: {}", path.display());
            Err(ApiError::PermissionDenied(format!(
                "Access to {} is not allowed",
                path.display()
            )))
        }
    }
}
