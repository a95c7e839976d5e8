use crate::{Result, VfsError};

/// Normalizes a path written in platform-independent notation.
///
/// Leading, trailing and repeated `/` are dropped, so `""` and `"/"` both
/// name the root.
///
/// # Errors
///
/// Returns [`VfsError::BadFilename`] if the path contains `\` or `:`, or a
/// `.` or `..` component.
pub fn sanitize(path: &str) -> Result<String> {
    if path.contains(|c| c == '\\' || c == ':') {
        return Err(VfsError::BadFilename(path.into()));
    }

    let mut sanitized = String::with_capacity(path.len());
    for component in path.split('/').filter(|component| !component.is_empty()) {
        if component == "." || component == ".." {
            return Err(VfsError::BadFilename(path.into()));
        }

        if !sanitized.is_empty() {
            sanitized.push('/');
        }
        sanitized.push_str(component);
    }

    Ok(sanitized)
}

/// Returns the part of `path` that lives under `mount_point`, if any.
///
/// Both arguments must already be sanitized.
#[must_use]
pub fn strip_mount_point<'a>(path: &'a str, mount_point: &str) -> Option<&'a str> {
    if mount_point.is_empty() {
        return Some(path);
    }

    if path == mount_point {
        return Some("");
    }

    path.strip_prefix(mount_point)?.strip_prefix('/')
}

/// Returns the first component of `mount_point` below `dir` when `dir` is a
/// proper ancestor of the mount point.
///
/// Mount points imply the existence of their ancestors, so these components
/// show up as directories even if no archive contains them.
#[must_use]
pub fn child_of_mount_point<'a>(dir: &str, mount_point: &'a str) -> Option<&'a str> {
    let rest = if dir.is_empty() {
        mount_point
    } else {
        mount_point.strip_prefix(dir)?.strip_prefix('/')?
    };

    rest.split('/').next().filter(|component| !component.is_empty())
}
