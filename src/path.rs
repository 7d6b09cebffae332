use crate::error::FsError;

// ── Path functions ──────────────────────────────────────────────────────────

/// Split a slash-delimited path into its non-empty segments.
///
/// Leading, trailing and duplicate slashes are tolerated; `""` and `"/"`
/// (and any run of slashes) yield no segments and denote the root. `.` and
/// `..` are ordinary segment names, not navigation.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Split a path into `(directory_path, entry_name)`: everything before the
/// final non-empty segment, and the final segment itself.
///
/// Returns an error when the path has no final segment (`""`, `"/"`, `"//"`).
pub fn split_entry(path: &str) -> Result<(&str, &str), FsError> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(FsError::InvalidPath(format!(
            "Path has no final segment: {:?}",
            path
        )));
    }
    match trimmed.rfind('/') {
        Some(pos) => Ok((&trimmed[..pos], &trimmed[pos + 1..])),
        None => Ok(("", trimmed)),
    }
}

/// Validate an entry name supplied separately from a path (create, rename).
pub fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() {
        return Err(FsError::InvalidPath("Name cannot be empty".to_string()));
    }
    if name.contains('/') {
        return Err(FsError::InvalidPath(format!(
            "Name cannot contain '/': {:?}",
            name
        )));
    }
    Ok(())
}

/// True when `descendant` lies strictly below `ancestor` (segment-wise).
pub fn is_strict_descendant(ancestor: &str, descendant: &str) -> bool {
    let anc = segments(ancestor);
    let desc = segments(descendant);
    desc.len() > anc.len() && desc[..anc.len()] == anc[..]
}

// ── Tests ───────────────────────────────────────────────────────────────────
