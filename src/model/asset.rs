use crate::foundation::error::{ReelError, ReelResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Media family of an asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

/// Background media reference supplied by the asset library.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    /// File path, relative to the project document or absolute.
    pub url: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    pub kind: MediaKind,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Asset {
    /// Asset with only the required fields set.
    pub fn new(id: impl Into<String>, url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            duration: None,
            width: None,
            height: None,
            kind,
            created_at: None,
        }
    }

    /// True when the file extension names an SVG document.
    pub fn is_svg(&self) -> bool {
        Path::new(&self.url)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
    }
}

/// Resolve a media path against `root`.
///
/// Absolute paths are kept. Relative paths are normalized and must stay inside `root`.
pub fn resolve_media_path(root: &Path, source: &str) -> ReelResult<PathBuf> {
    let p = Path::new(source);
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    Ok(root.join(normalize_rel_path(source)?))
}

/// Normalize a relative media path into a stable, forward-slash form.
pub(crate) fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("media path must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::validation("media path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("media path must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation("media path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/model/asset.rs"]
mod tests;
