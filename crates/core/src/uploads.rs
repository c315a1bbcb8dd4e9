//! Upload storage layout and file-name rules.
//!
//! Everything the API writes lives under one configurable upload root:
//!
//! ```text
//! <root>/ifc/                        uploaded model files
//! <root>/images/inspection_<id>/     inspection photos
//! <root>/images/ai_input/            images submitted for analysis
//! <root>/videos/                     videos submitted for analysis
//! <root>/results/ai_analysis/        masks, heatmaps, overlays
//! ```

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::types::DbId;

pub const IFC_DIR: &str = "ifc";
pub const IMAGES_DIR: &str = "images";
pub const VIDEOS_DIR: &str = "videos";
pub const RESULTS_DIR: &str = "results";

/// Subdirectories created under the upload root at startup.
pub const UPLOAD_SUBDIRS: &[&str] = &[IFC_DIR, IMAGES_DIR, VIDEOS_DIR, RESULTS_DIR];

/// Model file suffixes accepted by the upload endpoint.
const IFC_SUFFIXES: &[&str] = &[".ifc", ".IFC"];

/// Reject anything that is not an `.ifc` / `.IFC` file name.
pub fn validate_ifc_filename(filename: &str) -> Result<(), CoreError> {
    if IFC_SUFFIXES.iter().any(|s| filename.ends_with(s)) {
        Ok(())
    } else {
        Err(CoreError::Validation("File must be .ifc format".into()))
    }
}

/// Strip any directory components a client put in a multipart file name.
///
/// Returns `fallback` when nothing usable is left.
pub fn sanitize_file_name(raw: &str, fallback: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if base.is_empty() || base == "." || base == ".." {
        fallback.to_string()
    } else {
        base.to_string()
    }
}

/// Extension including the leading dot (`".jpg"`), or empty.
pub fn extension_with_dot(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

/// File stem used to name analysis artefacts.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string()
}

pub fn ifc_dir(root: &Path) -> PathBuf {
    root.join(IFC_DIR)
}

pub fn inspection_photo_dir(root: &Path, inspection_id: DbId) -> PathBuf {
    root.join(IMAGES_DIR).join(format!("inspection_{inspection_id}"))
}

/// Stored name of the `index`-th (0-based) photo of an inspection.
pub fn inspection_photo_name(code: &str, index: usize, original_name: &str) -> String {
    format!(
        "{}_img{}{}",
        sanitize_file_name(code, "inspection"),
        index + 1,
        extension_with_dot(original_name)
    )
}

pub fn ai_input_dir(root: &Path) -> PathBuf {
    root.join(IMAGES_DIR).join("ai_input")
}

pub fn video_dir(root: &Path) -> PathBuf {
    root.join(VIDEOS_DIR)
}

pub fn ai_results_dir(root: &Path) -> PathBuf {
    root.join(RESULTS_DIR).join("ai_analysis")
}

/// Create the upload root and its fixed subdirectories.
pub async fn ensure_upload_dirs(root: &Path) -> std::io::Result<()> {
    for sub in UPLOAD_SUBDIRS {
        tokio::fs::create_dir_all(root.join(sub)).await?;
    }
    Ok(())
}
