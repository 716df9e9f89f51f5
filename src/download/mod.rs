//! Download artifacts for the current rendering

pub mod file;

pub use file::ExportStore;

use crate::prompt::RenderingStyle;

const FALLBACK_BASENAME: &str = "design";
const DEFAULT_SUFFIX: &str = "3d-multi-view";
const UPSCALED_SUFFIX: &str = "upscaled";

/// A rendered image ready to be saved by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// `<basename>-<style>-<suffix>.png`, where basename is the first source
/// image's name without its last extension.
///
/// Only the final path component of the source name is used, with control
/// characters and quotes removed. Names without an extension, or with
/// nothing usable left in the stem, fall back to `design`.
pub fn download_filename(source_name: Option<&str>, style: RenderingStyle, upscaled: bool) -> String {
    let basename = source_name
        .and_then(safe_stem)
        .unwrap_or_else(|| FALLBACK_BASENAME.to_string());

    let suffix = if upscaled { UPSCALED_SUFFIX } else { DEFAULT_SUFFIX };

    format!("{}-{}-{}.png", basename, style, suffix)
}

/// Stem of a client-supplied name that is safe as a file name and in a header
fn safe_stem(name: &str) -> Option<String> {
    // Both separators, whatever the host platform
    let file_name = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);
    let (stem, _) = file_name.rsplit_once('.')?;

    let cleaned: String = stem.chars().filter(|c| !c.is_control() && *c != '"').collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        None
    } else {
        Some(cleaned.to_string())
    }
}
