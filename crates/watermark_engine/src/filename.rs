use std::path::{Component, Path, PathBuf};

/// Suffix of batch archives; such names are saved unchanged.
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Marker inserted before the extension of a retrieved artifact.
pub const WATERMARK_MARKER: &str = "_wm";

/// `track.wav` -> `track_wm.wav`, `bundle.zip` -> `bundle.zip`.
///
/// Only the last path component is rewritten; names without an extension are
/// returned unchanged.
pub fn derive_artifact_name(display_name: &str) -> String {
    if display_name.ends_with(ARCHIVE_SUFFIX) {
        return display_name.to_string();
    }
    let stem_start = display_name.rfind('/').map_or(0, |idx| idx + 1);
    let last = &display_name[stem_start..];
    match last.rfind('.') {
        Some(dot) if dot + 1 < last.len() => {
            let split = stem_start + dot;
            format!(
                "{}{WATERMARK_MARKER}{}",
                &display_name[..split],
                &display_name[split..]
            )
        }
        _ => display_name.to_string(),
    }
}

/// Keeps the normal components of `name` so it can be joined under an output dir.
///
/// Returns `None` when nothing usable is left.
pub fn safe_relative_path(name: &str) -> Option<PathBuf> {
    let cleaned: PathBuf = Path::new(name)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    if cleaned.as_os_str().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
