//! Turns command-line paths into file candidates, the way a picker would.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;
use watermark_core::{FileCandidate, PickMode};
use watermark_logging::wm_debug;

/// Media type a browser would declare for a file with this name.
pub fn media_type_for(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    let media_type = match ext.to_ascii_lowercase().as_str() {
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "opus" => "audio/opus",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "aif" | "aiff" => "audio/aiff",
        _ => return None,
    };
    Some(media_type)
}

pub fn collect_candidates(paths: &[PathBuf], mode: PickMode) -> Result<Vec<FileCandidate>> {
    let mut candidates = Vec::new();
    for path in paths {
        match mode {
            PickMode::Files => candidates.push(file_candidate(path)?),
            PickMode::Directory => candidates.extend(directory_candidates(path)?),
        }
    }
    wm_debug!("collected {} candidate(s)", candidates.len());
    Ok(candidates)
}

fn file_candidate(path: &Path) -> Result<FileCandidate> {
    if path.is_dir() {
        bail!("{} is a directory; pass --dir to submit it", path.display());
    }
    if !path.is_file() {
        bail!("{} does not exist", path.display());
    }
    let name = display_name(path)?;
    Ok(candidate(path.to_path_buf(), name))
}

fn directory_candidates(root: &Path) -> Result<Vec<FileCandidate>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    let root_name = root
        .canonicalize()
        .with_context(|| format!("resolving {}", root.display()))
        .and_then(|resolved| display_name(&resolved))?;

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let nested = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} escaped {}", entry.path().display(), root.display()))?;
        let mut relative = root_name.clone();
        for component in nested.components() {
            relative.push('/');
            relative.push_str(&component.as_os_str().to_string_lossy());
        }
        let name = display_name(entry.path())?;
        candidates.push(candidate(entry.path().to_path_buf(), name).with_relative_path(relative));
    }
    Ok(candidates)
}

fn candidate(source: PathBuf, name: String) -> FileCandidate {
    let media_type = media_type_for(&name);
    let candidate = FileCandidate::new(source, name);
    match media_type {
        Some(media_type) => candidate.with_media_type(media_type),
        None => candidate,
    }
}

fn display_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn media_types_follow_extension() {
        assert_eq!(media_type_for("a.WAV"), Some("audio/wav"));
        assert_eq!(media_type_for("b.m4a"), Some("audio/mp4"));
        assert_eq!(media_type_for("notes.txt"), None);
        assert_eq!(media_type_for("README"), None);
    }

    #[test]
    fn directory_pick_prefixes_root_name_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("album");
        fs::create_dir_all(root.join("disc2")).unwrap();
        fs::write(root.join("b.wav"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("disc2").join("c.flac"), "c").unwrap();

        let candidates = collect_candidates(&[root], PickMode::Directory).unwrap();

        let relative: Vec<_> = candidates
            .iter()
            .map(|candidate| candidate.relative_path.clone().unwrap())
            .collect();
        assert_eq!(relative, vec!["album/a.txt", "album/b.wav", "album/disc2/c.flac"]);
        assert_eq!(candidates[0].media_type, None);
        assert_eq!(candidates[2].media_type.as_deref(), Some("audio/flac"));
    }

    #[test]
    fn file_pick_uses_bare_name() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("take.mp3");
        fs::write(&file, "x").unwrap();

        let candidates = collect_candidates(&[file.clone()], PickMode::Files).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "take.mp3");
        assert_eq!(candidates[0].relative_path, None);
        assert_eq!(candidates[0].source, file);
    }

    #[test]
    fn file_pick_rejects_directories() {
        let temp = TempDir::new().unwrap();

        let err = collect_candidates(&[temp.path().to_path_buf()], PickMode::Files).unwrap_err();

        assert!(err.to_string().contains("--dir"));
    }
}
