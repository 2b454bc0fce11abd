use std::path::PathBuf;

/// Extensions accepted regardless of the declared media type.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "ogg", "opus", "m4a"];

/// Warning shown when a picker selection contains no audio.
pub const PICK_WARNING: &str = "No audio files found. Please select audio files.";

/// Warning shown when every dropped item is non-audio.
pub const DROP_WARNING: &str = "Invalid file type(s). Please drop audio files.";

/// How the user chose the files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickMode {
    /// Individual files; entries are named by their bare filename.
    #[default]
    Files,
    /// A whole directory; entries keep their root-relative path.
    Directory,
}

/// Where a pick came from. Only affects the warning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickOrigin {
    #[default]
    Picker,
    Drop,
}

impl PickOrigin {
    pub fn warning(self) -> &'static str {
        match self {
            PickOrigin::Picker => PICK_WARNING,
            PickOrigin::Drop => DROP_WARNING,
        }
    }
}

/// A raw file offered by a picker or a drop, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub source: PathBuf,
    /// Bare filename.
    pub name: String,
    /// Root-prefixed path, only present for directory picks.
    pub relative_path: Option<String>,
    /// Declared media type, e.g. `audio/wav`.
    pub media_type: Option<String>,
}

impl FileCandidate {
    pub fn new(source: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            relative_path: None,
            media_type: None,
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

/// An accepted audio file owned by one workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub source: PathBuf,
    /// Multipart entry name: bare filename or directory-prefixed path.
    pub relative_path: String,
    pub media_type: Option<String>,
}

/// Output of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub accepted: Vec<SelectedFile>,
    pub rejected: usize,
}

impl Selection {
    /// Nothing was offered at all, e.g. a cancelled dialog.
    pub fn is_empty_pick(&self) -> bool {
        self.accepted.is_empty() && self.rejected == 0
    }
}

pub fn is_audio(candidate: &FileCandidate) -> bool {
    let declared_audio = candidate
        .media_type
        .as_deref()
        .is_some_and(|media_type| media_type.starts_with("audio/"));
    declared_audio || has_audio_extension(&candidate.name)
}

fn has_audio_extension(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => AUDIO_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Splits a raw pick into accepted audio files (order preserved) and a rejected count.
pub fn classify(candidates: Vec<FileCandidate>, mode: PickMode) -> Selection {
    let mut selection = Selection::default();
    for candidate in candidates {
        if !is_audio(&candidate) {
            selection.rejected += 1;
            continue;
        }
        let relative_path = match (mode, candidate.relative_path) {
            (PickMode::Directory, Some(path)) if !path.is_empty() => path,
            _ => candidate.name,
        };
        selection.accepted.push(SelectedFile {
            source: candidate.source,
            relative_path,
            media_type: candidate.media_type,
        });
    }
    selection
}
