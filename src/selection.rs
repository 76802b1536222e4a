use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Whether a target accepts one input file or an ordered list of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    Single,
    Multi,
}

/// A conversion the server knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub mode: SelectionMode,
    /// Example options payload shown to the user.
    pub options_hint: &'static str,
}

/// Supported conversions, in display order.
pub const TARGETS: &[TargetInfo] = &[
    TargetInfo {
        id: "mp4->mp3",
        label: "MP4 → MP3 (extract audio)",
        mode: SelectionMode::Single,
        options_hint: r#"{"bitrate":"128k"}"#,
    },
    TargetInfo {
        id: "pdf->jpg",
        label: "PDF → JPG (pages as images)",
        mode: SelectionMode::Single,
        options_hint: r#"{"dpi":300}"#,
    },
    TargetInfo {
        id: "jpg->pdf",
        label: "Image(s) → PDF (merge multiple)",
        mode: SelectionMode::Multi,
        options_hint: r#"{"dpi":300}"#,
    },
    TargetInfo {
        id: "docx->pdf",
        label: "DOCX → PDF",
        mode: SelectionMode::Single,
        options_hint: "{}",
    },
];

/// Opaque identifier of a conversion, e.g. `pdf->jpg`.
///
/// Identifiers outside [`TARGETS`] are passed through untouched in single-file
/// mode; the server rejects what it does not support.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionTarget(String);

impl ConversionTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn info(&self) -> Option<&'static TargetInfo> {
        TARGETS.iter().find(|t| t.id == self.0)
    }

    pub fn mode(&self) -> SelectionMode {
        self.info().map_or(SelectionMode::Single, |t| t.mode)
    }

    pub fn options_hint(&self) -> &'static str {
        self.info().map_or("", |t| t.options_hint)
    }
}

impl fmt::Display for ConversionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversionTarget {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, naming it after its final path component.
    pub async fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ConvertError::FileRead {
                path: path.display().to_string(),
                source,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn size_kb(&self) -> usize {
        (self.bytes.len() + 512) / 1024
    }
}

/// Ordered files chosen for one submission.
///
/// In single-file mode the selection never holds more than one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSelection {
    mode: SelectionMode,
    files: Vec<InputFile>,
}

impl InputSelection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            files: Vec::new(),
        }
    }

    pub fn for_target(target: &ConversionTarget) -> Self {
        Self::new(target.mode())
    }

    /// Replaces the selection with `incoming`. Single mode keeps only the
    /// first file; an empty `incoming` leaves the selection as it was.
    pub fn replace_with(&mut self, incoming: Vec<InputFile>) {
        if incoming.is_empty() {
            return;
        }
        self.files = match self.mode {
            SelectionMode::Multi => incoming,
            SelectionMode::Single => incoming.into_iter().take(1).collect(),
        };
    }

    /// Removes the file at `index`; out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<InputFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn files(&self) -> &[InputFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
