/// Source files picked by the user
///
/// A source file is either backed by a path on disk (the native picker) or
/// by an in-memory buffer. Its bytes are only read when a conversion runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where the bytes of a [`SourceFile`] live
#[derive(Debug, Clone)]
pub enum FileContents {
    /// A file on disk, read lazily
    Path(PathBuf),
    /// Bytes already in memory
    Memory(Arc<[u8]>),
}

/// A file selected for conversion
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    declared_type: Option<String>,
    contents: FileContents,
}

impl SourceFile {
    /// Create a source file backed by a path on disk.
    ///
    /// The name is the final path component; the declared media type is
    /// guessed from the extension and is informational only.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let declared_type = declared_type_for(&path);

        Self {
            name,
            declared_type,
            contents: FileContents::Path(path),
        }
    }

    /// Create a source file from bytes already in memory
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: Option<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type,
            contents: FileContents::Memory(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Media type reported by the picker, never used for classification
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    pub fn contents(&self) -> &FileContents {
        &self.contents
    }

    /// Read the full byte content of the file
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.contents {
            FileContents::Path(path) => tokio::fs::read(path).await,
            FileContents::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

fn declared_type_for(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    image::ImageFormat::from_extension(&ext).map(|format| format.to_mime_type().to_string())
}
