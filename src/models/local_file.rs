//! Local file staged for upload.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl LocalFile {
    /// Blob name used for the upload (the file name without directories).
    pub fn blob_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
