use serde::{Deserialize, Serialize};

/// In-memory file payload, the equivalent of a browser `File`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlob {
    pub name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl FileBlob {
    pub fn new(name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    /// Empty file carrying only a name, used when the stored payload is missing.
    pub fn placeholder(name: &str) -> Self {
        Self::new(name, guess_mime_type(name), Vec::new())
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

pub fn guess_mime_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "rtf" => "application/rtf",
        "odt" => "application/vnd.oasis.opendocument.text",
        _ => "application/octet-stream",
    }
}

/// Builder for the file list assigned to `<input type="file">`.
#[derive(Debug, Clone, Default)]
pub struct DataTransfer {
    items: Vec<FileBlob>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: FileBlob) {
        self.items.push(file);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn files(&self) -> Vec<FileBlob> {
        self.items.clone()
    }
}
