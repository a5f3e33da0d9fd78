use std::path::PathBuf;

/// An audio file found on disk, before any metadata has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Bare file name; this is what the published site streams by.
    pub file_name: String,
}

impl SourceFile {
    /// File name without its extension, used as the fallback title.
    pub fn stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }

    /// Whether the name can be written into a metadata record verbatim.
    pub fn is_record_safe(&self) -> bool {
        !self
            .file_name
            .chars()
            .any(|c| c == '=' || c == ')' || c == '\n' || c == '\r')
    }
}
