use std::{fs, io::Read, path::Path};

use crate::error::SlideError;

/// File extensions of present documents.
pub const EXTENSIONS: &[&str] = &["slide", "article"];

/// Reads a whole document source in one eager read.
pub fn read_source<R: Read>(mut reader: R) -> Result<String, SlideError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

/// Reads a present file from disk.
pub fn read_file(path: &Path) -> Result<String, SlideError> {
    let file = fs::File::open(path)?;
    read_source(file)
}

/// Whether `path` names a present document, going by its extension.
pub fn is_present_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}
