use std::fs;
use std::path::{Path, PathBuf};

use semsearch_core::{Document, Metadata, Scalar};

use crate::IngestionError;

/// Turns the file names under a directory into documents: the searchable
/// text describes name, relative path, and extension, and the same triple
/// lands in metadata for display. The document id is the relative path, so
/// re-indexing the same directory upserts instead of duplicating.
pub struct FileNameLoader {
    base: PathBuf,
    recursive: bool,
}

impl FileNameLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            recursive: true,
        }
    }

    pub fn recursive(mut self, value: bool) -> Self {
        self.recursive = value;
        self
    }

    pub fn load(&self) -> Result<Vec<Document>, IngestionError> {
        if !self.base.is_dir() {
            return Err(IngestionError::NotADirectory(
                self.base.to_string_lossy().to_string(),
            ));
        }

        let mut files = Vec::new();
        collect_files(&self.base, self.recursive, &mut files)?;
        files.sort();

        let mut docs = Vec::with_capacity(files.len());
        for path in files {
            let rel_path = path
                .strip_prefix(&self.base)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_default();

            let content = format!(
                "file name {file_name} path {rel_path} extension {extension}"
            );

            let mut metadata = Metadata::new();
            metadata.insert("file_name".to_string(), Scalar::Str(file_name));
            metadata.insert("relative_path".to_string(), Scalar::Str(rel_path.clone()));
            metadata.insert("extension".to_string(), Scalar::Str(extension));

            docs.push(Document {
                id: rel_path,
                content,
                metadata,
                embedding: None,
            });
        }
        Ok(docs)
    }
}

fn collect_files(
    dir: &Path,
    recursive: bool,
    out: &mut Vec<PathBuf>,
) -> Result<(), IngestionError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, recursive, out)?;
            }
        } else {
            out.push(path);
        }
    }
    Ok(())
}
