use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;

/// Raw text plus the label it will be stored under.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub source_label: String,
    pub path: PathBuf,
    pub text: String,
}

/// Loads plain-text sources from disk. Only `.txt` files are picked up;
/// extraction from richer formats happens upstream.
#[derive(Default)]
pub struct DataProcessor;

impl DataProcessor {
    pub fn new() -> Self { Self }

    pub fn load_directory(&self, data_dir: &Path) -> Result<Vec<SourceDocument>> {
        let files = self.list_txt_files(data_dir);
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        let mut documents = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "loading file {}/{}", file_index + 1, files.len());
            documents.push(self.load_file(file_path)?);
        }
        info!(dir = %data_dir.display(), files = documents.len(), "loaded documents");
        Ok(documents)
    }

    pub fn load_file(&self, file_path: &Path) -> Result<SourceDocument> {
        Ok(SourceDocument {
            source_label: self.extract_label(file_path),
            path: file_path.to_path_buf(),
            text: self.read_file_content(file_path)?,
        })
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn extract_label(&self, file_path: &Path) -> String {
        file_path
            .file_stem()
            .map_or_else(|| file_path.to_string_lossy().to_string(), |s| s.to_string_lossy().to_string())
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort();
        txt_files
    }
}
