use crate::error::Result;
use crate::model::verifier::MODEL_FILE_EXTENSION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const MANIFEST_FILE: &str = "MODEL_MANIFEST.generated.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub folder: String,
    pub base_url: String,
    pub entrypoints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: String,
    pub models: Vec<ManifestEntry>,
}

impl Manifest {
    /// Indexes every model folder directly under `base_dir`.
    pub fn scan(base_dir: &Path) -> Result<Self> {
        let mut folders: Vec<String> = fs::read_dir(base_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        folders.sort();

        let models = folders
            .into_iter()
            .map(|folder| ManifestEntry {
                id: folder.clone(),
                base_url: format!("/models/{}/", folder),
                entrypoints: entrypoints(base_dir, &base_dir.join(&folder)),
                folder,
            })
            .collect();

        Ok(Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            models,
        })
    }

    pub fn write(&self, base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(MANIFEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

pub fn generate(base_dir: &Path) -> Result<PathBuf> {
    let manifest = Manifest::scan(base_dir)?;
    tracing::info!("Indexed {} model folders", manifest.models.len());
    manifest.write(base_dir)
}

/// ONNX files under `folder`, relative to `base_dir`, shortest path first.
fn entrypoints(base_dir: &Path, folder: &Path) -> Vec<String> {
    let mut found: Vec<String> = WalkDir::new(folder)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .ends_with(MODEL_FILE_EXTENSION)
        })
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(base_dir)
                .ok()
                .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        })
        .collect();

    found.sort_by_key(|path| path.len());
    found
}
