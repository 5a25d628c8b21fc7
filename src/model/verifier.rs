use crate::model::VerifyRequirements;
use std::path::Path;
use walkdir::WalkDir;

pub const MODEL_FILE_EXTENSION: &str = ".onnx";
pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILES: [&str; 5] = [
    "tokenizer.json",
    "tokenizer_config.json",
    "vocab.json",
    "merges.txt",
    "special_tokens_map.json",
];

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub has_model_file: bool,
    pub has_config: bool,
    pub has_tokenizer: bool,
    pub passed: bool,
}

/// Checks which file categories exist anywhere under `root`. Presence is
/// judged by file name only.
pub fn verify(root: &Path, requirements: &VerifyRequirements) -> Verification {
    let mut has_model_file = false;
    let mut has_config = false;
    let mut has_tokenizer = false;

    for name in file_names(root) {
        has_model_file |= name.to_lowercase().ends_with(MODEL_FILE_EXTENSION);
        has_config |= name == CONFIG_FILE;
        has_tokenizer |= TOKENIZER_FILES.contains(&name.as_str());
    }

    let passed = !(requirements.need_model_files && !has_model_file)
        && !(requirements.need_config && !has_config)
        && !(requirements.need_tokenizer && !has_tokenizer);

    Verification {
        has_model_file,
        has_config,
        has_tokenizer,
        passed,
    }
}

/// Total size of all files under `root` in MB, rounded to one decimal.
///
/// Entries that vanish or cannot be read are skipped.
pub fn folder_size_mb(root: &Path) -> f64 {
    let mut total: u64 = 0;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        match std::fs::metadata(entry.path()) {
            Ok(meta) => total += meta.len(),
            Err(e) => tracing::debug!("Skipping {:?} in size total: {}", entry.path(), e),
        }
    }

    round_mb(total as f64 / BYTES_PER_MB)
}

pub fn round_mb(mb: f64) -> f64 {
    (mb * 10.0).round() / 10.0
}

fn file_names(root: &Path) -> impl Iterator<Item = String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
}
