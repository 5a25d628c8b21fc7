use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::model::{pattern, ModelDescriptor};
use hf_hub::api::sync::{Api, ApiBuilder};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// The remote side of a snapshot download.
pub trait Hub {
    /// Repo-relative paths of every file in the repository.
    fn list_files(&self, repo_id: &str) -> Result<Vec<String>>;

    /// Fetches one file and returns where the client stored it locally.
    fn fetch(&self, repo_id: &str, filename: &str) -> Result<PathBuf>;
}

pub struct HfHub {
    api: Api,
}

impl HfHub {
    pub fn new(credentials: &Credentials, progress: bool) -> Result<Self> {
        // ApiBuilder::new() already picks up the token cached by `huggingface-cli login`.
        let mut builder = ApiBuilder::new().with_progress(progress);
        if let Credentials::Token(token) = credentials {
            builder = builder.with_token(Some(token.clone()));
        }

        let api = builder
            .build()
            .map_err(|e| Error::DownloadFailed(format!("Failed to initialize HuggingFace API: {}", e)))?;
        Ok(Self { api })
    }
}

impl Hub for HfHub {
    fn list_files(&self, repo_id: &str) -> Result<Vec<String>> {
        let info = self.api.model(repo_id.to_string()).info()?;
        Ok(info.siblings.into_iter().map(|s| s.rfilename).collect())
    }

    fn fetch(&self, repo_id: &str, filename: &str) -> Result<PathBuf> {
        Ok(self.api.model(repo_id.to_string()).get(filename)?)
    }
}

pub struct ModelDownloader<H: Hub> {
    hub: H,
    base_dir: PathBuf,
}

impl ModelDownloader<HfHub> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let hub = HfHub::new(&config.credentials, config.progress)?;
        Ok(Self::new(hub, config.base_dir.clone()))
    }
}

impl<H: Hub> ModelDownloader<H> {
    pub fn new(hub: H, base_dir: PathBuf) -> Self {
        Self { hub, base_dir }
    }

    pub fn output_dir(&self, descriptor: &ModelDescriptor) -> PathBuf {
        self.base_dir.join(descriptor.folder_name())
    }

    /// Downloads the files of `descriptor` that match its allow patterns and
    /// returns the local directory they were written to.
    pub fn download(&self, descriptor: &ModelDescriptor) -> Result<PathBuf> {
        let out_dir = self.output_dir(descriptor);
        fs::create_dir_all(&out_dir)?;

        tracing::info!("Listing files in {}", descriptor.repo_id);
        let files = self.hub.list_files(&descriptor.repo_id)?;

        let selected: Vec<String> = files
            .into_iter()
            .filter(|f| pattern::matches_any(&descriptor.allow_patterns, f))
            .collect();

        if selected.is_empty() {
            tracing::warn!(
                "No files in {} match the allow patterns {:?}",
                descriptor.repo_id,
                descriptor.allow_patterns
            );
        } else {
            tracing::info!("Downloading {} files from {}", selected.len(), descriptor.repo_id);
        }

        for filename in &selected {
            let Some(relative) = safe_relative(filename) else {
                tracing::warn!("Skipping suspicious path in {}: {}", descriptor.repo_id, filename);
                continue;
            };

            let cached = self.hub.fetch(&descriptor.repo_id, filename)?;
            let dest = out_dir.join(relative);
            Self::materialize(&cached, &dest)?;
            tracing::debug!("Wrote {:?}", dest);
        }

        Ok(out_dir)
    }

    /// Copies a fetched file into place as a regular file, following any
    /// symlink the client's cache uses.
    fn materialize(source: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        if let Ok(existing) = fs::symlink_metadata(dest) {
            if existing.file_type().is_file() && same_contents(source, dest)? {
                return Ok(());
            }
            fs::remove_file(dest)?;
        }

        fs::copy(source, dest)?;
        Ok(())
    }
}

fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }

    let mut a = BufReader::new(fs::File::open(a)?);
    let mut b = BufReader::new(fs::File::open(b)?);
    let mut buf_a = [0u8; 8192];
    let mut buf_b = [0u8; 8192];
    loop {
        let n = a.read(&mut buf_a)?;
        if n == 0 {
            return Ok(true);
        }
        b.read_exact(&mut buf_b[..n])?;
        if buf_a[..n] != buf_b[..n] {
            return Ok(false);
        }
    }
}

fn safe_relative(filename: &str) -> Option<PathBuf> {
    let path = Path::new(filename);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| path.to_path_buf())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::VerifyRequirements;
    use std::collections::HashMap;

    /// In-memory hub: each repo maps file names to contents.
    pub struct FakeHub {
        pub cache: tempfile::TempDir,
        pub repos: HashMap<String, Vec<(String, Vec<u8>)>>,
        pub broken: Vec<String>,
    }

    impl FakeHub {
        pub fn new() -> Self {
            Self {
                cache: tempfile::tempdir().unwrap(),
                repos: HashMap::new(),
                broken: Vec::new(),
            }
        }

        pub fn with_repo(mut self, repo_id: &str, files: &[(&str, usize)]) -> Self {
            let files = files
                .iter()
                .map(|(name, len)| (name.to_string(), vec![7u8; *len]))
                .collect();
            self.repos.insert(repo_id.to_string(), files);
            self
        }

        pub fn with_broken(mut self, repo_id: &str) -> Self {
            self.broken.push(repo_id.to_string());
            self
        }
    }

    impl Hub for FakeHub {
        fn list_files(&self, repo_id: &str) -> Result<Vec<String>> {
            if self.broken.iter().any(|r| r == repo_id) {
                return Err(Error::DownloadFailed(format!("401 Unauthorized: {}", repo_id)));
            }
            self.repos
                .get(repo_id)
                .map(|files| files.iter().map(|(name, _)| name.clone()).collect())
                .ok_or_else(|| Error::ModelNotFound(repo_id.to_string()))
        }

        fn fetch(&self, repo_id: &str, filename: &str) -> Result<PathBuf> {
            let (_, bytes) = self
                .repos
                .get(repo_id)
                .and_then(|files| files.iter().find(|(name, _)| name == filename))
                .ok_or_else(|| Error::ModelNotFound(format!("{}/{}", repo_id, filename)))?;

            let path = self.cache.path().join(repo_id).join(filename);
            fs::create_dir_all(path.parent().unwrap())?;
            fs::write(&path, bytes)?;
            Ok(path)
        }
    }

    pub fn descriptor(repo_id: &str, allow: &[&str], verify: VerifyRequirements) -> ModelDescriptor {
        ModelDescriptor {
            repo_id: repo_id.to_string(),
            display_name: format!("{} model", repo_id),
            allow_patterns: allow.iter().map(|p| p.to_string()).collect(),
            verify,
        }
    }

    #[test]
    fn test_download_filters_by_allow_patterns() {
        let hub = FakeHub::new().with_repo(
            "onnx-community/tiny",
            &[
                ("onnx/model.onnx", 16),
                ("onnx/model_fp16.onnx", 8),
                ("config.json", 4),
                ("README.md", 4),
                ("pytorch_model.bin", 32),
            ],
        );
        let base = tempfile::tempdir().unwrap();
        let downloader = ModelDownloader::new(hub, base.path().to_path_buf());
        let desc = descriptor(
            "onnx-community/tiny",
            &["onnx/*.onnx", "config.json"],
            VerifyRequirements::default(),
        );

        let out = downloader.download(&desc).unwrap();

        assert_eq!(out, base.path().join("onnx-community_tiny"));
        assert!(out.join("onnx/model.onnx").is_file());
        assert!(out.join("onnx/model_fp16.onnx").is_file());
        assert!(out.join("config.json").is_file());
        assert!(!out.join("README.md").exists());
        assert!(!out.join("pytorch_model.bin").exists());
        assert!(!fs::symlink_metadata(out.join("config.json")).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_download_with_no_matches_creates_empty_dir() {
        let hub = FakeHub::new().with_repo("a/b", &[("weights.safetensors", 4)]);
        let base = tempfile::tempdir().unwrap();
        let downloader = ModelDownloader::new(hub, base.path().to_path_buf());

        let out = downloader
            .download(&descriptor("a/b", &["config.json"], VerifyRequirements::default()))
            .unwrap();

        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_download_error_propagates() {
        let hub = FakeHub::new().with_broken("private/repo");
        let base = tempfile::tempdir().unwrap();
        let downloader = ModelDownloader::new(hub, base.path().to_path_buf());

        let err = downloader
            .download(&descriptor("private/repo", &["*"], VerifyRequirements::default()))
            .unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_materialize_replaces_stale_file() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("blob");
        let dest = tmp.path().join("out").join("config.json");
        fs::write(&source, b"{\"a\":1}").unwrap();
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"{}").unwrap();

        ModelDownloader::<FakeHub>::materialize(&source, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn test_materialize_refreshes_same_length_file() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("blob");
        let dest = tmp.path().join("out").join("config.json");
        fs::write(&source, b"{\"v\":2}").unwrap();
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"{\"v\":1}").unwrap();

        ModelDownloader::<FakeHub>::materialize(&source, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"{\"v\":2}");

        // Identical content is left in place.
        ModelDownloader::<FakeHub>::materialize(&source, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"{\"v\":2}");
    }

    #[test]
    fn test_safe_relative_rejects_escapes() {
        assert_eq!(safe_relative("onnx/model.onnx"), Some(PathBuf::from("onnx/model.onnx")));
        assert_eq!(safe_relative("../etc/passwd"), None);
        assert_eq!(safe_relative("/abs/path"), None);
    }
}
