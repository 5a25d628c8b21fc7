use std::path::{Path, PathBuf};

pub const BASE_DIR_ENV: &str = "MODELFETCH_BASE_DIR";

/// How the hub client authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
	/// Explicit access token, usually taken from `HF_TOKEN`.
	Token(String),
	/// Token cached by `huggingface-cli login`, if any.
	CachedLogin,
}

impl Credentials {
	pub fn from_token(token: Option<String>) -> Self {
		match token {
			Some(token) if !token.trim().is_empty() => Credentials::Token(token.trim().to_string()),
			_ => Credentials::CachedLogin,
		}
	}
}

#[derive(Debug, Clone)]
pub struct Config {
	pub base_dir: PathBuf,
	pub registry_path: Option<PathBuf>,
	pub credentials: Credentials,
	pub progress: bool,
}

impl Config {
	pub fn new(base_dir: PathBuf, credentials: Credentials) -> crate::error::Result<Self> {
		std::fs::create_dir_all(&base_dir)?;

		Ok(Self {
			base_dir,
			registry_path: None,
			credentials,
			progress: true,
		})
	}

	/// Resolves the base directory from an explicit path, `MODELFETCH_BASE_DIR`,
	/// or `<cwd>/public/models`, in that order.
	pub fn from_env(base_dir: Option<PathBuf>, credentials: Credentials) -> crate::error::Result<Self> {
		let base_dir = match base_dir {
			Some(dir) => dir,
			None => match std::env::var(BASE_DIR_ENV) {
				Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
				_ => Self::default_base_dir()?,
			},
		};

		let base_dir = absolutize(&base_dir)?;
		Self::new(base_dir, credentials)
	}

	pub fn default_base_dir() -> crate::error::Result<PathBuf> {
		let cwd = std::env::current_dir()
			.map_err(|e| crate::error::Error::ConfigError(format!("Could not determine working directory: {}", e)))?;
		Ok(cwd.join("public").join("models"))
	}

	pub fn with_registry(mut self, registry_path: Option<PathBuf>) -> Self {
		self.registry_path = registry_path;
		self
	}

	pub fn with_progress(mut self, progress: bool) -> Self {
		self.progress = progress;
		self
	}
}

fn absolutize(path: &Path) -> crate::error::Result<PathBuf> {
	if path.is_absolute() {
		return Ok(path.to_path_buf());
	}
	Ok(std::env::current_dir()?.join(path))
}
