use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Model not found: {0}")]
	ModelNotFound(String),

	#[error("Invalid input: {0}")]
	InvalidInput(String),

	#[error("Download failed: {0}")]
	DownloadFailed(String),

	#[error("Configuration error: {0}")]
	ConfigError(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	SerializationError(String),
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<toml::de::Error> for Error {
	fn from(err: toml::de::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<hf_hub::api::sync::ApiError> for Error {
	fn from(err: hf_hub::api::sync::ApiError) -> Self {
		Error::DownloadFailed(err.to_string())
	}
}

impl Error {
	/// The underlying message without the category prefix. `ModelNotFound`
	/// only carries a name, so it keeps its full text.
	pub fn detail(&self) -> String {
		match self {
			Error::ModelNotFound(_) => self.to_string(),
			Error::InvalidInput(msg)
			| Error::DownloadFailed(msg)
			| Error::ConfigError(msg)
			| Error::SerializationError(msg) => msg.clone(),
			Error::IoError(e) => e.to_string(),
		}
	}
}


pub type Result<T> = std::result::Result<T, Error>;
