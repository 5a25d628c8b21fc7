pub mod downloader;
pub mod pattern;
pub mod registry;
pub mod verifier;

pub use downloader::{Hub, ModelDownloader};
pub use registry::{ModelDescriptor, ModelRegistry, VerifyRequirements};
pub use verifier::{folder_size_mb, verify, Verification};
