use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modelfetch")]
#[command(version, about = "Download and verify the core ONNX model set from the Hugging Face hub", long_about = None)]
pub struct Cli {
	/// Directory that receives one folder per model (default: ./public/models)
	#[arg(long, global = true, env = "MODELFETCH_BASE_DIR")]
	pub base_dir: Option<PathBuf>,

	/// TOML file replacing the built-in model list
	#[arg(long, global = true)]
	pub registry: Option<PathBuf>,

	/// Hugging Face access token (falls back to the cached `huggingface-cli login` token)
	#[arg(long, global = true, env = "HF_TOKEN", hide_env_values = true)]
	pub token: Option<String>,

	/// Disable download progress bars
	#[arg(long, global = true)]
	pub no_progress: bool,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Download every model in the registry and verify the result
	Pull {
		/// Only process these repositories (e.g., "Xenova/all-MiniLM-L6-v2")
		#[arg(long)]
		only: Vec<String>,

		/// Exit with an error status if any model failed
		#[arg(long)]
		strict: bool,
	},

	/// Verify already downloaded models without contacting the hub
	Verify {
		/// Only process these repositories
		#[arg(long)]
		only: Vec<String>,
	},

	/// List the models in the registry
	List,

	/// Write MODEL_MANIFEST.generated.json describing the downloaded models
	Manifest,
}
