use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which file categories must be present after a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequirements {
    #[serde(default = "required")]
    pub need_model_files: bool,
    #[serde(default = "required")]
    pub need_config: bool,
    #[serde(default = "required")]
    pub need_tokenizer: bool,
}

fn required() -> bool {
    true
}

impl Default for VerifyRequirements {
    fn default() -> Self {
        Self {
            need_model_files: true,
            need_config: true,
            need_tokenizer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(rename = "repo")]
    pub repo_id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "allow", default)]
    pub allow_patterns: Vec<String>,
    #[serde(default)]
    pub verify: VerifyRequirements,
}

impl ModelDescriptor {
    /// Local folder name for this repo: `org/name` becomes `org_name`.
    pub fn folder_name(&self) -> String {
        self.repo_id.replace('/', "_")
    }
}

const TOKENIZER_ASSETS: [&str; 7] = [
    "config.json",
    "generation_config.json",
    "tokenizer.json",
    "tokenizer_config.json",
    "vocab.json",
    "merges.txt",
    "special_tokens_map.json",
];

fn descriptor(
    repo_id: &str,
    display_name: &str,
    allow_patterns: &[&str],
    verify: (bool, bool, bool),
) -> ModelDescriptor {
    ModelDescriptor {
        repo_id: repo_id.to_string(),
        display_name: display_name.to_string(),
        allow_patterns: allow_patterns.iter().map(|p| p.to_string()).collect(),
        verify: VerifyRequirements {
            need_model_files: verify.0,
            need_config: verify.1,
            need_tokenizer: verify.2,
        },
    }
}

fn with_assets(patterns: &[&'static str]) -> Vec<&'static str> {
    patterns.iter().chain(TOKENIZER_ASSETS.iter()).copied().collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelRegistry {
    models: Vec<ModelDescriptor>,
}

impl ModelRegistry {
    /// The curated core set, in processing order.
    pub fn builtin() -> Self {
        let models = vec![
            // onnx-community repos keep their graphs under onnx/
            descriptor(
                "onnx-community/Qwen2.5-0.5B-Instruct",
                "Qwen2.5-0.5B-Instruct (QWEN core chat)",
                &with_assets(&["onnx/*.onnx"]),
                (true, true, true),
            ),
            descriptor(
                "HuggingFaceTB/SmolLM-135M-Instruct",
                "SmolLM-135M-Instruct (VISION core)",
                &with_assets(&["onnx/*.onnx", "*.onnx"]),
                (true, true, true),
            ),
            descriptor(
                "Xenova/all-MiniLM-L6-v2",
                "all-MiniLM-L6-v2 (ORIGINAL embed core)",
                &["**/*.onnx", "**/*.bin", "**/*.json", "**/*.txt"],
                (false, true, true),
            ),
            // Diffusion pipelines are split across nested component folders.
            descriptor(
                "onnx-community/stable-diffusion-v1-5",
                "Stable Diffusion v1.5 (IMG_GEN)",
                &["**/*.onnx", "**/*.json", "**/*.txt"],
                (true, false, false),
            ),
            descriptor(
                "Xenova/vit-tiny-patch16-224",
                "ViT Tiny 224 (backup vision)",
                &[
                    "**/*.onnx",
                    "**/*.bin",
                    "config.json",
                    "preprocessor_config.json",
                    "tokenizer.json",
                    "special_tokens_map.json",
                    "**/*.json",
                ],
                (true, true, false),
            ),
        ];

        Self { models }
    }

    /// Reads a registry from a TOML file with one `[[models]]` table per repo.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Could not read registry {}: {}", path.display(), e))
        })?;
        let registry: ModelRegistry = toml::from_str(&content)?;

        if registry.models.is_empty() {
            return Err(Error::ConfigError(format!(
                "Registry {} defines no models",
                path.display()
            )));
        }
        for model in &registry.models {
            if !model.repo_id.contains('/') {
                return Err(Error::InvalidInput(format!(
                    "Repository id must look like <org>/<name>: {}",
                    model.repo_id
                )));
            }
        }

        Ok(registry)
    }

    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!("Loading model registry from {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::builtin()),
        }
    }

    /// Keeps only the listed repositories, preserving registry order.
    pub fn filter(self, only: &[String]) -> Result<Self> {
        if only.is_empty() {
            return Ok(self);
        }

        if let Some(unknown) = only
            .iter()
            .find(|id| !self.models.iter().any(|m| &m.repo_id == *id))
        {
            return Err(Error::ModelNotFound(unknown.clone()));
        }

        let models = self
            .models
            .into_iter()
            .filter(|m| only.contains(&m.repo_id))
            .collect();
        Ok(Self { models })
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }
}
