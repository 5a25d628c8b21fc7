use crate::model::{ModelDescriptor, Verification};
use crate::model::verifier::round_mb;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const MISSING_FILES_REASON: &str =
    "Missing required files after download (check allow_patterns).";
pub const AUTH_HINT: &str = "If failures show 401/403: run `huggingface-cli login` or set HF_TOKEN.";

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResult {
    pub out_dir: PathBuf,
    pub size_mb: f64,
    pub verification: Verification,
}

impl DownloadResult {
    pub fn passed(&self) -> bool {
        self.verification.passed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub display_name: String,
    pub repo_id: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Reporter {
    total_mb: f64,
    failures: Vec<FailureRecord>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header<W: Write>(out: &mut W, descriptor: &ModelDescriptor, out_dir: &Path) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "📥 {}", descriptor.display_name)?;
        writeln!(out, "   Repo : {}", descriptor.repo_id)?;
        writeln!(out, "   Out  : {}", out_dir.display())
    }

    /// Adds the folder size to the total, prints the status line and records
    /// a failure when verification did not pass.
    pub fn record_result<W: Write>(
        &mut self,
        out: &mut W,
        descriptor: &ModelDescriptor,
        result: &DownloadResult,
    ) -> io::Result<()> {
        self.total_mb += result.size_mb;
        tracing::debug!("{:?}: {:.1} MB", result.out_dir, result.size_mb);

        let v = &result.verification;
        writeln!(
            out,
            "   Size: {:.1} MB    ONNX={} CFG={} TOK={}",
            result.size_mb, v.has_model_file, v.has_config, v.has_tokenizer
        )?;

        if !result.passed() {
            tracing::warn!("{} is missing required files", descriptor.repo_id);
            self.push_failure(descriptor, MISSING_FILES_REASON.to_string());
        }
        Ok(())
    }

    pub fn record_error<W: Write>(
        &mut self,
        out: &mut W,
        descriptor: &ModelDescriptor,
        error: &crate::error::Error,
    ) -> io::Result<()> {
        writeln!(out, "   FAILED: {}", error)?;
        tracing::error!("{} failed: {:?}", descriptor.repo_id, error);
        self.push_failure(descriptor, error.detail());
        Ok(())
    }

    fn push_failure(&mut self, descriptor: &ModelDescriptor, reason: String) {
        self.failures.push(FailureRecord {
            display_name: descriptor.display_name.clone(),
            repo_id: descriptor.repo_id.clone(),
            reason,
        });
    }

    pub fn total_mb(&self) -> f64 {
        round_mb(self.total_mb)
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "DONE. Total downloaded: {:.1} MB", self.total_mb())?;

        if self.failures.is_empty() {
            writeln!(out, "All models downloaded successfully.")?;
        } else {
            writeln!(out, "\nSome models failed:")?;
            for failure in &self.failures {
                writeln!(
                    out,
                    " - {} ({}) : {}",
                    failure.display_name, failure.repo_id, failure.reason
                )?;
            }
            writeln!(out, "{}", AUTH_HINT)?;
        }
        Ok(())
    }
}
