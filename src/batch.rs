use crate::model::{folder_size_mb, verify, Hub, ModelDescriptor, ModelDownloader};
use crate::report::{DownloadResult, Reporter};
use std::io::{self, Write};
use std::path::Path;

/// Sizes and verifies an already populated model directory.
pub fn inspect(descriptor: &ModelDescriptor, out_dir: &Path) -> DownloadResult {
    DownloadResult {
        out_dir: out_dir.to_path_buf(),
        size_mb: folder_size_mb(out_dir),
        verification: verify(out_dir, &descriptor.verify),
    }
}

/// Downloads and verifies each descriptor in order. A failure is recorded
/// and the batch moves on to the next descriptor.
pub fn pull<H: Hub, W: Write>(
    descriptors: &[ModelDescriptor],
    downloader: &ModelDownloader<H>,
    out: &mut W,
) -> io::Result<Reporter> {
    let mut reporter = Reporter::new();

    for descriptor in descriptors {
        Reporter::header(out, descriptor, &downloader.output_dir(descriptor))?;
        writeln!(out, "   snapshot download: starting...")?;
        out.flush()?;

        match downloader.download(descriptor) {
            Ok(out_dir) => {
                let result = inspect(descriptor, &out_dir);
                reporter.record_result(out, descriptor, &result)?;
            }
            Err(e) => reporter.record_error(out, descriptor, &e)?,
        }
    }

    reporter.write_summary(out)?;
    Ok(reporter)
}

/// Runs verification over existing folders under `base_dir` without
/// contacting the hub.
pub fn verify_existing<W: Write>(
    descriptors: &[ModelDescriptor],
    base_dir: &Path,
    out: &mut W,
) -> io::Result<Reporter> {
    let mut reporter = Reporter::new();

    for descriptor in descriptors {
        let out_dir = base_dir.join(descriptor.folder_name());
        Reporter::header(out, descriptor, &out_dir)?;

        if !out_dir.is_dir() {
            let err = crate::error::Error::ModelNotFound(descriptor.repo_id.clone());
            reporter.record_error(out, descriptor, &err)?;
            continue;
        }

        let result = inspect(descriptor, &out_dir);
        reporter.record_result(out, descriptor, &result)?;
    }

    reporter.write_summary(out)?;
    Ok(reporter)
}
