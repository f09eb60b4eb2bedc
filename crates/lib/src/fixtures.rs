//! Turn a recorded batch of webhook calls into one JSON file per call, for replay in tests.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::request::WebhookRequests;

/// File name for the `index`-th fixture (1-based, zero-padded): `request-001.json`.
pub fn fixture_name(prefix: &str, index: usize) -> String {
    format!("{}-{:03}.json", prefix, index)
}

/// Write each request of `batch` to `dir` as its own fixture file. Creates `dir` if missing.
/// Returns the written paths in batch order.
pub fn write_fixtures(batch: &WebhookRequests, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating fixtures directory {}", dir.display()))?;
    let readers = batch.to_readers().context("re-encoding recorded requests")?;
    let mut written = Vec::with_capacity(readers.len());
    for (i, mut reader) in readers.into_iter().enumerate() {
        let path = dir.join(fixture_name(prefix, i + 1));
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        std::fs::write(&path, &body)
            .with_context(|| format!("writing fixture {}", path.display()))?;
        written.push(path);
    }
    log::info!("wrote {} fixture(s) to {}", written.len(), dir.display());
    Ok(written)
}

/// Read a recorded batch from `path` and split it into fixtures under `dir`.
pub fn split_batch_file(path: &Path, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening recorded batch {}", path.display()))?;
    let batch = WebhookRequests::decode(std::io::BufReader::new(file))
        .with_context(|| format!("decoding recorded batch {}", path.display()))?;
    write_fixtures(&batch, dir, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_names_are_zero_padded() {
        assert_eq!(fixture_name("request", 1), "request-001.json");
        assert_eq!(fixture_name("call", 1234), "call-1234.json");
    }
}
