//! Hash-gated atomic file writer.
//!
//! ## Write protocol
//!
//! 1. SHA-256 hash the new content.
//! 2. Hash the existing file, if any → skip the write when identical.
//! 3. Ensure the parent directory exists.
//! 4. Write to `<path>.slipway.tmp`.
//! 5. Rename to the final path (atomic on POSIX).
//!
//! Steps get their idempotence from this: deterministic content plus a
//! content-compare means a re-run either skips or rewrites the same bytes,
//! never corrupts.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped — content on disk already matches.
    Unchanged { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::Unchanged { path } => path,
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Atomically write `content` to `path`, skipping the write when the file
/// already holds identical content. Line endings are normalised to LF.
pub fn atomic_write(path: &Path, content: &str) -> Result<WriteResult, std::io::Error> {
    let normalized = content.replace("\r\n", "\n");
    let content = normalized.as_str();

    if path.is_file() {
        let existing = std::fs::read(path)?;
        if sha256_hex(&existing) == sha256_hex(content.as_bytes()) {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = PathBuf::from(format!("{}.slipway.tmp", path.display()));
    std::fs::write(&tmp, content)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
