//! Input sources and async streaming into an engine

use crate::output::HashReport;
use anyhow::{Context, Result};
use hashkit_core::{EngineConfig, HashEngine, MatchOutcome, MatchPolicy};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};
use walkdir::WalkDir;

/// Where input bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// `-` means stdin, anything else is a path
    pub fn from_arg(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Source::Stdin
        } else {
            Source::File(path.to_path_buf())
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("-"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read `reader` to the end in `chunk_size` pieces, feeding each to `engine`
pub async fn stream_into<R: AsyncRead + Unpin>(
    engine: &mut HashEngine,
    mut reader: R,
    chunk_size: usize,
) -> Result<u64> {
    let chunk_size = chunk_size.max(1);
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(chunk_size)
        .map_err(hashkit_core::Error::from)
        .with_context(|| format!("Failed to allocate a {chunk_size}-byte read buffer"))?;
    buffer.resize(chunk_size, 0);
    let mut total = 0u64;

    loop {
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        engine.update(&buffer[..read])?;
        total += read as u64;
    }

    Ok(total)
}

/// Feed a whole source into a fresh engine built from `config`
async fn feed_source(source: &Source, config: &EngineConfig) -> Result<(HashEngine, u64)> {
    let mut engine = HashEngine::with_config(config).context("Failed to create hash engine")?;

    let size = match source {
        Source::Stdin => stream_into(&mut engine, tokio::io::stdin(), config.chunk_size).await?,
        Source::File(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            stream_into(&mut engine, file, config.chunk_size)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?
        }
    };

    log::debug!("Fed {size} bytes from {source}");
    Ok((engine, size))
}

/// Every digest of `source`
pub async fn hash_source(source: &Source, config: &EngineConfig) -> Result<HashReport> {
    let (mut engine, size) = feed_source(source, config).await?;
    Ok(HashReport {
        source: source.to_string(),
        size,
        digests: engine.finalize_digests()?,
    })
}

/// Evaluate `policy` over the digests of `source`
pub async fn check_source(
    source: &Source,
    config: &EngineConfig,
    policy: &dyn MatchPolicy,
) -> Result<MatchOutcome> {
    let (mut engine, _) = feed_source(source, config).await?;
    Ok(engine.finalize_match(policy)?)
}

/// Regular files under `path`, in file-name order
///
/// Without `recursive` only the directory's direct children are visited.
pub fn discover_files(path: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(path).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Walk error: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}
