// 🌐 Byte Retrieval - Fetch collaborators
// Network, local file and cache sources behind one trait

use crate::error::{GrowthError, GrowthResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// ============================================================================
// CORE TRAIT
// ============================================================================

/// ByteFetcher - Returns the raw bytes of a reference dataset.
///
/// Single attempt, no retry. Any failure is a `GrowthError::Fetch`.
pub trait ByteFetcher {
    fn fetch(&self, identifier: &str) -> GrowthResult<Vec<u8>>;
}

/// File name a downloaded identifier is stored under: host and full path
/// with separators flattened, any query string removed
pub fn cache_file_name(identifier: &str) -> String {
    let without_query = identifier.split(['?', '#']).next().unwrap_or(identifier);
    let without_scheme = without_query
        .strip_prefix("https://")
        .or_else(|| without_query.strip_prefix("http://"))
        .unwrap_or(without_query);

    let name: String = without_scheme
        .trim_matches('/')
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();

    if name.is_empty() {
        "reference.bin".to_string()
    } else {
        name
    }
}

pub fn is_remote(identifier: &str) -> bool {
    identifier.starts_with("http://") || identifier.starts_with("https://")
}

// ============================================================================
// LOCAL FILES
// ============================================================================

/// Reads identifiers as file paths, relative ones resolved against `base_dir`
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    base_dir: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        FileFetcher { base_dir: None }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        FileFetcher {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, identifier: &str) -> PathBuf {
        let path = Path::new(identifier);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ByteFetcher for FileFetcher {
    fn fetch(&self, identifier: &str) -> GrowthResult<Vec<u8>> {
        let path = self.resolve(identifier);
        debug!(path = %path.display(), "reading reference file");

        fs::read(&path).map_err(|e| GrowthError::fetch(identifier, format!("{}: {}", path.display(), e)))
    }
}

// ============================================================================
// HTTP
// ============================================================================

#[cfg(feature = "http")]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> GrowthResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GrowthError::fetch("http-client", e.to_string()))?;

        Ok(HttpFetcher { client })
    }
}

#[cfg(feature = "http")]
impl ByteFetcher for HttpFetcher {
    fn fetch(&self, identifier: &str) -> GrowthResult<Vec<u8>> {
        tracing::info!(url = identifier, "downloading reference table");

        let response = self
            .client
            .get(identifier)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| GrowthError::fetch(identifier, e.to_string()))?;

        let bytes = response
            .bytes()
            .map_err(|e| GrowthError::fetch(identifier, e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

// ============================================================================
// CACHE
// ============================================================================

/// Wraps another fetcher and keeps a copy of every download in `cache_dir`.
/// Cached copies are only served back when `read_cache` is on. Local
/// identifiers pass straight through.
pub struct CachingFetcher<F: ByteFetcher> {
    inner: F,
    cache_dir: PathBuf,
    read_cache: bool,
}

impl<F: ByteFetcher> CachingFetcher<F> {
    pub fn new(inner: F, cache_dir: impl Into<PathBuf>, read_cache: bool) -> Self {
        CachingFetcher {
            inner,
            cache_dir: cache_dir.into(),
            read_cache,
        }
    }

    pub fn cache_path(&self, identifier: &str) -> PathBuf {
        self.cache_dir.join(cache_file_name(identifier))
    }
}

impl<F: ByteFetcher> ByteFetcher for CachingFetcher<F> {
    fn fetch(&self, identifier: &str) -> GrowthResult<Vec<u8>> {
        if !is_remote(identifier) {
            return self.inner.fetch(identifier);
        }

        let path = self.cache_path(identifier);

        if self.read_cache && path.is_file() {
            debug!(path = %path.display(), "serving reference table from cache");
            return fs::read(&path).map_err(|e| GrowthError::fetch(identifier, e.to_string()));
        }

        let bytes = self.inner.fetch(identifier)?;

        if let Err(e) = fs::create_dir_all(&self.cache_dir).and_then(|_| fs::write(&path, &bytes)) {
            warn!(path = %path.display(), error = %e, "could not cache reference table");
        }

        Ok(bytes)
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// SourceFetcher - Routes `http(s)://` identifiers to the network, everything
/// else to the local filesystem
pub struct SourceFetcher {
    files: FileFetcher,
    #[cfg(feature = "http")]
    http: Option<HttpFetcher>,
}

impl SourceFetcher {
    #[cfg(feature = "http")]
    pub fn new(files: FileFetcher, timeout_secs: u64) -> GrowthResult<Self> {
        Ok(SourceFetcher {
            files,
            http: Some(HttpFetcher::new(timeout_secs)?),
        })
    }

    #[cfg(not(feature = "http"))]
    pub fn new(files: FileFetcher, _timeout_secs: u64) -> GrowthResult<Self> {
        Ok(SourceFetcher { files })
    }

    /// Local files only, remote identifiers fail
    pub fn offline(files: FileFetcher) -> Self {
        SourceFetcher {
            files,
            #[cfg(feature = "http")]
            http: None,
        }
    }
}

impl ByteFetcher for SourceFetcher {
    fn fetch(&self, identifier: &str) -> GrowthResult<Vec<u8>> {
        if is_remote(identifier) {
            self.fetch_remote(identifier)
        } else {
            self.files.fetch(identifier)
        }
    }
}

impl SourceFetcher {
    #[cfg(feature = "http")]
    fn fetch_remote(&self, identifier: &str) -> GrowthResult<Vec<u8>> {
        match &self.http {
            Some(http) => http.fetch(identifier),
            None => Err(GrowthError::fetch(identifier, "remote retrieval is not available")),
        }
    }

    #[cfg(not(feature = "http"))]
    fn fetch_remote(&self, identifier: &str) -> GrowthResult<Vec<u8>> {
        Err(GrowthError::fetch(identifier, "remote retrieval is not available"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
