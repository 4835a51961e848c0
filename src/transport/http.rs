use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::DownloadConfig;
use crate::constants::download::{
    DOWNLOAD_BUFFER_BYTES, FALLBACK_ARCHIVE_NAME, PARTIAL_EXTENSION, SIDECAR_SUFFIX,
    SIDECAR_VERSION,
};
use crate::errors::LoaderError;
use crate::transport::{ArchiveHandle, DownloadManager};
use crate::types::Url;

const MIB: f64 = 1024.0 * 1024.0;

/// Metadata persisted next to each cached archive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct DownloadSidecar {
    version: u32,
    url: Url,
    bytes: u64,
    downloaded_at: DateTime<Utc>,
}

/// Download manager that fetches archives over HTTP(S) into a local cache.
///
/// A cached archive is reused when its sidecar records the same URL and byte
/// size as the file on disk. Resolved handles are memoised per process so the
/// three splits of one dataset share a single download.
pub struct HttpDownloadManager {
    config: DownloadConfig,
    resolved: Mutex<HashMap<Url, ArchiveHandle>>,
}

impl HttpDownloadManager {
    pub fn new(config: DownloadConfig) -> Self {
        Self {
            config,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Cache location for `url`: `<cache_dir>/<url-hash>-<file name>`.
    ///
    /// The hash is FNV-1a over the URL bytes, so cache paths survive
    /// toolchain upgrades.
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{:016x}-{}", url_hash(url), archive_file_name(url)))
    }

    fn sidecar_path(target: &Path) -> PathBuf {
        let mut name = target.as_os_str().to_os_string();
        name.push(SIDECAR_SUFFIX);
        PathBuf::from(name)
    }

    /// True when `target` exists and its sidecar matches `url` and the file size.
    fn cache_is_valid(target: &Path, url: &str) -> bool {
        let Ok(metadata) = fs::metadata(target) else {
            return false;
        };
        let Ok(raw) = fs::read(Self::sidecar_path(target)) else {
            return false;
        };
        let Ok(sidecar) = serde_json::from_slice::<DownloadSidecar>(&raw) else {
            return false;
        };
        sidecar.version == SIDECAR_VERSION && sidecar.url == url && sidecar.bytes == metadata.len()
    }

    fn fetch(&self, url: &str, target: &Path) -> Result<u64, LoaderError> {
        let download_error = |reason: String| LoaderError::Download {
            url: url.to_string(),
            reason,
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                download_error(format!(
                    "failed creating cache dir {}: {err}",
                    parent.display()
                ))
            })?;
        }
        let temp_target = target.with_extension(PARTIAL_EXTENSION);
        if temp_target.exists() {
            let _ = fs::remove_file(&temp_target);
        }

        let response = ureq::get(url)
            .call()
            .map_err(|err| download_error(format!("request failed: {err}")))?;
        let expected_bytes = response
            .headers()
            .get(ureq::http::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());
        let mut reader = response.into_body().into_reader();
        let mut file = File::create(&temp_target).map_err(|err| {
            download_error(format!(
                "failed creating {}: {err}",
                temp_target.display()
            ))
        })?;
        info!(
            "[allocine:download] downloading {} -> {}",
            url,
            target.display()
        );

        let started = Instant::now();
        let mut last_report = Instant::now();
        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; DOWNLOAD_BUFFER_BYTES];
        loop {
            let read = reader
                .read(&mut buffer)
                .map_err(|err| download_error(format!("failed reading response body: {err}")))?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read]).map_err(|err| {
                download_error(format!(
                    "failed writing {}: {err}",
                    temp_target.display()
                ))
            })?;
            total_bytes = total_bytes.saturating_add(read as u64);
            if last_report.elapsed() >= self.config.progress_interval {
                let elapsed = started.elapsed().as_secs_f64();
                match expected_bytes {
                    Some(expected) if expected > 0 => info!(
                        "[allocine:download] progress {}: {:.1}/{:.1} MiB ({:.1}%, {:.1}s)",
                        target.display(),
                        total_bytes as f64 / MIB,
                        expected as f64 / MIB,
                        ((total_bytes as f64 / expected as f64) * 100.0).clamp(0.0, 100.0),
                        elapsed
                    ),
                    _ => info!(
                        "[allocine:download] progress {}: {:.1} MiB ({:.1}s)",
                        target.display(),
                        total_bytes as f64 / MIB,
                        elapsed
                    ),
                }
                last_report = Instant::now();
            }
        }
        file.flush()
            .map_err(|err| download_error(format!("failed flushing download: {err}")))?;
        drop(file);

        if let Some(expected) = expected_bytes
            && expected != total_bytes
        {
            let _ = fs::remove_file(&temp_target);
            return Err(download_error(format!(
                "truncated body: received {total_bytes} of {expected} bytes"
            )));
        }

        fs::rename(&temp_target, target).map_err(|err| {
            download_error(format!(
                "failed moving {} -> {}: {err}",
                temp_target.display(),
                target.display()
            ))
        })?;
        info!(
            "[allocine:download] download complete {}: {:.1} MiB in {:.1}s",
            target.display(),
            total_bytes as f64 / MIB,
            started.elapsed().as_secs_f64()
        );
        Ok(total_bytes)
    }

    fn write_sidecar(target: &Path, url: &str, bytes: u64) -> Result<(), LoaderError> {
        let sidecar = DownloadSidecar {
            version: SIDECAR_VERSION,
            url: url.to_string(),
            bytes,
            downloaded_at: Utc::now(),
        };
        let payload = serde_json::to_vec_pretty(&sidecar).map_err(|err| LoaderError::Download {
            url: url.to_string(),
            reason: format!("failed encoding download sidecar: {err}"),
        })?;
        let path = Self::sidecar_path(target);
        fs::write(&path, payload).map_err(|err| LoaderError::Download {
            url: url.to_string(),
            reason: format!("failed writing {}: {err}", path.display()),
        })
    }
}

impl DownloadManager for HttpDownloadManager {
    fn download(&self, url: &str) -> Result<ArchiveHandle, LoaderError> {
        let mut resolved = self
            .resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = resolved.get(url) {
            return Ok(handle.clone());
        }

        let target = self.cache_path(url);
        if !self.config.force_redownload && Self::cache_is_valid(&target, url) {
            debug!("[allocine:download] using cached archive {}", target.display());
        } else {
            if target.exists() {
                warn!(
                    "[allocine:download] replacing cached archive {}",
                    target.display()
                );
            }
            let bytes = self.fetch(url, &target)?;
            Self::write_sidecar(&target, url, bytes)?;
        }

        let handle = ArchiveHandle::new(url, target);
        resolved.insert(url.to_string(), handle.clone());
        Ok(handle)
    }
}

/// 64-bit FNV-1a hash of `url`.
fn url_hash(url: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    url.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

/// Last path segment of `url`, without query or fragment.
fn archive_file_name(url: &str) -> String {
    let without_suffix = url.split(['?', '#']).next().unwrap_or(url);
    let name = without_suffix
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    if name.is_empty() || name.contains(':') {
        FALLBACK_ARCHIVE_NAME.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const URL: &str = "https://example.invalid/allocine/data.tar.bz2";

    fn seed_cache(manager: &HttpDownloadManager, url: &str, body: &[u8], sidecar_url: &str) -> PathBuf {
        let target = manager.cache_path(url);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, body).unwrap();
        let sidecar = DownloadSidecar {
            version: SIDECAR_VERSION,
            url: sidecar_url.to_string(),
            bytes: body.len() as u64,
            downloaded_at: Utc::now(),
        };
        fs::write(
            HttpDownloadManager::sidecar_path(&target),
            serde_json::to_vec(&sidecar).unwrap(),
        )
        .unwrap();
        target
    }

    #[test]
    fn file_name_strips_query_and_fragment() {
        assert_eq!(archive_file_name(URL), "data.tar.bz2");
        assert_eq!(
            archive_file_name("https://host/raw/data.tar.bz2?raw=true#frag"),
            "data.tar.bz2"
        );
        assert_eq!(archive_file_name("https://host/dir/"), "dir");
        assert_eq!(archive_file_name("https://"), FALLBACK_ARCHIVE_NAME);
    }

    #[test]
    fn url_hash_is_pinned() {
        assert_eq!(url_hash(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(url_hash("a"), 0xaf63_dc4c_8601_ec8c);
        let temp = tempdir().unwrap();
        let manager = HttpDownloadManager::new(DownloadConfig::new(temp.path()));
        assert_eq!(
            manager.cache_path("a"),
            temp.path().join("af63dc4c8601ec8c-a")
        );
    }

    #[test]
    fn cache_paths_differ_per_url() {
        let temp = tempdir().unwrap();
        let manager = HttpDownloadManager::new(DownloadConfig::new(temp.path()));
        let a = manager.cache_path("https://a.invalid/data.tar.bz2");
        let b = manager.cache_path("https://b.invalid/data.tar.bz2");
        assert_ne!(a, b);
        assert!(a.starts_with(temp.path()));
        assert!(a.to_string_lossy().ends_with("-data.tar.bz2"));
    }

    #[test]
    fn valid_cache_is_reused_without_network() {
        let temp = tempdir().unwrap();
        let manager = HttpDownloadManager::new(DownloadConfig::new(temp.path()));
        let target = seed_cache(&manager, URL, b"cached bytes", URL);

        let handle = manager.download(URL).unwrap();
        assert_eq!(handle.path(), target.as_path());
        // Memoised: a second call returns the same handle.
        assert_eq!(manager.download(URL).unwrap(), handle);
    }

    #[test]
    fn cache_validation_checks_url_and_size() {
        let temp = tempdir().unwrap();
        let manager = HttpDownloadManager::new(DownloadConfig::new(temp.path()));
        let target = seed_cache(&manager, URL, b"cached bytes", "https://other.invalid/x");
        assert!(!HttpDownloadManager::cache_is_valid(&target, URL));

        let target = seed_cache(&manager, URL, b"cached bytes", URL);
        assert!(HttpDownloadManager::cache_is_valid(&target, URL));
        fs::write(&target, b"truncated").unwrap();
        assert!(!HttpDownloadManager::cache_is_valid(&target, URL));

        fs::remove_file(HttpDownloadManager::sidecar_path(&target)).unwrap();
        assert!(!HttpDownloadManager::cache_is_valid(&target, URL));
    }

    #[test]
    fn unreachable_url_surfaces_download_error() {
        let temp = tempdir().unwrap();
        let manager = HttpDownloadManager::new(DownloadConfig::new(temp.path()));
        let err = manager
            .download("http://127.0.0.1:9/allocine/data.tar.bz2")
            .unwrap_err();
        assert!(matches!(err, LoaderError::Download { .. }));
    }
}
