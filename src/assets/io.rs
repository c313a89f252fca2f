use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{AssetError, Error, Result};

/// Async byte source for assets: local files or HTTP.
pub trait AssetReader: Send + Sync {
    /// Reads `uri`, resolved against the reader's root.
    fn read_bytes(&self, uri: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Reads from a directory on disk.
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    /// `path` may be a directory or a file; for a file its parent directory
    /// becomes the root.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::Asset(
                AssetError::NotFound(path.display().to_string()),
            )),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Reads relative to a base URL.
#[cfg(feature = "http")]
pub struct HttpAssetReader {
    root_url: url::Url,
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    /// A URL pointing at a file uses that file's directory as the root.
    pub fn new(url_str: &str) -> Result<Self> {
        let url = url::Url::parse(url_str)
            .map_err(|e| Error::Asset(AssetError::Network(format!("invalid URL {url_str}: {e}"))))?;
        let root_url = if url.path().ends_with('/') {
            url
        } else {
            let mut u = url.clone();
            if let Ok(mut segments) = u.path_segments_mut() {
                segments.pop();
                segments.push("");
            }
            u
        };
        Ok(Self { root_url })
    }

    #[inline]
    #[must_use]
    pub fn root_url(&self) -> &url::Url {
        &self.root_url
    }
}

#[cfg(feature = "http")]
impl AssetReader for HttpAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let url = self
            .root_url
            .join(uri)
            .map_err(|e| Error::Asset(AssetError::Network(e.to_string())))?;

        let response = ehttp::fetch_async(ehttp::Request::get(url.as_str()))
            .await
            .map_err(|e| Error::Asset(AssetError::Network(e)))?;

        if response.status == 404 {
            return Err(Error::Asset(AssetError::NotFound(url.to_string())));
        }
        if !response.ok {
            return Err(Error::Asset(AssetError::Network(format!(
                "HTTP {} {} for {url}",
                response.status, response.status_text
            ))));
        }
        Ok(response.bytes)
    }
}

/// Reader chosen from the locator's scheme.
#[derive(Clone)]
pub enum AssetReaderVariant {
    File(Arc<FileAssetReader>),
    #[cfg(feature = "http")]
    Http(Arc<HttpAssetReader>),
}

impl AssetReaderVariant {
    /// Builds a reader rooted at the directory containing `source`.
    pub fn from_source(source: &str) -> Result<Self> {
        if is_remote(source) {
            #[cfg(feature = "http")]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source)?)))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(Error::Config(format!(
                    "cannot fetch {source}: built without the `http` feature"
                )))
            }
        } else {
            let root = Path::new(source).parent().unwrap_or(Path::new("."));
            Ok(Self::File(Arc::new(FileAssetReader::new(root))))
        }
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            Self::File(r) => r.read_bytes(uri).await,
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri).await,
        }
    }

    /// File-name part of a path or URL.
    #[must_use]
    pub fn source_filename(source: &str) -> &str {
        if is_remote(source) {
            source.rsplit('/').next().unwrap_or(source)
        } else {
            Path::new(source)
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(source)
        }
    }
}

#[must_use]
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Joins a locator onto an asset root, leaving URLs and absolute paths alone.
#[must_use]
pub fn resolve_locator(root: &Path, locator: &str) -> String {
    if is_remote(locator) || Path::new(locator).is_absolute() {
        locator.to_string()
    } else {
        root.join(locator).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_of_url_and_path() {
        assert_eq!(
            AssetReaderVariant::source_filename("https://host/models/scene.gltf"),
            "scene.gltf"
        );
        assert_eq!(AssetReaderVariant::source_filename("assets/sky.hdr"), "sky.hdr");
    }

    #[test]
    fn locators_resolve_under_root() {
        let root = Path::new("assets");
        assert_eq!(
            resolve_locator(root, "scene.gltf"),
            Path::new("assets").join("scene.gltf").to_string_lossy()
        );
        assert_eq!(resolve_locator(root, "http://x/y.hdr"), "http://x/y.hdr");
    }
}
