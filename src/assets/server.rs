use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::assets::io::{AssetReaderVariant, resolve_locator};
use crate::assets::loaders::GltfLoader;
use crate::assets::prefab::SharedPrefab;
use crate::errors::{AssetError, Error, Result};
use crate::resources::texture::Texture;

/// Entry point for background asset loading.
///
/// Owns the worker runtime loads run on and the root that relative
/// locators resolve against. Load futures never hold the server itself, so
/// the runtime is only dropped from the thread that owns the server.
/// Results are plain values; the caller decides how they reach the scene.
#[derive(Clone)]
pub struct AssetServer {
    runtime: Arc<Runtime>,
    root: PathBuf,
}

impl AssetServer {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("phoenix-assets")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime: Arc::new(runtime),
            root: root.into(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full locator for `locator`: URLs and absolute paths pass through.
    #[must_use]
    pub fn resolve(&self, locator: &str) -> String {
        resolve_locator(&self.root, locator)
    }

    /// Runs `future` on the worker runtime. Dropping the handle detaches
    /// the task.
    pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(future)
    }

    /// Blocks the calling thread on `future`. Not for use on a runtime thread.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    // ========================================================================
    // Async loads
    // ========================================================================

    /// Fetches and decodes a glTF model. The returned future owns everything
    /// it needs and can be spawned on the worker runtime.
    pub fn load_prefab_async(
        &self,
        locator: &str,
    ) -> impl Future<Output = Result<SharedPrefab>> + Send + use<> {
        let source = self.resolve(locator);
        async move {
            log::info!("Loading model: {source}");
            GltfLoader::load_async(&source).await
        }
    }

    /// Loads an equirectangular Radiance HDR image as an RGBA16F texture.
    pub fn load_hdr_texture_async(
        &self,
        locator: &str,
    ) -> impl Future<Output = Result<Arc<Texture>>> + Send + use<> {
        let source = self.resolve(locator);
        async move {
            log::info!("Loading environment map: {source}");

            let reader = AssetReaderVariant::from_source(&source)?;
            let filename = AssetReaderVariant::source_filename(&source).to_string();
            let bytes = reader.read_bytes(&filename).await?;

            let texture =
                tokio::task::spawn_blocking(move || Self::decode_hdr_cpu(&filename, &bytes))
                    .await??;
            Ok(Arc::new(texture))
        }
    }

    /// CPU HDR decode (RGB32F, then packed to half floats).
    pub fn decode_hdr_cpu(name: &str, bytes: &[u8]) -> Result<Texture> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Hdr)
            .map_err(|e| Error::Asset(AssetError::Format(format!("Failed to decode HDR {name}: {e}"))))?;

        let width = img.width();
        let height = img.height();
        if width == 0 || height == 0 {
            return Err(Error::Asset(AssetError::InvalidData(format!(
                "HDR {name} has zero size"
            ))));
        }
        let rgb = img.into_rgb32f().into_raw();

        Ok(Texture::from_rgb32f(name, width, height, &rgb))
    }
}
