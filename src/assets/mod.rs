//! Asset loading: byte readers, the glTF loader, prefabs and the
//! background [`AssetServer`].

pub mod io;
pub mod loaders;
pub mod prefab;
pub mod server;

pub use io::{AssetReader, AssetReaderVariant, FileAssetReader};
pub use loaders::GltfLoader;
pub use prefab::{Prefab, PrefabInstance, PrefabNode, PrefabSkeleton, SharedPrefab};
pub use server::AssetServer;
