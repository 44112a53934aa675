//! # Void Asset Server
//!
//! Client side of the void-assets server: scene nodes flagged as
//! server-owned keep only a reference (`ID`, `Url`, `Type`) in their user
//! data, and their content is fetched and decoded through this crate when a
//! scene is loaded.
//!
//! ## Example
//!
//! ```ignore
//! use void_asset_server::{decode_payload, AssetFetcher, RemoteAssetSource, RemoteConfig};
//!
//! let source = RemoteAssetSource::new(RemoteConfig::default());
//! let url = source.url_for("/Upload/Model/chair.json")?;
//! let bytes = source.fetch(&url).await?;
//! let payload = decode_payload(ServerAssetKind::Model, &bytes, url.as_str())?;
//! ```

pub mod loaders;
pub mod remote;

pub use loaders::{decode_payload, LoaderError, ModelAsset, ModelLoader, TextureAsset, TextureLoader};
#[cfg(feature = "remote")]
pub use remote::RemoteAssetSource;
pub use remote::{resolve_url, AssetFetcher, FetchError, MemoryAssetSource, RemoteConfig};
