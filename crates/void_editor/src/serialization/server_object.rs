//! Nodes whose content lives on the asset server.
//!
//! Only a reference is persisted: the asset id, url and type stored in the
//! node's user data, plus its placement. Loading fetches and decodes the
//! asset again.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use void_asset_server::{decode_payload, resolve_url, AssetFetcher};
use void_scene::{NodeKind, SceneNode, ServerAssetRef, ServerObject, SERVER_KEY};

use super::error::{ResolveError, SerializeError};
use super::record::{Generator, Record};
use super::serializer::{node_record, ObjectBody};

/// Where server-owned assets are fetched from during a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Base url that record urls are joined onto.
    pub server: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            server: "http://localhost:3001".to_string(),
        }
    }
}

pub struct ServerObjectResolver {
    fetcher: Arc<dyn AssetFetcher>,
}

impl fmt::Debug for ServerObjectResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerObjectResolver").finish_non_exhaustive()
    }
}

fn asset_ref(body: &ObjectBody) -> Result<ServerAssetRef, String> {
    serde_json::from_value(Value::Object(body.user_data.clone())).map_err(|e| e.to_string())
}

impl ServerObjectResolver {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn generator(&self) -> Generator {
        Generator::ServerObject
    }

    /// Reference record for a server-owned node. The fetched payload is not
    /// written.
    pub fn to_json(&self, node: &SceneNode) -> Result<Record, SerializeError> {
        let mut body = ObjectBody::of(node);
        asset_ref(&body).map_err(|message| SerializeError::Malformed {
            generator: self.generator().as_str().to_string(),
            id: node.id.to_string(),
            message,
        })?;
        body.user_data.insert(SERVER_KEY.to_string(), Value::Bool(true));
        node_record(node, self.generator(), &body)
    }

    /// Fetch and decode the referenced asset, then rebuild the node.
    pub async fn from_json(
        &self,
        record: &Record,
        options: &LoadOptions,
    ) -> Result<SceneNode, ResolveError> {
        let body: ObjectBody = record.body()?;
        let asset = asset_ref(&body).map_err(|message| ResolveError::MissingAsset {
            id: record.id.clone(),
            message,
        })?;

        let url = resolve_url(&options.server, &asset.url)?;
        log::debug!("Fetching server object {} from {}", record.id, url);
        let data = self.fetcher.fetch(&url).await?;
        let payload = decode_payload(asset.kind, &data, url.as_str())?;

        let kind = NodeKind::ServerObject(ServerObject {
            payload: Some(payload),
        });
        let mut node = body.into_node(record, kind);
        node.user_data.insert(SERVER_KEY.to_string(), Value::Bool(true));
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use void_asset_server::MemoryAssetSource;
    use void_scene::{ServerAssetKind, ServerPayload};

    fn model_ref() -> ServerAssetRef {
        ServerAssetRef {
            id: "crate-01".to_string(),
            url: "/models/crate.json".to_string(),
            kind: ServerAssetKind::Model,
        }
    }

    #[test]
    fn test_reference_record() {
        let resolver = ServerObjectResolver::new(Arc::new(MemoryAssetSource::new()));
        let node = SceneNode::server_object("Crate", &model_ref());

        let record = resolver.to_json(&node).unwrap();
        assert_eq!(record.metadata.generator, "ServerObject");
        assert_eq!(record.fields["userData"]["Url"], "/models/crate.json");
        assert!(record.fields.get("payload").is_none());
        assert!(record.is_server_object());
    }

    #[test]
    fn test_missing_url_is_error() {
        let resolver = ServerObjectResolver::new(Arc::new(MemoryAssetSource::new()));
        let node = SceneNode::group("Fake").with_user_data("Server", true);
        assert!(matches!(
            resolver.to_json(&node),
            Err(SerializeError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_and_decode() {
        let source = Arc::new(MemoryAssetSource::new());
        source.insert(
            "http://assets.test/models/crate.json",
            br#"{"geometry":{"type":"BoxGeometry","width":2.0,"height":2.0,"depth":2.0}}"#.to_vec(),
        );
        let resolver = ServerObjectResolver::new(source.clone());
        let node = SceneNode::server_object("Crate", &model_ref()).with_position([0.0, 1.0, 0.0]);
        let record = resolver.to_json(&node).unwrap();

        let options = LoadOptions {
            server: "http://assets.test".to_string(),
        };
        let loaded = resolver.from_json(&record, &options).await.unwrap();
        assert_eq!(loaded.id, node.id);
        assert_eq!(loaded.transform.position, [0.0, 1.0, 0.0]);
        assert!(loaded.is_server_owned());
        assert!(matches!(
            &loaded.kind,
            NodeKind::ServerObject(ServerObject {
                payload: Some(ServerPayload::Model { .. })
            })
        ));
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recoverable() {
        let resolver = ServerObjectResolver::new(Arc::new(MemoryAssetSource::new()));
        let record = resolver
            .to_json(&SceneNode::server_object("Crate", &model_ref()))
            .unwrap();

        let err = resolver
            .from_json(&record, &LoadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Fetch(_)));
        assert!(err.is_recoverable());
    }
}
