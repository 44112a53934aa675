//! Integration tests for void_asset_server

use std::io::Cursor;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use void_asset_server::*;
use void_scene::{Geometry, ServerAssetKind, ServerPayload};

/// Serve `response` once to the first connection and return the base url.
async fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await.unwrap();
        socket.write_all(&response).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{}", addr)
}

fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "HTTP/1.0 {}\r\nContent-Length: {}\r\n\r\n",
        status,
        body.len()
    )
    .into_bytes();
    out.extend_from_slice(body);
    out
}

#[tokio::test]
async fn test_remote_fetch_ok() {
    let body = br#"{"geometry":{"type":"SphereGeometry","radius":2.0,"widthSegments":8,"heightSegments":6}}"#;
    let base = serve_once(http_response("200 OK", body)).await;

    let source = RemoteAssetSource::new(RemoteConfig {
        base_url: base,
        timeout_ms: 5_000,
    });
    let url = source.url_for("/Upload/Model/ball.json").unwrap();
    let bytes = source.fetch(&url).await.unwrap();
    assert_eq!(bytes, body.to_vec());
    assert_eq!(source.cached_count(), 1);

    // Served from cache; the listener only accepts one connection.
    let again = source.fetch(&url).await.unwrap();
    assert_eq!(again, bytes);
}

#[tokio::test]
async fn test_remote_fetch_not_found() {
    let base = serve_once(http_response("404 Not Found", b"missing")).await;

    let source = RemoteAssetSource::new(RemoteConfig {
        base_url: base,
        timeout_ms: 5_000,
    });
    let url = source.url_for("/Upload/Model/none.json").unwrap();
    let err = source.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert_eq!(source.cached_count(), 0);
}

#[tokio::test]
async fn test_remote_rejects_https() {
    let source = RemoteAssetSource::new(RemoteConfig::default());
    let url = resolve_url("https://assets.example.com", "/a.png").unwrap();
    let err = source.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::UnsupportedScheme(_)));
}

#[tokio::test]
async fn test_memory_source_feeds_decoder() {
    let source = MemoryAssetSource::new();
    let url = resolve_url("http://assets.local", "/Upload/Model/box.json").unwrap();
    source.insert(
        url.as_str(),
        br#"{"name":"Box","geometry":{"type":"BoxGeometry","width":1,"height":2,"depth":3}}"#.to_vec(),
    );

    let bytes = source.fetch(&url).await.unwrap();
    let payload = decode_payload(ServerAssetKind::Model, &bytes, url.as_str()).unwrap();
    match payload {
        ServerPayload::Model { geometry, .. } => {
            assert_eq!(geometry, Geometry::cuboid(1.0, 2.0, 3.0))
        }
        other => panic!("expected model payload, got {:?}", other),
    }
}

#[test]
fn test_decode_texture_payload() {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();

    let payload = decode_payload(ServerAssetKind::Texture, png.get_ref(), "t.png").unwrap();
    match payload {
        ServerPayload::Texture {
            width,
            height,
            pixels,
        } => {
            assert_eq!((width, height), (3, 2));
            assert_eq!(pixels.len(), 3 * 2 * 4);
        }
        other => panic!("expected texture payload, got {:?}", other),
    }
}

#[test]
fn test_decode_wrong_kind_is_error() {
    let err = decode_payload(ServerAssetKind::Texture, b"{\"geometry\":{}}", "x.json").unwrap_err();
    assert!(matches!(err, LoaderError::Image { .. }));
}
