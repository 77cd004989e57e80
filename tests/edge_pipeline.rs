//! End-to-end pipeline tests for the edge router.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use edge_router::config::EdgeConfig;
use edge_router::http::HttpServer;
use edge_router::lifecycle::Shutdown;

mod common;

/// Example config rewired to test addresses, with a short upstream
/// timeout so failure tests stay fast.
fn test_config(proxy: SocketAddr, backend: SocketAddr, doc_root: &str) -> EdgeConfig {
    let mut config = EdgeConfig::example();
    config.listener.bind_address = proxy.to_string();
    config.upstream.address = backend.to_string();
    config.upstream.timeout_secs = 2;
    config.static_assets.document_root = doc_root.to_string();
    config.observability.metrics_enabled = false;
    config
}

async fn spawn_router(config: EdgeConfig, proxy: SocketAddr) -> Shutdown {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind(proxy).await.unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown
}

#[tokio::test]
async fn health_answers_with_backend_down() {
    let backend: SocketAddr = "127.0.0.1:29101".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29102".parse().unwrap();
    // Nothing listens on the backend address.
    let shutdown = spawn_router(test_config(proxy, backend, "/nonexistent"), proxy).await;

    let res = common::test_client()
        .get(format!("http://{proxy}/health"))
        .send()
        .await
        .expect("router unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "healthy");

    shutdown.trigger();
}

#[tokio::test]
async fn allow_listed_entry_script_dispatches() {
    let backend: SocketAddr = "127.0.0.1:29111".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29112".parse().unwrap();
    let calls = common::start_counting_backend(backend, "setup ok").await;
    let shutdown = spawn_router(test_config(proxy, backend, "/nonexistent"), proxy).await;

    let res = common::test_client()
        .get(format!("http://{proxy}/setup/index.php"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "setup ok");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn non_listed_entry_script_is_denied_without_backend_call() {
    let backend: SocketAddr = "127.0.0.1:29121".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29122".parse().unwrap();
    let calls = common::start_counting_backend(backend, "should not run").await;
    let shutdown = spawn_router(test_config(proxy, backend, "/nonexistent"), proxy).await;

    let res = common::test_client()
        .get(format!("http://{proxy}/setup/env.php"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn dotfile_path_is_denied_despite_catch_all() {
    let backend: SocketAddr = "127.0.0.1:29131".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29132".parse().unwrap();
    let calls = common::start_counting_backend(backend, "should not run").await;
    let shutdown = spawn_router(test_config(proxy, backend, "/nonexistent"), proxy).await;

    let client = common::test_client();
    for path in ["/.git/config", "/app/.env", "/.htaccess"] {
        let res = client.get(format!("http://{proxy}{path}")).send().await.unwrap();
        assert_eq!(res.status(), 403, "{path} should be denied");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn denied_media_pattern_is_forbidden() {
    let backend: SocketAddr = "127.0.0.1:29141".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29142".parse().unwrap();
    let shutdown = spawn_router(test_config(proxy, backend, "/nonexistent"), proxy).await;

    let res = common::test_client()
        .get(format!("http://{proxy}/media/customer/secret.csv"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);

    shutdown.trigger();
}

#[tokio::test]
async fn versioned_static_asset_gets_one_year_cache() {
    let backend: SocketAddr = "127.0.0.1:29151".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29152".parse().unwrap();

    let doc_root = tempfile::tempdir().unwrap();
    let css_dir = doc_root.path().join("static/v123/css");
    std::fs::create_dir_all(&css_dir).unwrap();
    std::fs::write(css_dir.join("app.css"), b"body { color: red }").unwrap();

    let shutdown = spawn_router(
        test_config(proxy, backend, doc_root.path().to_str().unwrap()),
        proxy,
    )
    .await;

    let res = common::test_client()
        .get(format!("http://{proxy}/static/v123/css/app.css"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["cache-control"],
        "public, max-age=31536000, immutable"
    );
    assert!(res.headers().contains_key("expires"));
    assert!(res.headers().contains_key("etag"));
    assert_eq!(res.text().await.unwrap(), "body { color: red }");

    shutdown.trigger();
}

#[tokio::test]
async fn media_asset_is_served_without_caching() {
    let backend: SocketAddr = "127.0.0.1:29161".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29162".parse().unwrap();

    let doc_root = tempfile::tempdir().unwrap();
    let media_dir = doc_root.path().join("media/wysiwyg");
    std::fs::create_dir_all(&media_dir).unwrap();
    std::fs::write(media_dir.join("banner.png"), b"\x89PNG").unwrap();

    let shutdown = spawn_router(
        test_config(proxy, backend, doc_root.path().to_str().unwrap()),
        proxy,
    )
    .await;

    let res = common::test_client()
        .get(format!("http://{proxy}/media/wysiwyg/banner.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["cache-control"], "no-store");
    assert!(!res.headers().contains_key("etag"));

    shutdown.trigger();
}

#[tokio::test]
async fn missing_static_asset_is_404() {
    let backend: SocketAddr = "127.0.0.1:29171".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29172".parse().unwrap();

    let doc_root = tempfile::tempdir().unwrap();
    let shutdown = spawn_router(
        test_config(proxy, backend, doc_root.path().to_str().unwrap()),
        proxy,
    )
    .await;

    let res = common::test_client()
        .get(format!("http://{proxy}/static/v1/missing.css"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn oversized_body_is_rejected_before_backend() {
    let backend: SocketAddr = "127.0.0.1:29181".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29182".parse().unwrap();
    let calls = common::start_counting_backend(backend, "should not run").await;

    let mut config = test_config(proxy, backend, "/nonexistent");
    config.upstream.max_body_bytes = 64;
    let shutdown = spawn_router(config, proxy).await;

    let res = common::test_client()
        .post(format!("http://{proxy}/checkout"))
        .body(vec![0u8; 4096])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 413);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn backend_down_yields_502() {
    let backend: SocketAddr = "127.0.0.1:29191".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29192".parse().unwrap();
    // Nothing listens on the backend address.
    let shutdown = spawn_router(test_config(proxy, backend, "/nonexistent"), proxy).await;

    let res = common::test_client()
        .get(format!("http://{proxy}/checkout/cart"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);

    shutdown.trigger();
}

#[tokio::test]
async fn query_string_reaches_backend_untouched() {
    let backend: SocketAddr = "127.0.0.1:29201".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29202".parse().unwrap();
    let seen = common::start_recording_backend(backend).await;
    let shutdown = spawn_router(test_config(proxy, backend, "/nonexistent"), proxy).await;

    let res = common::test_client()
        .get(format!("http://{proxy}/catalog/product?id=42&color=blue"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let head = &requests[0];
    assert!(
        head.starts_with("GET /catalog/product?id=42&color=blue HTTP/1.1"),
        "unexpected request line: {head}"
    );
    assert!(
        head.to_lowercase().contains("x-entry-script: index.php"),
        "entry script metadata missing: {head}"
    );
    assert!(
        head.to_lowercase().contains("x-forwarded-for: 127.0.0.1"),
        "client address metadata missing: {head}"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn traversal_path_is_a_client_error() {
    let backend: SocketAddr = "127.0.0.1:29211".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:29212".parse().unwrap();
    let calls = common::start_counting_backend(backend, "should not run").await;
    let shutdown = spawn_router(test_config(proxy, backend, "/nonexistent"), proxy).await;

    // Raw socket: a client library would normalize the path itself.
    let status_line = common::raw_request(proxy, "/static/%2e%2e/secret").await;
    assert!(status_line.contains("400"), "unexpected status: {status_line}");

    let status_line = common::raw_request(proxy, "/a/../b").await;
    assert!(status_line.contains("400"), "unexpected status: {status_line}");

    assert_eq!(calls.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}
