//! Local HTTP servers standing in for the registry and pool APIs.

use std::time::Duration;

use axum::Router;

/// Serve the router built by `build` on an ephemeral port.
///
/// `build` receives the server's own base URL (`http://127.0.0.1:port`) so
/// a registry route can point pools back at the same server.
pub async fn serve(build: impl FnOnce(String) -> Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let router = build(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    base
}

/// Client with a short timeout so slow-endpoint tests finish quickly.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap()
}
