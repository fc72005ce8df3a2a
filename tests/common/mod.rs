//! Shared fixtures: an in-process stub backend and a client state wired to it

use axum::Router;
use tempfile::TempDir;

use tarasul_client::config::Config;
use tarasul_client::models::User;
use tarasul_client::state::{create_shared_state, SharedState};

/// Serve the given router on an ephemeral port, returning its origin
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub backend");
    });

    format!("http://{}", addr)
}

/// Fresh client state with its own on-disk store, pointed at the stub
pub async fn client_state(api_url: &str) -> (TempDir, SharedState) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("client.db");
    let config = Config::with_api_url(api_url).expect("config");
    let state = create_shared_state(path.to_str().expect("utf-8 path"), config)
        .await
        .expect("client state");
    (dir, state)
}

pub fn sample_user() -> User {
    User {
        user_id: 1,
        email: "user@x.edu".to_string(),
        username: Some("user".to_string()),
        full_name: Some("Test User".to_string()),
        mobile: None,
        profile_picture: None,
    }
}
