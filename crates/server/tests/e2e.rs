use std::net::SocketAddr;
use std::path::PathBuf;

use configs::AppConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

fn data_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("academy_e2e_{}", Uuid::new_v4()))
        .join("database.json")
}

fn config_for(path: &PathBuf) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.path = path.to_string_lossy().into_owned();
    cfg
}

async fn start_server(cfg: &AppConfig) -> anyhow::Result<TestApp> {
    let app = server::build_app(cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, handle })
}

#[tokio::test]
async fn e2e_state_survives_restart() -> anyhow::Result<()> {
    let path = data_file();
    let cfg = config_for(&path);
    let client = reqwest::Client::new();

    let app = start_server(&cfg).await?;
    let seeded: Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
    assert_eq!(seeded, json!({"admins": [{"id": "admin", "password": "admin", "name": "Administrator"}], "users": []}));

    let res = client
        .post(format!("{}/api/register", app.base_url))
        .json(&json!({"applicationNumber": "A100", "password": "p1", "role": "candidate"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let user_id = body["userId"].as_str().expect("userId").to_string();

    let res = client
        .post(format!("{}/api/training/complete", app.base_url))
        .json(&json!({"userId": user_id, "techniqueData": {"name": "layer cut"}}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let before: Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
    app.handle.abort();

    // second process over the same file
    let app = start_server(&cfg).await?;
    let res = client
        .post(format!("{}/api/login", app.base_url))
        .json(&json!({"id": "A100", "password": "p1", "role": "candidate"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["completedTechniques"], json!([{"name": "layer cut"}]));

    let after: Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
    assert_eq!(before, after);
    assert_eq!(after["users"][0]["password"], "p1");

    app.handle.abort();
    let _ = tokio::fs::remove_dir_all(path.parent().expect("parent")).await;
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_file_is_moved_aside() -> anyhow::Result<()> {
    let path = data_file();
    let dir = path.parent().expect("parent").to_path_buf();
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(&path, b"{\"users\": [ truncated").await?;

    let app = start_server(&config_for(&path)).await?;
    let res = reqwest::Client::new()
        .post(format!("{}/api/login", app.base_url))
        .json(&json!({"id": "admin", "password": "admin", "role": "admin"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let mut entries = tokio::fs::read_dir(&dir).await?;
    let mut quarantined = 0;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().contains(".corrupt-") {
            quarantined += 1;
        }
    }
    assert_eq!(quarantined, 1);

    app.handle.abort();
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_file_with_fail_policy_aborts() -> anyhow::Result<()> {
    let path = data_file();
    let dir = path.parent().expect("parent").to_path_buf();
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(&path, b"not json at all").await?;

    let mut cfg = config_for(&path);
    cfg.storage.on_corrupt = configs::CorruptStatePolicy::Fail;
    assert!(server::build_app(&cfg).await.is_err());
    assert_eq!(tokio::fs::read(&path).await?, b"not json at all");

    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}
