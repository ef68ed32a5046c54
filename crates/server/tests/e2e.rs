use std::net::SocketAddr;

use configs::{AppConfig, DatabaseConfig};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    data_dir: std::path::PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated database file per run; the nested directory does not exist yet
    let data_dir = std::env::temp_dir().join(format!("towerboard-e2e-{}", Uuid::new_v4()));
    let db_path = data_dir.join("db").join("data.sqlite");

    let mut cfg = AppConfig::default();
    cfg.database = DatabaseConfig::for_path(&db_path.to_string_lossy());
    cfg.normalize_and_validate()?;

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_dir })
}

#[tokio::test]
async fn e2e_full_session() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/api/stats", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"totalBaseDrops": 0}));

    let res = c.post(format!("{}/api/tower/start", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"totalBaseDrops": 1}));

    let res = c.post(format!("{}/api/score", app.base_url))
        .json(&json!({"nickname": "echo", "floors": 8}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"ok": true}));

    let res = c.post(format!("{}/api/score", app.base_url))
        .json(&json!({"nickname": "echo", "floors": -1}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.get(format!("{}/api/leaderboard?top=1", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"top": [{"rank": 1, "nickname": "echo", "floors": 8}]}));
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_tower_starts() -> anyhow::Result<()> {
    const N: i64 = 16;
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let mut handles = Vec::new();
    for _ in 0..N {
        let c = c.clone();
        let url = format!("{}/api/tower/start", app.base_url);
        handles.push(tokio::spawn(async move {
            let v = c.post(url).send().await?.json::<Value>().await?;
            anyhow::Ok(v["totalBaseDrops"].as_i64().unwrap_or_default())
        }));
    }
    let mut seen = Vec::new();
    for h in handles {
        seen.push(h.await??);
    }
    seen.sort_unstable();
    assert_eq!(seen, (1..=N).collect::<Vec<_>>());

    let res = c.get(format!("{}/api/stats", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"totalBaseDrops": N}));
    Ok(())
}
