use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    data_file: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // isolated roster file per test run
    let data_file = format!("target/test-data/{}/students.json", Uuid::new_v4());
    let mut cfg = AppConfig::default();
    cfg.storage.data_file = data_file.clone();
    cfg.static_files.dir = "/nonexistent-static-dir".into();

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_file })
}

#[tokio::test]
async fn e2e_roster_persists_to_file() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    // absent file reads as an empty roster
    let res = c.get(format!("{}/api/admin/all-students", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["students"], json!([]));

    let res = c
        .post(format!("{}/api/admin/add-student", app.base_url))
        .json(&json!({"id": "123456789", "firstName": "Tamar", "lastName": "Peretz", "grade": "10", "className": "2"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .post(format!("{}/api/submit", app.base_url))
        .json(&json!({"studentId": "123456789", "selections": ["sweater", "hair"]}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["pointsAdded"], 10);

    let res = c.get(format!("{}/api/student/123456789", app.base_url)).send().await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["student"]["totalPoints"], 10);
    assert_eq!(body["student"]["canFillToday"], false);

    // the file on disk is the source of truth
    let raw: Value = serde_json::from_slice(&tokio::fs::read(&app.data_file).await?)?;
    assert_eq!(raw["students"][0]["id"], "123456789");
    assert_eq!(raw["students"][0]["pointsByCategory"]["sweater"], 5);

    let _ = tokio::fs::remove_file(&app.data_file).await;
    Ok(())
}

#[tokio::test]
async fn e2e_edits_to_the_file_are_seen_on_next_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let doc = json!({"students": [{
        "id": "9", "firstName": "Omer", "lastName": "Biton", "grade": "8", "class": "5",
        "totalPoints": 40, "lastFillDate": null,
        "pointsByCategory": {"collar": 10, "hair": 10, "makeup": 10, "shoes": 5, "sweater": 5}
    }]});
    tokio::fs::write(&app.data_file, serde_json::to_vec_pretty(&doc)?).await?;

    let res = c.get(format!("{}/api/student/9", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["student"]["totalPoints"], 40);
    assert_eq!(body["student"]["class"], "5");
    assert_eq!(body["student"]["canFillToday"], true);

    let _ = tokio::fs::remove_file(&app.data_file).await;
    Ok(())
}
