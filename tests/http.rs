use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DashboardView {
    title: String,
    charts: Vec<Value>,
    session: Value,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChangedResponse {
    changed: bool,
}

struct TestServer {
    base_url: String,
    data_path: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("metric_board_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_path: String) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_metric_board"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(unique_data_path()).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn dashboard(client: &Client, base_url: &str) -> DashboardView {
    client
        .get(format!("{base_url}/api/dashboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn set_title(client: &Client, base_url: &str, title: &str) {
    let response = client
        .put(format!("{base_url}/api/title"))
        .json(&json!({ "title": title }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn http_title_edit_commits_through_session() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let opened: Value = client
        .post(format!("{base}/api/edit/open"))
        .json(&json!({ "kind": "dashboardTitle" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(opened["state"], "editing");
    assert_eq!(opened["draft"]["type"], "text");

    let response = client
        .put(format!("{base}/api/edit/draft"))
        .json(&json!({ "text": "Sales Q3" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let committed: ChangedResponse = client
        .post(format!("{base}/api/edit/commit"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(committed.changed);

    let view = dashboard(&client, base).await;
    assert_eq!(view.title, "Sales Q3");
    assert_eq!(view.session["state"], "idle");

    let stored = std::fs::read_to_string(&server.data_path).unwrap();
    let stored: serde_json::Map<String, Value> = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["dashboardTitle"], "Sales Q3");
}

#[tokio::test]
async fn http_commit_without_edit_conflicts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/edit/commit", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn http_chart_add_then_delete() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let before = dashboard(&client, base).await.charts.len();

    let response = client.post(format!("{base}/api/charts")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: CreatedResponse = response.json().await.unwrap();
    assert!(created.id.starts_with("chart-"));

    let view = dashboard(&client, base).await;
    assert_eq!(view.charts.len(), before + 1);
    assert_eq!(view.charts[before]["id"], created.id.as_str());

    let removed: ChangedResponse = client
        .delete(format!("{base}/api/charts/{}", created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(removed.changed);

    let again: ChangedResponse = client
        .delete(format!("{base}/api/charts/{}", created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!again.changed);
    assert_eq!(dashboard(&client, base).await.charts.len(), before);
}

#[tokio::test]
async fn http_export_then_import_restores_title() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    set_title(&client, base, "Exported board").await;

    let response = client.get(format!("{base}/api/export")).send().await.unwrap();
    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("exported-board"));
    let exported = response.text().await.unwrap();

    set_title(&client, base, "Changed later").await;

    let response = client
        .post(format!("{base}/api/import"))
        .body(exported)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let view: DashboardView = response.json().await.unwrap();
    assert_eq!(view.title, "Exported board");
}

#[tokio::test]
async fn http_malformed_import_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let before = dashboard(&client, base).await;

    let response = client
        .post(format!("{base}/api/import"))
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = dashboard(&client, base).await;
    assert_eq!(after.title, before.title);
    assert_eq!(after.charts.len(), before.charts.len());
}

#[tokio::test]
async fn http_index_renders_title() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    set_title(&client, base, "Board <one>").await;
    let html = client
        .get(format!("{base}/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Board &lt;one&gt;"));
}

#[tokio::test]
async fn http_state_survives_restart() {
    let data_path = unique_data_path();
    let client = Client::new();

    let first = spawn_server(data_path.clone()).await;
    set_title(&client, &first.base_url, "Persistent").await;
    drop(first);

    let second = spawn_server(data_path).await;
    let view = dashboard(&client, &second.base_url).await;
    assert_eq!(view.title, "Persistent");
}

#[tokio::test]
async fn http_page_plan_rejects_unbounded_regions() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let response = client
        .post(format!("{base}/api/export/pages"))
        .json(&json!({
            "metrics": { "width": 1, "height": u32::MAX },
            "charts": { "width": 1, "height": 1 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let plan: Value = client
        .post(format!("{base}/api/export/pages"))
        .json(&json!({
            "metrics": { "width": 1900, "height": 1000 },
            "charts": { "width": 1900, "height": 1000 }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plan["pageCount"], 1);
}
