use reqwest::Client;
use std::io::Write;
use std::sync::Arc;
use viz_cache::{GridMap, MemoryGrid};
use viz_gate::{AppState, GateConfig};

const CARS: &str = "make,mpg\nvw,31.5\nford,22\n";

async fn setup(grid: Arc<MemoryGrid>) -> (String, Client, tokio::task::JoinHandle<()>) {
    let mut config = GateConfig::default();
    config.fetch.allowed_urls = vec!["file:///*".into()];
    let state = AppState::with_grid(config, grid).unwrap();
    let (addr, handle) = viz_gate::test::spawn(state).await;
    (format!("http://{addr}"), Client::new(), handle)
}

fn data_file() -> (tempfile::NamedTempFile, String) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{CARS}").unwrap();
    let url = format!("file://{}", file.path().display());
    (file, url)
}

async fn page(http: &Client, base: &str, data: &str) -> reqwest::Response {
    http.get(format!("{base}/interpret/d3"))
        .query(&[("brunel_src", "x(mpg) y(make)"), ("data", data)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn loaded_data_is_cached_in_the_grid() {
    let grid = Arc::new(MemoryGrid::new("datasets"));
    let (base, http, _h) = setup(grid.clone()).await;
    let (file, data) = data_file();

    assert_eq!(page(&http, &base, &data).await.status(), 200);
    assert!(grid.get(&data).await.unwrap().is_some());

    // source gone, cache still serves it
    drop(file);
    assert_eq!(page(&http, &base, &data).await.status(), 200);
}

#[tokio::test]
async fn offline_grid_does_not_fail_requests() {
    let grid = Arc::new(MemoryGrid::new("datasets"));
    grid.set_online(false);
    let (base, http, _h) = setup(grid.clone()).await;
    let (_file, data) = data_file();

    assert_eq!(page(&http, &base, &data).await.status(), 200);
    assert_eq!(page(&http, &base, &data).await.status(), 200);
    grid.set_online(true);
    assert!(grid.is_empty(), "nothing stored while offline");
}

#[tokio::test]
async fn corrupt_entry_is_replaced_on_next_load() {
    let grid = Arc::new(MemoryGrid::new("datasets"));
    let (base, http, _h) = setup(grid.clone()).await;
    let (_file, data) = data_file();

    grid.upsert(&data, b"garbage".to_vec()).await.unwrap();
    assert_eq!(page(&http, &base, &data).await.status(), 200);

    let stored = grid.get(&data).await.unwrap().unwrap();
    assert!(stored.starts_with(b"VZD1"), "corrupt bytes replaced by a fresh encode");
}
