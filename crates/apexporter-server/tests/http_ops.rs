#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;

use apexporter_core::{MapSnapshot, PlayerSnapshot};
use apexporter_server::app_state::AppState;
use apexporter_server::obs::ApexMetrics;
use apexporter_server::router::build_router;

async fn serve(metrics: Arc<ApexMetrics>) -> SocketAddr {
    let app = build_router(AppState::new(metrics));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn snapshots() -> (MapSnapshot, PlayerSnapshot) {
    let map = MapSnapshot {
        current_map: "Olympus".into(),
        current_duration_mins: 60.0,
        current_remaining_mins: 12.0,
        next_map: "Storm Point".into(),
        next_start: 1697706000.0,
        next_duration_mins: 90.0,
    };
    let mut player = PlayerSnapshot {
        identifier: "NotAWraithMain".into(),
        level: 512.0,
        kill_death_ratio: "1.25".into(),
        ..Default::default()
    };
    player.legend_kills.insert("Wraith".into(), 4521.0);
    (map, player)
}

#[tokio::test]
async fn readyz_waits_for_first_publish() {
    let metrics = Arc::new(ApexMetrics::default());
    let addr = serve(Arc::clone(&metrics)).await;

    let resp = reqwest::get(format!("http://{addr}/readyz")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 503);

    let (map, player) = snapshots();
    metrics.publish(&map, &player);
    let resp = reqwest::get(format!("http://{addr}/readyz")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    metrics.set_draining();
    let resp = reqwest::get(format!("http://{addr}/readyz")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 503);
    assert_eq!(resp.text().await.unwrap(), "draining");
}

#[tokio::test]
async fn healthz_is_ok() {
    let addr = serve(Arc::new(ApexMetrics::default())).await;
    let resp = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn metrics_exposition() {
    let metrics = Arc::new(ApexMetrics::default());
    let addr = serve(Arc::clone(&metrics)).await;
    let (map, player) = snapshots();
    metrics.publish(&map, &player);

    let resp = reqwest::get(format!("http://{addr}/metrics")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let ctype = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(ctype.starts_with("text/plain; version=0.0.4"));

    let body = resp.text().await.unwrap();
    for line in [
        "# TYPE apex_current_map_info gauge",
        "apex_current_map_info{map_name=\"Olympus\"} 1",
        "apex_current_map_duration_total{map_name=\"Olympus\"} 60",
        "apex_current_map_remaining_total{map_name=\"Olympus\"} 12",
        "apex_next_map_start_total{map_name=\"Storm Point\"} 1697706000",
        "apex_player_identifier_info{name=\"NotAWraithMain\"} 1",
        "player_level 512",
        "player_legend_kills{legend=\"Wraith\"} 4521",
        "player_kill_death_ratio_info{kd=\"1.25\"} 1",
        "apex_exporter_draining 0",
    ] {
        assert!(body.lines().any(|l| l == line), "missing {line:?} in:\n{body}");
    }
}

#[tokio::test]
async fn republish_drops_stale_map_series() {
    let metrics = Arc::new(ApexMetrics::default());
    let (mut map, player) = snapshots();
    metrics.publish(&map, &player);

    map.current_map = "World's Edge".into();
    metrics.publish(&map, &player);

    let body = metrics.render();
    assert!(!body.contains("Olympus"), "{body}");
    assert_eq!(metrics.current_map_duration.len(), 1);
}
