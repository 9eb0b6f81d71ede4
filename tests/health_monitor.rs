use axum::{http::StatusCode, routing::get, Router};
use std::{net::TcpListener, sync::Arc, time::Duration};
use studio_dashboard::{
    models::{ServiceEndpoint, ServiceName, ServiceStatus},
    monitor::{HealthMonitor, MonitorConfig},
    probe::ReqwestProbe,
};

fn spawn_service(status: StatusCode) -> String {
    let app = Router::new().route("/api/", get(move || async move { status }));
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test service");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::Server::from_tcp(listener)
            .expect("test server")
            .serve(app.into_make_service())
            .await;
    });
    format!("http://{addr}")
}

fn spawn_stalled_service() -> String {
    let app = Router::new().route(
        "/api/",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test service");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::Server::from_tcp(listener)
            .expect("test server")
            .serve(app.into_make_service())
            .await;
    });
    format!("http://{addr}")
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn monitor_for(urls: [String; 4], probe_timeout: Duration) -> HealthMonitor {
    let services = ServiceName::ALL
        .into_iter()
        .zip(urls)
        .map(|(name, url)| ServiceEndpoint::new(name, url))
        .collect();
    let config = MonitorConfig {
        probe_timeout,
        ..MonitorConfig::default()
    };
    let probe = ReqwestProbe::new(probe_timeout).expect("probe");
    HealthMonitor::new(Arc::new(probe), services, config)
}

#[tokio::test]
async fn two_reachable_and_two_refused_services() {
    let monitor = monitor_for(
        [
            spawn_service(StatusCode::OK),
            closed_port_url(),
            spawn_service(StatusCode::OK),
            closed_port_url(),
        ],
        Duration::from_secs(5),
    );

    let snapshot = monitor.probe_all().await;

    assert_eq!(snapshot.online_count(), 2);
    assert_eq!(snapshot.offline_count(), 2);
    assert_eq!(snapshot.status(ServiceName::Scenario), ServiceStatus::Online);
    assert_eq!(snapshot.status(ServiceName::Visual), ServiceStatus::Offline);
    assert_eq!(snapshot.status(ServiceName::Audio), ServiceStatus::Online);
    assert_eq!(snapshot.status(ServiceName::Editor), ServiceStatus::Offline);
}

#[tokio::test]
async fn error_status_counts_as_offline() {
    let monitor = monitor_for(
        [
            spawn_service(StatusCode::OK),
            spawn_service(StatusCode::INTERNAL_SERVER_ERROR),
            spawn_service(StatusCode::NOT_FOUND),
            spawn_service(StatusCode::NO_CONTENT),
        ],
        Duration::from_secs(5),
    );

    let snapshot = monitor.probe_all().await;

    assert_eq!(snapshot.status(ServiceName::Scenario), ServiceStatus::Online);
    assert_eq!(snapshot.status(ServiceName::Visual), ServiceStatus::Offline);
    assert_eq!(snapshot.status(ServiceName::Audio), ServiceStatus::Offline);
    assert_eq!(snapshot.status(ServiceName::Editor), ServiceStatus::Online);
}

#[tokio::test]
async fn stalled_service_does_not_hold_up_the_cycle() {
    let monitor = monitor_for(
        [
            spawn_service(StatusCode::OK),
            spawn_service(StatusCode::OK),
            spawn_stalled_service(),
            spawn_service(StatusCode::OK),
        ],
        Duration::from_millis(300),
    );
    let started = std::time::Instant::now();

    let snapshot = monitor.probe_all().await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(snapshot.status(ServiceName::Audio), ServiceStatus::Offline);
    assert_eq!(snapshot.online_count(), 3);
}
