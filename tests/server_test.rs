//! End-to-end tests for routing and concurrent request handling.

use std::time::Duration;

use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn root_reports_configured_port() {
    let handle = common::start_server(4000).await;

    let response = reqwest::get(common::url(4000, "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.unwrap();
    assert_eq!(body, "Response from server running on port 4000");

    handle.shutdown(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test]
async fn unmatched_routes_return_404() {
    let handle = common::start_server(18081).await;
    let client = reqwest::Client::new();

    let get_other = client
        .get(common::url(18081, "/other"))
        .send()
        .await
        .unwrap();
    assert_eq!(get_other.status(), StatusCode::NOT_FOUND);

    let post_root = client.post(common::url(18081, "/")).send().await.unwrap();
    assert_eq!(post_root.status(), StatusCode::NOT_FOUND);

    let delete_healthz = client
        .delete(common::url(18081, "/healthz"))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_healthz.status(), StatusCode::NOT_FOUND);

    handle.shutdown(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test]
async fn concurrent_requests_all_succeed() {
    let port = 18082;
    let handle = common::start_server(port).await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for _ in 0..100 {
        let client = client.clone();
        let url = common::url(port, "/");
        tasks.push(tokio::spawn(async move {
            let response = client.get(&url).send().await.unwrap();
            (response.status(), response.text().await.unwrap())
        }));
    }

    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("Response from server running on port {port}"));
    }

    assert_eq!(handle.in_flight(), 0);
    handle.shutdown(Duration::from_secs(1)).await.unwrap();
}
