// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{quotes_site, setup_context, MockJobQueue, TestContext};
use axum::http::StatusCode;
use axum::Extension;
use axum_test::TestServer;
use quotecrawl::domain::models::job::ScrapeJob;
use quotecrawl::domain::models::scrape_error::{ErrorKind, NewScrapeError};
use quotecrawl::domain::repositories::job_repository::JobRepository;
use quotecrawl::domain::repositories::scrape_error_repository::ScrapeErrorRepository;
use quotecrawl::domain::repositories::site_repository::SiteRepository;
use quotecrawl::presentation::routes;
use quotecrawl::queue::job_queue::JobQueue;
use serde_json::{json, Value};
use std::sync::Arc;

async fn test_server() -> (TestServer, TestContext, Arc<MockJobQueue>) {
    let ctx = setup_context().await;
    let queue = Arc::new(MockJobQueue::new());

    let app = routes::routes()
        .layer(Extension(ctx.sites.clone()))
        .layer(Extension(ctx.authors.clone()))
        .layer(Extension(ctx.quotes.clone()))
        .layer(Extension(ctx.jobs.clone()))
        .layer(Extension(ctx.errors.clone()))
        .layer(Extension(queue.clone() as Arc<dyn JobQueue>));

    let server = TestServer::new(app).expect("failed to start test server");
    (server, ctx, queue)
}

fn site_payload(name: &str) -> Value {
    json!({
        "name": name,
        "base_url": "http://quotes.example.com",
        "quote_selector": "span.text",
        "author_selector": "small.author",
        "pagination_selector": "li.next > a",
        "max_pages": 5,
        "rate_limit_ms": 100
    })
}

#[tokio::test]
async fn test_health_and_version() {
    let (server, _ctx, _queue) = test_server().await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");

    let response = server.get("/v1/version").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_get_site() {
    let (server, _ctx, _queue) = test_server().await;

    let response = server.post("/v1/sites").json(&site_payload("quotes")).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["name"], "quotes");
    assert_eq!(created["active"], true);

    let id = created["id"].as_str().unwrap();
    let response = server.get(&format!("/v1/sites/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let fetched: Value = response.json();
    assert_eq!(fetched["quote_selector"], "span.text");

    let response = server.get("/v1/sites").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let listed: Value = response.json();
    assert_eq!(listed["total"], 1);
}

#[tokio::test]
async fn test_create_site_rejects_bad_url() {
    let (server, _ctx, _queue) = test_server().await;

    let mut payload = site_payload("bad-url");
    payload["base_url"] = json!("not a url");
    let response = server.post("/v1/sites").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_site_rejects_bad_selector() {
    let (server, _ctx, _queue) = test_server().await;

    let mut payload = site_payload("bad-selector");
    payload["quote_selector"] = json!("div..");
    let response = server.post("/v1/sites").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_site_rejects_duplicate_name() {
    let (server, _ctx, _queue) = test_server().await;

    let response = server.post("/v1/sites").json(&site_payload("quotes")).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server.post("/v1/sites").json(&site_payload("quotes")).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_patch_site_toggles_active() {
    let (server, _ctx, _queue) = test_server().await;

    let created: Value = server
        .post("/v1/sites")
        .json(&site_payload("quotes"))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/v1/sites/{}", id))
        .json(&json!({ "active": false, "max_pages": 2 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["active"], false);
    assert_eq!(updated["max_pages"], 2);
}

#[tokio::test]
async fn test_create_job_enqueues_envelope() {
    let (server, _ctx, queue) = test_server().await;

    let created: Value = server
        .post("/v1/sites")
        .json(&site_payload("quotes"))
        .await
        .json();
    let site_id = created["id"].as_str().unwrap();

    let response = server
        .post("/v1/jobs")
        .json(&json!({ "site_id": site_id, "initiator": "manual" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let job: Value = response.json();
    assert_eq!(job["status"], "PENDING");
    assert_eq!(job["initiator"], "manual");

    let enqueued = queue.enqueued();
    assert_eq!(enqueued.len(), 1);
    assert_eq!(enqueued[0].attempt, 1);
    assert_eq!(enqueued[0].job_id.to_string(), job["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_create_job_rejects_inactive_site() {
    let (server, ctx, queue) = test_server().await;

    let mut site = quotes_site("http://quotes.example.com", 5);
    site.active = false;
    ctx.sites.create(&site).await.unwrap();

    let response = server
        .post("/v1/jobs")
        .json(&json!({ "site_id": site.id }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(queue.enqueued().is_empty());
}

#[tokio::test]
async fn test_create_job_rejects_unknown_site() {
    let (server, _ctx, _queue) = test_server().await;

    let response = server
        .post("/v1/jobs")
        .json(&json!({ "site_id": uuid::Uuid::new_v4() }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_job_rejects_non_object_meta() {
    let (server, ctx, _queue) = test_server().await;

    let site = quotes_site("http://quotes.example.com", 5);
    ctx.sites.create(&site).await.unwrap();

    let response = server
        .post("/v1/jobs")
        .json(&json!({ "site_id": site.id, "meta": [1, 2, 3] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_job_only_from_pending() {
    let (server, ctx, queue) = test_server().await;

    let site = quotes_site("http://quotes.example.com", 5);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let response = server.post(&format!("/v1/jobs/{}/start", job.id)).await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    assert_eq!(queue.enqueued().len(), 1);

    // 运行中的任务不允许再次入队
    ctx.jobs.mark_running(job.id).await.unwrap();
    let response = server.post(&format!("/v1/jobs/{}/start", job.id)).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_job_meta_and_initiator() {
    let (server, ctx, _queue) = test_server().await;

    let site = quotes_site("http://quotes.example.com", 5);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let response = server
        .patch(&format!("/v1/jobs/{}", job.id))
        .json(&json!({ "initiator": "scheduler", "meta": { "reason": "nightly" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["initiator"], "scheduler");
    assert_eq!(updated["meta"]["reason"], "nightly");
    // 状态不受PATCH影响
    assert_eq!(updated["status"], "PENDING");
}

#[tokio::test]
async fn test_list_jobs_rejects_bad_status_filter() {
    let (server, _ctx, _queue) = test_server().await;

    let response = server.get("/v1/jobs?status=BOGUS").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_job_errors_listing() {
    let (server, ctx, _queue) = test_server().await;

    let site = quotes_site("http://quotes.example.com", 5);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    ctx.errors
        .record(&NewScrapeError {
            job_id: job.id,
            url: Some("http://quotes.example.com/".to_string()),
            kind: ErrorKind::Parse,
            message: "boom".to_string(),
            traceback: None,
        })
        .await
        .unwrap();

    let response = server.get(&format!("/v1/jobs/{}/errors", job.id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0]["error_type"], "parse");
}

#[tokio::test]
async fn test_get_missing_job_is_404() {
    let (server, _ctx, _queue) = test_server().await;

    let response = server
        .get(&format!("/v1/jobs/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
