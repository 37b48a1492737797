// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{quotes_site, setup_context};
use quotecrawl::domain::models::job::{CounterDeltas, JobStatus, ScrapeJob};
use quotecrawl::domain::models::quote::NewQuote;
use quotecrawl::domain::models::scrape_error::{ErrorKind, NewScrapeError};
use quotecrawl::domain::repositories::author_repository::AuthorRepository;
use quotecrawl::domain::repositories::job_repository::JobRepository;
use quotecrawl::domain::repositories::quote_repository::{QuoteQueryParams, QuoteRepository};
use quotecrawl::domain::repositories::scrape_error_repository::ScrapeErrorRepository;
use quotecrawl::domain::repositories::site_repository::SiteRepository;
use quotecrawl::domain::repositories::RepositoryError;
use quotecrawl::domain::services::quote_hash::compute_quote_hash;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_increment_counters_accumulates() {
    let ctx = setup_context().await;
    let site = quotes_site("http://example.com", 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    ctx.jobs
        .increment_counters(
            job.id,
            &CounterDeltas {
                fetched: 1,
                saved: 2,
                errors: 0,
            },
        )
        .await
        .unwrap();
    ctx.jobs
        .increment_counters(
            job.id,
            &CounterDeltas {
                fetched: 1,
                saved: 0,
                errors: 3,
            },
        )
        .await
        .unwrap();

    let stored = ctx.jobs.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.quotes_fetched, 2);
    assert_eq!(stored.quotes_saved, 2);
    assert_eq!(stored.errors_count, 3);
}

#[tokio::test]
async fn test_increment_counters_unknown_job() {
    let ctx = setup_context().await;

    let result = ctx
        .jobs
        .increment_counters(Uuid::new_v4(), &CounterDeltas::default())
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_mark_finished_derives_status_from_counters() {
    let ctx = setup_context().await;
    let site = quotes_site("http://example.com", 10);
    ctx.sites.create(&site).await.unwrap();

    // saved>0, errors=0 → SUCCESS
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    ctx.jobs
        .increment_counters(
            job.id,
            &CounterDeltas {
                fetched: 1,
                saved: 2,
                errors: 0,
            },
        )
        .await
        .unwrap();
    let finished = ctx.jobs.mark_finished(job.id, true).await.unwrap();
    assert_eq!(finished.status, JobStatus::Success);
    assert!(finished.finished_at.is_some());

    // saved>0, errors>0 → PARTIAL
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    ctx.jobs
        .increment_counters(
            job.id,
            &CounterDeltas {
                fetched: 1,
                saved: 2,
                errors: 1,
            },
        )
        .await
        .unwrap();
    let finished = ctx.jobs.mark_finished(job.id, true).await.unwrap();
    assert_eq!(finished.status, JobStatus::Partial);

    // saved=0 → FAILED，即使没有错误
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    let finished = ctx.jobs.mark_finished(job.id, true).await.unwrap();
    assert_eq!(finished.status, JobStatus::Failed);

    // 显式失败无条件FAILED
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    ctx.jobs
        .increment_counters(
            job.id,
            &CounterDeltas {
                fetched: 1,
                saved: 5,
                errors: 0,
            },
        )
        .await
        .unwrap();
    let finished = ctx.jobs.mark_finished(job.id, false).await.unwrap();
    assert_eq!(finished.status, JobStatus::Failed);
}

#[tokio::test]
async fn test_mark_running_sets_started_at() {
    let ctx = setup_context().await;
    let site = quotes_site("http://example.com", 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let running = ctx.jobs.mark_running(job.id).await.unwrap();
    assert_eq!(running.status, JobStatus::Running);
    assert!(running.started_at.is_some());

    // 没有二次启动保护：再次调用覆盖开始时间
    let running_again = ctx.jobs.mark_running(job.id).await.unwrap();
    assert!(running_again.started_at.is_some());
    assert!(running_again.started_at >= running.started_at);
}

#[tokio::test]
async fn test_save_candidate_dedupes_by_hash() {
    let ctx = setup_context().await;
    let site = quotes_site("http://example.com", 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let candidate = NewQuote {
        text: "Same content".to_string(),
        author_name: Some("Alice".to_string()),
        site_id: site.id,
        source_url: "http://example.com/".to_string(),
        hash: compute_quote_hash("Same content", Some("Alice")),
        job_id: job.id,
    };

    let first = ctx.quotes.save_candidate(&candidate).await.unwrap();
    assert!(first.is_some());

    let second = ctx.quotes.save_candidate(&candidate).await.unwrap();
    assert!(second.is_none());

    assert!(ctx.quotes.exists_by_hash(&candidate.hash).await.unwrap());
    let (_, total) = ctx
        .quotes
        .query(QuoteQueryParams::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn test_save_candidate_reuses_author() {
    let ctx = setup_context().await;
    let site = quotes_site("http://example.com", 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    for text in ["First words", "Second words"] {
        let candidate = NewQuote {
            text: text.to_string(),
            author_name: Some("Shared Author".to_string()),
            site_id: site.id,
            source_url: "http://example.com/".to_string(),
            hash: compute_quote_hash(text, Some("Shared Author")),
            job_id: job.id,
        };
        ctx.quotes.save_candidate(&candidate).await.unwrap();
    }

    let author = ctx
        .authors
        .find_by_name("Shared Author")
        .await
        .unwrap()
        .expect("author created once");

    let (quotes, total) = ctx
        .quotes
        .query(QuoteQueryParams {
            author_id: Some(author.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(quotes.iter().all(|q| q.author_id == Some(author.id)));
}

#[tokio::test]
async fn test_get_or_create_author_is_case_sensitive() {
    let ctx = setup_context().await;

    let lower = ctx.authors.get_or_create("alice").await.unwrap();
    let upper = ctx.authors.get_or_create("Alice").await.unwrap();
    let again = ctx.authors.get_or_create("alice").await.unwrap();

    assert_ne!(lower.id, upper.id);
    assert_eq!(lower.id, again.id);
}

#[tokio::test]
async fn test_site_name_is_unique() {
    let ctx = setup_context().await;
    let site = quotes_site("http://example.com", 10);
    ctx.sites.create(&site).await.unwrap();

    let mut clone = quotes_site("http://example.org", 10);
    clone.name = site.name.clone();
    let result = ctx.sites.create(&clone).await;

    assert!(matches!(result, Err(RepositoryError::AlreadyExists)));
}

#[tokio::test]
async fn test_update_meta_leaves_status_and_counters_alone() {
    let ctx = setup_context().await;
    let site = quotes_site("http://example.com", 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    ctx.jobs
        .increment_counters(
            job.id,
            &CounterDeltas {
                fetched: 1,
                saved: 1,
                errors: 0,
            },
        )
        .await
        .unwrap();

    let updated = ctx
        .jobs
        .update_meta(
            job.id,
            Some("scheduler".to_string()),
            Some(json!({"note": "manual rerun"})),
        )
        .await
        .unwrap();

    assert_eq!(updated.initiator, "scheduler");
    assert_eq!(updated.meta, Some(json!({"note": "manual rerun"})));
    assert_eq!(updated.status, JobStatus::Pending);
    assert_eq!(updated.quotes_saved, 1);
}

#[tokio::test]
async fn test_scrape_errors_belong_to_job() {
    let ctx = setup_context().await;
    let site = quotes_site("http://example.com", 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    let other = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    ctx.errors
        .record(&NewScrapeError {
            job_id: job.id,
            url: Some("http://example.com/".to_string()),
            kind: ErrorKind::Network,
            message: "connection refused".to_string(),
            traceback: None,
        })
        .await
        .unwrap();

    let errors = ctx.errors.find_by_job(job.id).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_type, "network");

    let none = ctx.errors.find_by_job(other.id).await.unwrap();
    assert!(none.is_empty());
}
