// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{
    crawl_service, crawl_service_with_timeout, page_html, quotes_site, setup_context,
};
use quotecrawl::domain::models::job::{JobStatus, ScrapeJob};
use quotecrawl::domain::repositories::author_repository::{AuthorQueryParams, AuthorRepository};
use quotecrawl::domain::repositories::job_repository::JobRepository;
use quotecrawl::domain::repositories::quote_repository::{QuoteQueryParams, QuoteRepository};
use quotecrawl::domain::repositories::scrape_error_repository::ScrapeErrorRepository;
use quotecrawl::domain::repositories::site_repository::SiteRepository;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_two_quote_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            &[
                ("The first truth", Some("Alice Cooper")),
                ("An orphan line", None),
            ],
            Some("/page/2/"),
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            &[("The second truth", Some("Bob Dylan"))],
            None,
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scenario_a_two_pages_end_in_success() {
    let server = MockServer::start().await;
    mount_two_quote_pages(&server).await;

    let ctx = setup_context().await;
    let site = quotes_site(&server.uri(), 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let summary = crawl_service(&ctx).run_job(job.id).await.unwrap();

    assert_eq!(summary.status, JobStatus::Success);
    assert_eq!(summary.quotes_fetched, 2);
    assert_eq!(summary.quotes_saved, 3);
    assert_eq!(summary.errors_count, 0);

    let stored = ctx.jobs.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Success);
    assert!(stored.started_at.is_some());
    assert!(stored.finished_at.is_some());

    let (quotes, total) = ctx
        .quotes
        .query(QuoteQueryParams::default())
        .await
        .unwrap();
    assert_eq!(total, 3);

    // 没有作者的引文以空作者引用入库（场景D）
    let orphan = quotes
        .iter()
        .find(|q| q.text == "An orphan line")
        .expect("orphan quote stored");
    assert!(orphan.author_id.is_none());

    let authored = quotes
        .iter()
        .find(|q| q.text == "The first truth")
        .expect("authored quote stored");
    assert!(authored.author_id.is_some());
    assert_eq!(authored.saved_by_job, Some(job.id));

    let errors = ctx.errors.find_by_job(job.id).await.unwrap();
    assert!(errors.is_empty());
}

#[tokio::test]
async fn test_scenario_b_fetch_timeout_fails_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_html(&[("too late", None)], None))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let ctx = setup_context().await;
    let site = quotes_site(&server.uri(), 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let service = crawl_service_with_timeout(&ctx, Duration::from_millis(300));
    let summary = service.run_job(job.id).await.unwrap();

    assert_eq!(summary.status, JobStatus::Failed);
    assert_eq!(summary.quotes_fetched, 0);
    assert_eq!(summary.quotes_saved, 0);
    assert_eq!(summary.errors_count, 1);

    let errors = ctx.errors.find_by_job(job.id).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_type, "network");
    assert!(errors[0].url.is_some());
}

#[tokio::test]
async fn test_scenario_c_rerun_is_idempotent() {
    let server = MockServer::start().await;
    mount_two_quote_pages(&server).await;

    let ctx = setup_context().await;
    let site = quotes_site(&server.uri(), 10);
    ctx.sites.create(&site).await.unwrap();

    let first = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    let first_summary = crawl_service(&ctx).run_job(first.id).await.unwrap();
    assert_eq!(first_summary.quotes_saved, 3);

    // 第二次执行面对完全相同的页面内容
    let second = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();
    let second_summary = crawl_service(&ctx).run_job(second.id).await.unwrap();

    // 所有引文都已按哈希存在，本次一条未增
    assert_eq!(second_summary.quotes_saved, 0);
    assert_eq!(second_summary.quotes_fetched, 2);
    assert_eq!(second_summary.status, JobStatus::Failed);

    let (_, total) = ctx
        .quotes
        .query(QuoteQueryParams::default())
        .await
        .unwrap();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_scenario_e_max_pages_caps_crawl() {
    let server = MockServer::start().await;
    mount_two_quote_pages(&server).await;

    let ctx = setup_context().await;
    let site = quotes_site(&server.uri(), 1);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let summary = crawl_service(&ctx).run_job(job.id).await.unwrap();

    // 第一页带有有效的下一页链接，但页数上限为1
    assert_eq!(summary.quotes_fetched, 1);
    assert_eq!(summary.quotes_saved, 2);
    assert_eq!(summary.status, JobStatus::Success);
}

#[tokio::test]
async fn test_fallback_pagination_without_selector() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <div class="quote"><span class="text">From page one</span></div>
                <a rel="next" href="/page/2/">more</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            &[("From page two", Some("Carol"))],
            None,
        )))
        .mount(&server)
        .await;

    let ctx = setup_context().await;
    let mut site = quotes_site(&server.uri(), 10);
    site.pagination_selector = String::new();
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let summary = crawl_service(&ctx).run_job(job.id).await.unwrap();

    assert_eq!(summary.quotes_fetched, 2);
    assert_eq!(summary.quotes_saved, 2);
}

#[tokio::test]
async fn test_differently_cased_authors_share_quote_hash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            &[
                ("Case matters", Some("Alice Cooper")),
                ("Case  matters", Some("ALICE COOPER")),
            ],
            None,
        )))
        .mount(&server)
        .await;

    let ctx = setup_context().await;
    let site = quotes_site(&server.uri(), 10);
    ctx.sites.create(&site).await.unwrap();
    let job = ctx
        .jobs
        .create(&ScrapeJob::new(site.id, None, None))
        .await
        .unwrap();

    let summary = crawl_service(&ctx).run_job(job.id).await.unwrap();

    // 哈希规范化折叠空白和大小写：第二个候选视为重复
    assert_eq!(summary.quotes_saved, 1);
    let (_, quote_total) = ctx
        .quotes
        .query(QuoteQueryParams::default())
        .await
        .unwrap();
    assert_eq!(quote_total, 1);

    // 重复候选在哈希预检处短路，它的作者行不会被创建
    let (authors, author_total) = ctx
        .authors
        .query(AuthorQueryParams::default())
        .await
        .unwrap();
    assert_eq!(author_total, 1);
    assert_eq!(authors[0].name, "Alice Cooper");
}
