// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use quotecrawl::domain::models::site::ScrapeSite;
use quotecrawl::domain::services::crawl_service::CrawlService;
use quotecrawl::engines::reqwest_engine::ReqwestEngine;
use quotecrawl::infrastructure::repositories::author_repo_impl::AuthorRepositoryImpl;
use quotecrawl::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use quotecrawl::infrastructure::repositories::quote_repo_impl::QuoteRepositoryImpl;
use quotecrawl::infrastructure::repositories::scrape_error_repo_impl::ScrapeErrorRepositoryImpl;
use quotecrawl::infrastructure::repositories::site_repo_impl::SiteRepositoryImpl;
use quotecrawl::queue::job_queue::{JobEnvelope, JobQueue, QueueError};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// 集成测试上下文：内存sqlite加全部仓库实现
pub struct TestContext {
    pub db: Arc<DatabaseConnection>,
    pub sites: Arc<SiteRepositoryImpl>,
    pub authors: Arc<AuthorRepositoryImpl>,
    pub quotes: Arc<QuoteRepositoryImpl>,
    pub jobs: Arc<JobRepositoryImpl>,
    pub errors: Arc<ScrapeErrorRepositoryImpl>,
}

pub async fn setup_context() -> TestContext {
    // 内存sqlite的每个连接都是独立数据库，池必须收敛到单连接
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("failed to open in-memory sqlite");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");

    let db = Arc::new(db);
    TestContext {
        sites: Arc::new(SiteRepositoryImpl::new(db.clone())),
        authors: Arc::new(AuthorRepositoryImpl::new(db.clone())),
        quotes: Arc::new(QuoteRepositoryImpl::new(db.clone())),
        jobs: Arc::new(JobRepositoryImpl::new(db.clone())),
        errors: Arc::new(ScrapeErrorRepositoryImpl::new(db.clone())),
        db,
    }
}

pub fn crawl_service(
    ctx: &TestContext,
) -> CrawlService<JobRepositoryImpl, SiteRepositoryImpl, QuoteRepositoryImpl, ScrapeErrorRepositoryImpl>
{
    crawl_service_with_timeout(ctx, Duration::from_secs(5))
}

pub fn crawl_service_with_timeout(
    ctx: &TestContext,
    fetch_timeout: Duration,
) -> CrawlService<JobRepositoryImpl, SiteRepositoryImpl, QuoteRepositoryImpl, ScrapeErrorRepositoryImpl>
{
    CrawlService::new(
        ctx.jobs.clone(),
        ctx.sites.clone(),
        ctx.quotes.clone(),
        ctx.errors.clone(),
        Arc::new(ReqwestEngine::new("quotecrawl-test/0.1".to_string())),
        fetch_timeout,
    )
}

/// 指向测试服务器的标准站点配置
pub fn quotes_site(base_url: &str, max_pages: i32) -> ScrapeSite {
    ScrapeSite::new(
        format!("quotes-{}", Uuid::new_v4()),
        base_url.to_string(),
        "/".to_string(),
        "span.text".to_string(),
        "small.author".to_string(),
        "li.next > a".to_string(),
        max_pages,
        0,
    )
}

/// 渲染一个引文页面
///
/// `quotes`为（文本，作者）对，作者为None时省略作者节点；
/// `next`为下一页路径。
pub fn page_html(quotes: &[(&str, Option<&str>)], next: Option<&str>) -> String {
    let mut body = String::new();
    for (text, author) in quotes {
        body.push_str("<div class=\"quote\">");
        body.push_str(&format!("<span class=\"text\">{}</span>", text));
        if let Some(author) = author {
            body.push_str(&format!("<small class=\"author\">{}</small>", author));
        }
        body.push_str("</div>\n");
    }
    if let Some(next) = next {
        body.push_str(&format!(
            "<ul class=\"pager\"><li class=\"next\"><a href=\"{}\">Next</a></li></ul>",
            next
        ));
    }
    format!("<html><body>\n{}</body></html>", body)
}

/// 收集入队信封的队列替身
pub struct MockJobQueue {
    pub envelopes: Mutex<Vec<JobEnvelope>>,
}

impl MockJobQueue {
    pub fn new() -> Self {
        Self {
            envelopes: Mutex::new(Vec::new()),
        }
    }

    pub fn enqueued(&self) -> Vec<JobEnvelope> {
        self.envelopes.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for MockJobQueue {
    async fn enqueue(&self, envelope: JobEnvelope) -> Result<(), QueueError> {
        self.envelopes.lock().unwrap().push(envelope);
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<JobEnvelope>, QueueError> {
        let mut envelopes = self.envelopes.lock().unwrap();
        if envelopes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(envelopes.remove(0)))
        }
    }
}
