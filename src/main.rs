// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use migration::{Migrator, MigratorTrait};
use quotecrawl::config::settings::Settings;
use quotecrawl::domain::services::crawl_service::CrawlService;
use quotecrawl::engines::reqwest_engine::ReqwestEngine;
use quotecrawl::infrastructure::database::connection;
use quotecrawl::infrastructure::repositories::author_repo_impl::AuthorRepositoryImpl;
use quotecrawl::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use quotecrawl::infrastructure::repositories::quote_repo_impl::QuoteRepositoryImpl;
use quotecrawl::infrastructure::repositories::scrape_error_repo_impl::ScrapeErrorRepositoryImpl;
use quotecrawl::infrastructure::repositories::site_repo_impl::SiteRepositoryImpl;
use quotecrawl::presentation::routes;
use quotecrawl::queue::job_queue::{InMemoryJobQueue, JobQueue};
use quotecrawl::utils::retry_policy::RetryPolicy;
use quotecrawl::utils::telemetry;
use quotecrawl::workers::manager::WorkerManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting quotecrawl...");

    // Initialize Prometheus Metrics
    quotecrawl::infrastructure::metrics::init_metrics();

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories
    let site_repo = Arc::new(SiteRepositoryImpl::new(db.clone()));
    let author_repo = Arc::new(AuthorRepositoryImpl::new(db.clone()));
    let quote_repo = Arc::new(QuoteRepositoryImpl::new(db.clone()));
    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let error_repo = Arc::new(ScrapeErrorRepositoryImpl::new(db.clone()));

    // 5. Initialize queue and crawl service
    let queue = Arc::new(InMemoryJobQueue::new());
    let fetcher = Arc::new(ReqwestEngine::new(settings.scraper.user_agent.clone()));
    let crawl_service = Arc::new(CrawlService::new(
        job_repo.clone(),
        site_repo.clone(),
        quote_repo.clone(),
        error_repo.clone(),
        fetcher,
        Duration::from_secs(settings.scraper.fetch_timeout_secs),
    ));

    // 6. Start workers
    let retry_policy = RetryPolicy::from_settings(&settings.dispatch);
    let mut worker_manager =
        WorkerManager::new(queue.clone(), crawl_service.clone(), retry_policy);
    worker_manager.start_workers(settings.worker.count).await;

    // 7. Start HTTP server
    let app = routes::routes()
        .layer(Extension(site_repo))
        .layer(Extension(author_repo))
        .layer(Extension(quote_repo))
        .layer(Extension(job_repo))
        .layer(Extension(error_repo))
        .layer(Extension(queue.clone() as Arc<dyn JobQueue>))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
