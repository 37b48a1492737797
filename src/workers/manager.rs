// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::quote_repository::QuoteRepository;
use crate::domain::repositories::scrape_error_repository::ScrapeErrorRepository;
use crate::domain::repositories::site_repository::SiteRepository;
use crate::domain::services::crawl_service::CrawlService;
use crate::queue::job_queue::JobQueue;
use crate::utils::retry_policy::RetryPolicy;
use crate::workers::scrape_worker::ScrapeWorker;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
pub struct WorkerManager<Que, J, S, Q, E>
where
    Que: JobQueue + 'static,
    J: JobRepository + 'static,
    S: SiteRepository + 'static,
    Q: QuoteRepository + 'static,
    E: ScrapeErrorRepository + 'static,
{
    queue: Arc<Que>,
    service: Arc<CrawlService<J, S, Q, E>>,
    retry_policy: RetryPolicy,
    handles: Vec<JoinHandle<()>>,
}

impl<Que, J, S, Q, E> WorkerManager<Que, J, S, Q, E>
where
    Que: JobQueue + 'static,
    J: JobRepository + 'static,
    S: SiteRepository + 'static,
    Q: QuoteRepository + 'static,
    E: ScrapeErrorRepository + 'static,
{
    /// 创建新的工作管理器实例
    pub fn new(
        queue: Arc<Que>,
        service: Arc<CrawlService<J, S, Q, E>>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            queue,
            service,
            retry_policy,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// 创建并启动指定数量的工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub async fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = ScrapeWorker::new(self.service.clone(), self.retry_policy.clone());

            let queue = self.queue.clone();
            // We spawn the worker loop on a separate task to avoid blocking the main thread
            // or the loop that spawns workers.
            let handle = tokio::spawn(async move {
                worker.run(queue).await;
            });
            self.handles.push(handle);
        }
        info!("Started {} scrape workers", count);
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号并停止所有工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, stopping workers"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }

        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}
