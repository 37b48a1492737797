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

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::quote_repository::QuoteRepository;
use crate::domain::repositories::scrape_error_repository::ScrapeErrorRepository;
use crate::domain::repositories::site_repository::SiteRepository;
use crate::domain::services::crawl_service::CrawlService;
use crate::queue::job_queue::{JobEnvelope, JobQueue};
use crate::utils::retry_policy::RetryPolicy;

/// 抓取工作者
///
/// 从队列消费任务信封，驱动爬取编排服务执行；可重试的
/// 失败按重试策略退避后重新入队，实现有界的至少一次处理。
pub struct ScrapeWorker<J, S, Q, E>
where
    J: JobRepository + 'static,
    S: SiteRepository + 'static,
    Q: QuoteRepository + 'static,
    E: ScrapeErrorRepository + 'static,
{
    service: Arc<CrawlService<J, S, Q, E>>,
    retry_policy: RetryPolicy,
    worker_id: Uuid,
}

impl<J, S, Q, E> ScrapeWorker<J, S, Q, E>
where
    J: JobRepository + 'static,
    S: SiteRepository + 'static,
    Q: QuoteRepository + 'static,
    E: ScrapeErrorRepository + 'static,
{
    /// 创建新的抓取工作器实例
    pub fn new(service: Arc<CrawlService<J, S, Q, E>>, retry_policy: RetryPolicy) -> Self {
        Self {
            service,
            retry_policy,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行抓取工作器
    pub async fn run<Que>(&self, queue: Arc<Que>)
    where
        Que: JobQueue + 'static,
    {
        info!("Scrape worker {} started", self.worker_id);

        loop {
            match queue.dequeue().await {
                Ok(Some(envelope)) => {
                    self.process_envelope(&queue, envelope).await;
                }
                Ok(None) => {
                    info!("Job queue closed, scrape worker {} exiting", self.worker_id);
                    break;
                }
                Err(e) => {
                    error!("Error dequeuing job: {}", e);
                    sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    #[instrument(skip(self, queue), fields(job_id = %envelope.job_id, attempt = envelope.attempt))]
    async fn process_envelope<Que>(&self, queue: &Arc<Que>, envelope: JobEnvelope)
    where
        Que: JobQueue + 'static,
    {
        match self.service.run_job(envelope.job_id).await {
            Ok(summary) => {
                info!(
                    status = %summary.status,
                    fetched = summary.quotes_fetched,
                    saved = summary.quotes_saved,
                    errors = summary.errors_count,
                    "Job run finished"
                );
            }
            Err(e) if e.is_retryable() && self.retry_policy.should_retry(envelope.attempt) => {
                let backoff = self.retry_policy.calculate_backoff(envelope.attempt);
                warn!(
                    error = %e,
                    backoff_ms = backoff.as_millis() as u64,
                    "Job run failed, scheduling retry"
                );
                let queue = queue.clone();
                let next = envelope.next_attempt();
                tokio::spawn(async move {
                    sleep(backoff).await;
                    if let Err(send_err) = queue.enqueue(next).await {
                        error!("Failed to re-enqueue job {}: {}", next.job_id, send_err);
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "Job run failed permanently");
            }
        }
    }
}
