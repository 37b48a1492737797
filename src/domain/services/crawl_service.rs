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

use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::domain::models::job::{CounterDeltas, JobStatus, ScrapeJob};
use crate::domain::models::quote::NewQuote;
use crate::domain::models::scrape_error::{ErrorKind, NewScrapeError};
use crate::domain::models::site::ScrapeSite;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::quote_repository::QuoteRepository;
use crate::domain::repositories::scrape_error_repository::ScrapeErrorRepository;
use crate::domain::repositories::site_repository::SiteRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::extraction_service::{ExtractionService, SiteSelectors};
use crate::domain::services::quote_hash::compute_quote_hash;
use crate::domain::services::selectors::SelectorError;
use crate::engines::traits::{FetchEngine, PageRequest};
use crate::utils::url_utils;

/// 爬取错误类型
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 任务未找到
    #[error("Job {0} not found")]
    JobNotFound(Uuid),
    /// 站点未找到
    #[error("Site {0} not found")]
    SiteNotFound(Uuid),
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// 站点选择器无效
    #[error("Invalid site selector: {0}")]
    Selector(#[from] SelectorError),
    /// 站点URL无效
    #[error("Invalid site URL: {0}")]
    InvalidUrl(String),
}

impl CrawlError {
    /// 判断错误是否值得在分发层重试
    ///
    /// 配置类错误重跑也不会变好，只有仓库错误视为瞬态。
    pub fn is_retryable(&self) -> bool {
        matches!(self, CrawlError::Repository(_))
    }
}

/// 单次任务执行摘要
#[derive(Debug, Clone)]
pub struct JobRunSummary {
    /// 任务ID
    pub job_id: Uuid,
    /// 终态
    pub status: JobStatus,
    /// 已抓取页面总数
    pub quotes_fetched: i32,
    /// 已保存引文总数
    pub quotes_saved: i32,
    /// 错误总数
    pub errors_count: i32,
}

impl From<&ScrapeJob> for JobRunSummary {
    fn from(job: &ScrapeJob) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            quotes_fetched: job.quotes_fetched,
            quotes_saved: job.quotes_saved,
            errors_count: job.errors_count,
        }
    }
}

/// 爬取编排服务
///
/// 驱动单个任务的页面循环：抓取 → 提取 → 持久化，按页刷入
/// 计数器，决定终止条件；致命失败时记录错误并结束任务。
/// 所有依赖在构造时显式注入，不依赖任何全局状态。
pub struct CrawlService<J, S, Q, E>
where
    J: JobRepository,
    S: SiteRepository,
    Q: QuoteRepository,
    E: ScrapeErrorRepository,
{
    jobs: Arc<J>,
    sites: Arc<S>,
    quotes: Arc<Q>,
    errors: Arc<E>,
    fetcher: Arc<dyn FetchEngine>,
    fetch_timeout: Duration,
}

impl<J, S, Q, E> CrawlService<J, S, Q, E>
where
    J: JobRepository,
    S: SiteRepository,
    Q: QuoteRepository,
    E: ScrapeErrorRepository,
{
    /// 创建新的爬取编排服务实例
    pub fn new(
        jobs: Arc<J>,
        sites: Arc<S>,
        quotes: Arc<Q>,
        errors: Arc<E>,
        fetcher: Arc<dyn FetchEngine>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            jobs,
            sites,
            quotes,
            errors,
            fetcher,
            fetch_timeout,
        }
    }

    /// 执行一个抓取任务
    ///
    /// 任务通过内容哈希幂等写入：同一任务（或重复投递）在部分
    /// 完成后重跑会跳过已保存的引文，只补充真正新增的内容。
    /// quotes_fetched/errors_count会相对唯一内容重复计数，
    /// quotes_saved始终与唯一行数一致。
    ///
    /// # 返回值
    ///
    /// * `Ok(JobRunSummary)` - 任务终态与计数器总值
    /// * `Err(CrawlError)` - 致命错误，已完成错误记录与任务终结，
    ///   重新抛出供分发层决定是否重试
    #[instrument(skip(self), fields(job_id = %job_id))]
    pub async fn run_job(&self, job_id: Uuid) -> Result<JobRunSummary, CrawlError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or(CrawlError::JobNotFound(job_id))?;
        let site = self
            .sites
            .find_by_id(job.site_id)
            .await?
            .ok_or(CrawlError::SiteNotFound(job.site_id))?;

        let job = self.jobs.mark_running(job.id).await?;
        counter!("scrape_jobs_started_total").increment(1);
        info!(site = %site.name, "Scrape job started");

        let mut deltas = CounterDeltas::default();
        match self.crawl_pages(&job, &site, &mut deltas).await {
            Ok(()) => {
                // 刷入循环结束后的残余增量
                if !deltas.is_empty() {
                    self.jobs.increment_counters(job.id, &deltas).await?;
                }
                let finished = self.jobs.mark_finished(job.id, true).await?;
                counter!("scrape_jobs_finished_total", "status" => finished.status.to_string())
                    .increment(1);
                info!(
                    status = %finished.status,
                    fetched = finished.quotes_fetched,
                    saved = finished.quotes_saved,
                    errors = finished.errors_count,
                    "Scrape job finished"
                );
                Ok(JobRunSummary::from(&finished))
            }
            Err(fatal) => {
                error!(error = %fatal, "Fatal error in scrape job");
                deltas.errors += 1;
                self.finalize_failed(&job, &fatal, &deltas).await;
                counter!("scrape_jobs_finished_total", "status" => JobStatus::Failed.to_string())
                    .increment(1);
                Err(fatal)
            }
        }
    }

    /// 顺序抓取页面直到页数上限、没有下一页或抓取失败
    async fn crawl_pages(
        &self,
        job: &ScrapeJob,
        site: &ScrapeSite,
        deltas: &mut CounterDeltas,
    ) -> Result<(), CrawlError> {
        let selectors = SiteSelectors::compile(site)?;
        let base_url = Url::parse(&site.base_url)
            .map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", site.base_url, e)))?;
        let start_path = if site.start_path.is_empty() {
            "/"
        } else {
            site.start_path.as_str()
        };
        let start_url = url_utils::resolve_url(&base_url, start_path)
            .map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", start_path, e)))?;

        let mut next_url = Some(start_url);

        for page_index in 0..site.max_pages {
            let Some(url) = next_url.take() else {
                break;
            };

            // polite delay between page fetches
            sleep(Duration::from_millis(site.rate_limit_ms.max(0) as u64)).await;

            info!(page = page_index, url = %url, "Fetching page");
            let request = PageRequest {
                url: url.clone(),
                timeout: self.fetch_timeout,
            };
            let page = match self.fetcher.fetch(&request).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %url, error = %e, "Page fetch failed, stopping page loop");
                    deltas.errors += 1;
                    counter!("scrape_errors_total", "kind" => ErrorKind::Network.to_string())
                        .increment(1);
                    self.errors
                        .record(&NewScrapeError {
                            job_id: job.id,
                            url: Some(url.to_string()),
                            kind: ErrorKind::Network,
                            message: e.to_string(),
                            traceback: None,
                        })
                        .await?;
                    // 首次抓取失败即结束本次执行的页面循环
                    break;
                }
            };

            deltas.fetched += 1;
            counter!("scrape_pages_fetched_total").increment(1);

            let extraction = ExtractionService::extract(&page.content, &selectors, &base_url);

            for candidate in &extraction.candidates {
                let hash = compute_quote_hash(&candidate.text, candidate.author.as_deref());
                let new_quote = NewQuote {
                    text: candidate.text.clone(),
                    author_name: candidate.author.clone(),
                    site_id: site.id,
                    source_url: url.to_string(),
                    hash,
                    job_id: job.id,
                };
                match self.quotes.save_candidate(&new_quote).await {
                    Ok(Some(_)) => {
                        deltas.saved += 1;
                        counter!("quotes_saved_total").increment(1);
                    }
                    Ok(None) => {
                        // 相同哈希已存在，幂等跳过
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "Failed to persist quote candidate");
                        deltas.errors += 1;
                        counter!("scrape_errors_total", "kind" => ErrorKind::Parse.to_string())
                            .increment(1);
                        self.errors
                            .record(&NewScrapeError {
                                job_id: job.id,
                                url: Some(url.to_string()),
                                kind: ErrorKind::Parse,
                                message: e.to_string(),
                                traceback: None,
                            })
                            .await?;
                    }
                }
            }

            // 本页所有候选处理完后统一刷入计数器增量
            self.jobs.increment_counters(job.id, deltas).await?;
            deltas.reset();

            next_url = extraction.next_url;
        }

        Ok(())
    }

    /// 致命错误后的收尾：记录错误、刷入残余计数、终结任务
    ///
    /// 收尾本身的失败只记录日志，原始错误优先向上传播。
    async fn finalize_failed(&self, job: &ScrapeJob, fatal: &CrawlError, deltas: &CounterDeltas) {
        counter!("scrape_errors_total", "kind" => ErrorKind::Fatal.to_string()).increment(1);
        let record = NewScrapeError {
            job_id: job.id,
            url: None,
            kind: ErrorKind::Fatal,
            message: fatal.to_string(),
            traceback: Some(format!("{:?}", fatal)),
        };
        if let Err(e) = self.errors.record(&record).await {
            warn!(error = %e, "Failed to record fatal scrape error");
        }
        if let Err(e) = self.jobs.increment_counters(job.id, deltas).await {
            warn!(error = %e, "Failed to flush counters after fatal error");
        }
        if let Err(e) = self.jobs.mark_finished(job.id, false).await {
            warn!(error = %e, "Failed to finalize job after fatal error");
        }
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
