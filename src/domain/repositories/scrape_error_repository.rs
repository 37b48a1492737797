// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_error::{NewScrapeError, ScrapeError};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 抓取错误仓库特质
#[async_trait]
pub trait ScrapeErrorRepository: Send + Sync {
    /// 记录一条抓取错误
    async fn record(&self, error: &NewScrapeError) -> Result<ScrapeError, RepositoryError>;
    /// 查询某个任务的全部错误
    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<ScrapeError>, RepositoryError>;
}
