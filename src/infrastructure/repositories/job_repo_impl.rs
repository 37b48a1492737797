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

use crate::domain::models::job::{CounterDeltas, JobStatus, ScrapeJob};
use crate::domain::repositories::job_repository::{JobQueryParams, JobRepository};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::scrape_job as job_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层，拥有生命周期转换和
/// 计数器的原子更新
#[derive(Clone)]
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<job_entity::Model> for ScrapeJob {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            site_id: model.site_id,
            status: model.status.parse().unwrap_or_default(),
            started_at: model.started_at,
            finished_at: model.finished_at,
            quotes_fetched: model.quotes_fetched,
            quotes_saved: model.quotes_saved,
            errors_count: model.errors_count,
            initiator: model.initiator,
            meta: model.meta,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ScrapeJob> for job_entity::ActiveModel {
    fn from(job: ScrapeJob) -> Self {
        Self {
            id: Set(job.id),
            site_id: Set(job.site_id),
            status: Set(job.status.to_string()),
            started_at: Set(job.started_at),
            finished_at: Set(job.finished_at),
            quotes_fetched: Set(job.quotes_fetched),
            quotes_saved: Set(job.quotes_saved),
            errors_count: Set(job.errors_count),
            initiator: Set(job.initiator),
            meta: Set(job.meta),
            created_at: Set(job.created_at),
            updated_at: Set(job.updated_at),
        }
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create(&self, job: &ScrapeJob) -> Result<ScrapeJob, RepositoryError> {
        let model: job_entity::ActiveModel = job.clone().into();

        let created = model.insert(self.db.as_ref()).await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn mark_running(&self, id: Uuid) -> Result<ScrapeJob, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let now: DateTime<FixedOffset> = Utc::now().into();
        let mut active: job_entity::ActiveModel = model.into();
        active.status = Set(JobStatus::Running.to_string());
        active.started_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn mark_finished(&self, id: Uuid, success: bool) -> Result<ScrapeJob, RepositoryError> {
        // 在同一事务内读取当前计数器并推导终态
        let txn = self.db.begin().await?;

        let model = job_entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let status = JobStatus::derive_final(success, model.quotes_saved, model.errors_count);

        let now: DateTime<FixedOffset> = Utc::now().into();
        let mut active: job_entity::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.finished_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated.into())
    }

    async fn increment_counters(
        &self,
        id: Uuid,
        deltas: &CounterDeltas,
    ) -> Result<(), RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();

        // 单条SQL读改写，重复投递或并发更新下不丢失增量
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::QuotesFetched,
                Expr::col(job_entity::Column::QuotesFetched).add(deltas.fetched),
            )
            .col_expr(
                job_entity::Column::QuotesSaved,
                Expr::col(job_entity::Column::QuotesSaved).add(deltas.saved),
            )
            .col_expr(
                job_entity::Column::ErrorsCount,
                Expr::col(job_entity::Column::ErrorsCount).add(deltas.errors),
            )
            .col_expr(job_entity::Column::UpdatedAt, Expr::value(now))
            .filter(job_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn update_meta(
        &self,
        id: Uuid,
        initiator: Option<String>,
        meta: Option<Value>,
    ) -> Result<ScrapeJob, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: job_entity::ActiveModel = model.into();
        if let Some(initiator) = initiator {
            active.initiator = Set(initiator);
        }
        if let Some(meta) = meta {
            active.meta = Set(Some(meta));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn query(
        &self,
        params: JobQueryParams,
    ) -> Result<(Vec<ScrapeJob>, u64), RepositoryError> {
        let mut select = job_entity::Entity::find();

        if let Some(site_id) = params.site_id {
            select = select.filter(job_entity::Column::SiteId.eq(site_id));
        }
        if let Some(statuses) = &params.statuses {
            let values: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
            select = select.filter(job_entity::Column::Status.is_in(values));
        }
        if let Some(initiator) = &params.initiator {
            select = select.filter(job_entity::Column::Initiator.eq(initiator));
        }

        let total = select.clone().count(self.db.as_ref()).await?;

        let limit = if params.limit == 0 { 100 } else { params.limit };
        let models = select
            .order_by_desc(job_entity::Column::CreatedAt)
            .limit(limit)
            .offset(params.offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}
