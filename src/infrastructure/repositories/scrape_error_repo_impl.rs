// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_error::{NewScrapeError, ScrapeError};
use crate::domain::repositories::scrape_error_repository::ScrapeErrorRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::scrape_error as error_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取错误仓库实现
#[derive(Clone)]
pub struct ScrapeErrorRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScrapeErrorRepositoryImpl {
    /// 创建新的抓取错误仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<error_entity::Model> for ScrapeError {
    fn from(model: error_entity::Model) -> Self {
        Self {
            id: model.id,
            job_id: model.job_id,
            url: model.url,
            error_type: model.error_type,
            message: model.message,
            traceback: model.traceback,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl ScrapeErrorRepository for ScrapeErrorRepositoryImpl {
    async fn record(&self, error: &NewScrapeError) -> Result<ScrapeError, RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let model = error_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(error.job_id),
            url: Set(error.url.clone()),
            error_type: Set(error.kind.to_string()),
            message: Set(error.message.clone()),
            traceback: Set(error.traceback.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(self.db.as_ref()).await?;
        Ok(created.into())
    }

    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<ScrapeError>, RepositoryError> {
        let models = error_entity::Entity::find()
            .filter(error_entity::Column::JobId.eq(job_id))
            .order_by_asc(error_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
