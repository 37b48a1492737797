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

use crate::domain::models::site::ScrapeSite;
use crate::domain::repositories::site_repository::{SiteQueryParams, SiteRepository};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::scrape_site as site_entity;
use crate::infrastructure::repositories::is_unique_violation;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 站点仓库实现
///
/// 基于SeaORM实现的站点配置数据访问层
#[derive(Clone)]
pub struct SiteRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SiteRepositoryImpl {
    /// 创建新的站点仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<site_entity::Model> for ScrapeSite {
    fn from(model: site_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            base_url: model.base_url,
            start_path: model.start_path,
            quote_selector: model.quote_selector,
            author_selector: model.author_selector,
            pagination_selector: model.pagination_selector,
            max_pages: model.max_pages,
            rate_limit_ms: model.rate_limit_ms,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ScrapeSite> for site_entity::ActiveModel {
    fn from(site: ScrapeSite) -> Self {
        Self {
            id: Set(site.id),
            name: Set(site.name),
            base_url: Set(site.base_url),
            start_path: Set(site.start_path),
            quote_selector: Set(site.quote_selector),
            author_selector: Set(site.author_selector),
            pagination_selector: Set(site.pagination_selector),
            max_pages: Set(site.max_pages),
            rate_limit_ms: Set(site.rate_limit_ms),
            active: Set(site.active),
            created_at: Set(site.created_at),
            updated_at: Set(site.updated_at),
        }
    }
}

#[async_trait]
impl SiteRepository for SiteRepositoryImpl {
    async fn create(&self, site: &ScrapeSite) -> Result<ScrapeSite, RepositoryError> {
        let model: site_entity::ActiveModel = site.clone().into();

        match model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(created.into()),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::AlreadyExists),
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeSite>, RepositoryError> {
        let model = site_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, site: &ScrapeSite) -> Result<ScrapeSite, RepositoryError> {
        let mut model: site_entity::ActiveModel = site.clone().into();
        model.updated_at = Set(Utc::now().into());

        match model.update(self.db.as_ref()).await {
            Ok(updated) => Ok(updated.into()),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::AlreadyExists),
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    async fn query(
        &self,
        params: SiteQueryParams,
    ) -> Result<(Vec<ScrapeSite>, u64), RepositoryError> {
        let mut select = site_entity::Entity::find();

        if let Some(active) = params.active {
            select = select.filter(site_entity::Column::Active.eq(active));
        }
        if let Some(name) = &params.name {
            select = select.filter(site_entity::Column::Name.contains(name));
        }

        let total = select.clone().count(self.db.as_ref()).await?;

        let limit = if params.limit == 0 { 100 } else { params.limit };
        let models = select
            .order_by_asc(site_entity::Column::Name)
            .limit(limit)
            .offset(params.offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}
