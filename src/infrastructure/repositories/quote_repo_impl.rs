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

use crate::domain::models::quote::{NewQuote, Quote};
use crate::domain::repositories::quote_repository::{QuoteQueryParams, QuoteRepository};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::author as author_entity;
use crate::infrastructure::database::entities::quote as quote_entity;
use crate::infrastructure::repositories::is_unique_violation;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 引文仓库实现
///
/// 单个候选的写入在一个事务内完成：按需创建作者，按哈希
/// 预检去重，插入引文。哈希唯一约束是去重边界，预检只是
/// 避免无谓插入。
#[derive(Clone)]
pub struct QuoteRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl QuoteRepositoryImpl {
    /// 创建新的引文仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<quote_entity::Model> for Quote {
    fn from(model: quote_entity::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            author_id: model.author_id,
            site_id: model.site_id,
            source_url: model.source_url,
            hash: model.hash,
            saved_by_job: model.saved_by_job,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 事务内按名称获取或创建作者
async fn get_or_create_author(
    txn: &DatabaseTransaction,
    name: &str,
) -> Result<Uuid, RepositoryError> {
    if let Some(existing) = author_entity::Entity::find()
        .filter(author_entity::Column::Name.eq(name))
        .one(txn)
        .await?
    {
        return Ok(existing.id);
    }

    let now: DateTime<FixedOffset> = Utc::now().into();
    let model = author_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        bio_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    match model.insert(txn).await {
        Ok(created) => Ok(created.id),
        Err(e) if is_unique_violation(&e) => author_entity::Entity::find()
            .filter(author_entity::Column::Name.eq(name))
            .one(txn)
            .await?
            .map(|m| m.id)
            .ok_or(RepositoryError::NotFound),
        Err(e) => Err(RepositoryError::Database(e)),
    }
}

#[async_trait]
impl QuoteRepository for QuoteRepositoryImpl {
    async fn exists_by_hash(&self, hash: &str) -> Result<bool, RepositoryError> {
        let count = quote_entity::Entity::find()
            .filter(quote_entity::Column::Hash.eq(hash))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn save_candidate(
        &self,
        candidate: &NewQuote,
    ) -> Result<Option<Quote>, RepositoryError> {
        let txn = self.db.begin().await?;

        let exists = quote_entity::Entity::find()
            .filter(quote_entity::Column::Hash.eq(&candidate.hash))
            .one(&txn)
            .await?
            .is_some();
        if exists {
            // 引文已存在，连作者都不创建
            txn.commit().await?;
            return Ok(None);
        }

        let author_id = match &candidate.author_name {
            Some(name) => Some(get_or_create_author(&txn, name).await?),
            None => None,
        };

        let now: DateTime<FixedOffset> = Utc::now().into();
        let model = quote_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            text: Set(candidate.text.clone()),
            author_id: Set(author_id),
            site_id: Set(candidate.site_id),
            source_url: Set(Some(candidate.source_url.clone())),
            hash: Set(candidate.hash.clone()),
            saved_by_job: Set(Some(candidate.job_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match model.insert(&txn).await {
            Ok(created) => {
                txn.commit().await?;
                Ok(Some(created.into()))
            }
            Err(e) if is_unique_violation(&e) => {
                // 与另一个写入者在存在性预检之后竞争，良性重复
                txn.rollback().await?;
                Ok(None)
            }
            Err(e) => {
                txn.rollback().await?;
                Err(RepositoryError::Database(e))
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, RepositoryError> {
        let model = quote_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn query(&self, params: QuoteQueryParams) -> Result<(Vec<Quote>, u64), RepositoryError> {
        let mut select = quote_entity::Entity::find();

        if let Some(site_id) = params.site_id {
            select = select.filter(quote_entity::Column::SiteId.eq(site_id));
        }
        if let Some(author_id) = params.author_id {
            select = select.filter(quote_entity::Column::AuthorId.eq(author_id));
        }

        let total = select.clone().count(self.db.as_ref()).await?;

        let limit = if params.limit == 0 { 100 } else { params.limit };
        let models = select
            .order_by_desc(quote_entity::Column::CreatedAt)
            .limit(limit)
            .offset(params.offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}
