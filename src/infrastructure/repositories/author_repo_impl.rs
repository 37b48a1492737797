// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::author::Author;
use crate::domain::repositories::author_repository::{AuthorQueryParams, AuthorRepository};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::author as author_entity;
use crate::infrastructure::repositories::is_unique_violation;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 作者仓库实现
///
/// 作者按名称精确匹配去重。名称匹配是大小写敏感的，
/// 与引文哈希的小写规范化有意保持不一致（历史行为）。
#[derive(Clone)]
pub struct AuthorRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl AuthorRepositoryImpl {
    /// 创建新的作者仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<author_entity::Model> for Author {
    fn from(model: author_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            bio_url: model.bio_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Author> for author_entity::ActiveModel {
    fn from(author: Author) -> Self {
        Self {
            id: Set(author.id),
            name: Set(author.name),
            bio_url: Set(author.bio_url),
            created_at: Set(author.created_at),
            updated_at: Set(author.updated_at),
        }
    }
}

#[async_trait]
impl AuthorRepository for AuthorRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepositoryError> {
        let model = author_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Author>, RepositoryError> {
        let model = author_entity::Entity::find()
            .filter(author_entity::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn get_or_create(&self, name: &str) -> Result<Author, RepositoryError> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let author = Author::new(name.to_string());
        let model: author_entity::ActiveModel = author.into();
        match model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(created.into()),
            Err(e) if is_unique_violation(&e) => {
                // 与并发写入者竞争创建，重新读取
                self.find_by_name(name)
                    .await?
                    .ok_or(RepositoryError::NotFound)
            }
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    async fn query(
        &self,
        params: AuthorQueryParams,
    ) -> Result<(Vec<Author>, u64), RepositoryError> {
        let mut select = author_entity::Entity::find();

        if let Some(name) = &params.name {
            select = select.filter(author_entity::Column::Name.contains(name));
        }

        let total = select.clone().count(self.db.as_ref()).await?;

        let limit = if params.limit == 0 { 100 } else { params.limit };
        let models = select
            .order_by_asc(author_entity::Column::Name)
            .limit(limit)
            .offset(params.offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}
