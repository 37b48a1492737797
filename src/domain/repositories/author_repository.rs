// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::author::Author;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 作者查询参数
#[derive(Debug, Default, Clone)]
pub struct AuthorQueryParams {
    pub name: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// 作者仓库特质
///
/// 作者按名称精确匹配去重，首次出现时创建
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// 根据ID查找作者
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepositoryError>;
    /// 根据名称精确查找作者
    async fn find_by_name(&self, name: &str) -> Result<Option<Author>, RepositoryError>;
    /// 按名称获取或创建作者
    async fn get_or_create(&self, name: &str) -> Result<Author, RepositoryError>;
    /// 作者列表查询
    async fn query(&self, params: AuthorQueryParams) -> Result<(Vec<Author>, u64), RepositoryError>;
}
