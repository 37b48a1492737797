// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::quote::{NewQuote, Quote};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 引文查询参数
#[derive(Debug, Default, Clone)]
pub struct QuoteQueryParams {
    pub site_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub limit: u64,
    pub offset: u64,
}

/// 引文仓库特质
///
/// 单个候选的作者创建与引文写入在一个事务内完成，
/// 避免半写状态对其他读取者可见。
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// 检查指定哈希的引文是否已存在
    async fn exists_by_hash(&self, hash: &str) -> Result<bool, RepositoryError>;

    /// 幂等保存一个引文候选
    ///
    /// 按需创建作者，按哈希去重。哈希唯一约束冲突
    /// （与并发写入者竞争越过存在性预检）视为良性重复。
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Quote))` - 新插入的引文
    /// * `Ok(None)` - 相同哈希的引文已存在，未插入
    /// * `Err(RepositoryError)` - 写入失败
    async fn save_candidate(&self, candidate: &NewQuote)
        -> Result<Option<Quote>, RepositoryError>;

    /// 根据ID查找引文
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, RepositoryError>;

    /// 引文列表查询
    async fn query(&self, params: QuoteQueryParams) -> Result<(Vec<Quote>, u64), RepositoryError>;
}
