// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::site::ScrapeSite;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 站点查询参数
#[derive(Debug, Default, Clone)]
pub struct SiteQueryParams {
    pub active: Option<bool>,
    pub name: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// 站点仓库特质
///
/// 定义站点配置数据访问接口
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// 创建新站点
    async fn create(&self, site: &ScrapeSite) -> Result<ScrapeSite, RepositoryError>;
    /// 根据ID查找站点
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeSite>, RepositoryError>;
    /// 更新站点
    async fn update(&self, site: &ScrapeSite) -> Result<ScrapeSite, RepositoryError>;
    /// 站点列表查询
    async fn query(&self, params: SiteQueryParams)
        -> Result<(Vec<ScrapeSite>, u64), RepositoryError>;
}
