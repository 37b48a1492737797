// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use uuid::Uuid;

/// 站点列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct SiteListQuery {
    /// 按激活状态过滤
    pub active: Option<bool>,
    /// 按名称模糊过滤
    pub name: Option<String>,
    /// 分页大小
    pub limit: Option<u64>,
    /// 分页偏移
    pub offset: Option<u64>,
}

/// 任务列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    /// 按站点过滤
    pub site_id: Option<Uuid>,
    /// 按状态过滤（PENDING/RUNNING/SUCCESS/PARTIAL/FAILED）
    pub status: Option<String>,
    /// 按触发者过滤
    pub initiator: Option<String>,
    /// 分页大小
    pub limit: Option<u64>,
    /// 分页偏移
    pub offset: Option<u64>,
}

/// 引文列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct QuoteListQuery {
    /// 按站点过滤
    pub site_id: Option<Uuid>,
    /// 按作者过滤
    pub author_id: Option<Uuid>,
    /// 分页大小
    pub limit: Option<u64>,
    /// 分页偏移
    pub offset: Option<u64>,
}

/// 作者列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct AuthorListQuery {
    /// 按名称模糊过滤
    pub name: Option<String>,
    /// 分页大小
    pub limit: Option<u64>,
    /// 分页偏移
    pub offset: Option<u64>,
}
