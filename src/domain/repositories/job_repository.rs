// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{CounterDeltas, JobStatus, ScrapeJob};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// 任务查询参数
#[derive(Debug, Default, Clone)]
pub struct JobQueryParams {
    pub site_id: Option<Uuid>,
    pub statuses: Option<Vec<JobStatus>>,
    pub initiator: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// 任务仓库特质
///
/// 拥有任务生命周期转换和计数器的原子更新
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, job: &ScrapeJob) -> Result<ScrapeJob, RepositoryError>;

    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError>;

    /// 标记任务为执行中并记录开始时间
    ///
    /// 重复调用会覆盖开始时间，不做二次启动保护。
    async fn mark_running(&self, id: Uuid) -> Result<ScrapeJob, RepositoryError>;

    /// 结束任务
    ///
    /// 设置完成时间，并在同一事务内根据当前计数器推导终态：
    /// 调用方传入`success=false`时无条件为FAILED。
    async fn mark_finished(&self, id: Uuid, success: bool) -> Result<ScrapeJob, RepositoryError>;

    /// 原子增加计数器
    ///
    /// 以单条SQL读改写完成，重复投递或并发页级更新下不丢失增量。
    /// 增量必须为非负值，计数器只增不减。
    async fn increment_counters(
        &self,
        id: Uuid,
        deltas: &CounterDeltas,
    ) -> Result<(), RepositoryError>;

    /// 更新任务的元数据与触发者
    ///
    /// 状态与计数器不允许通过该接口修改，只能由工作器推进。
    async fn update_meta(
        &self,
        id: Uuid,
        initiator: Option<String>,
        meta: Option<Value>,
    ) -> Result<ScrapeJob, RepositoryError>;

    /// 任务列表查询
    async fn query(&self, params: JobQueryParams) -> Result<(Vec<ScrapeJob>, u64), RepositoryError>;
}
