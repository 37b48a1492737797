// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 抓取任务实体
///
/// 表示一次抓取执行。使用UUID主键，便于跨服务引用且
/// 不可猜测。状态生命周期：
/// Pending → Running → Success / Partial / Failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 所属站点ID
    pub site_id: Uuid,
    /// 任务状态
    pub status: JobStatus,
    /// 开始执行时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间，终态只有在设置该字段后才成立
    pub finished_at: Option<DateTime<FixedOffset>>,
    /// 已抓取页面计数（只增不减）
    pub quotes_fetched: i32,
    /// 已保存引文计数（只增不减）
    pub quotes_saved: i32,
    /// 错误计数（只增不减）
    pub errors_count: i32,
    /// 触发者标识（api / scheduler / manual）
    pub initiator: String,
    /// 开放元数据：抓取页面列表、使用的请求头、耗时等
    pub meta: Option<Value>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl ScrapeJob {
    /// 创建新的抓取任务（Pending状态）
    pub fn new(site_id: Uuid, initiator: Option<String>, meta: Option<Value>) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            site_id,
            status: JobStatus::Pending,
            started_at: None,
            finished_at: None,
            quotes_fetched: 0,
            quotes_saved: 0,
            errors_count: 0,
            initiator: initiator.unwrap_or_else(|| "api".to_string()),
            meta,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 任务状态枚举
///
/// 状态转换遵循以下流程：
/// Pending → Running → Success/Partial/Failed（终态，不再转出）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// 等待执行，任务已创建但尚未开始
    #[default]
    Pending,
    /// 执行中
    Running,
    /// 成功完成，保存了引文且没有错误
    Success,
    /// 部分成功，保存了引文但出现过错误
    Partial,
    /// 失败，没有保存任何引文或发生致命错误
    Failed,
}

impl JobStatus {
    /// 推导终态
    ///
    /// 调用方显式标记失败时无条件为Failed；否则由当前计数器推导：
    /// 有错误且有保存 → Partial；有保存 → Success；没有保存 → Failed
    /// （即使没有错误，抓取了但一无所获的任务也视为失败）。
    pub fn derive_final(success: bool, saved: i32, errors: i32) -> Self {
        if !success {
            return JobStatus::Failed;
        }
        if errors > 0 && saved > 0 {
            JobStatus::Partial
        } else if saved > 0 {
            JobStatus::Success
        } else {
            JobStatus::Failed
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Success | JobStatus::Partial | JobStatus::Failed
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "PENDING"),
            JobStatus::Running => write!(f, "RUNNING"),
            JobStatus::Success => write!(f, "SUCCESS"),
            JobStatus::Partial => write!(f, "PARTIAL"),
            JobStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "RUNNING" => Ok(JobStatus::Running),
            "SUCCESS" => Ok(JobStatus::Success),
            "PARTIAL" => Ok(JobStatus::Partial),
            "FAILED" => Ok(JobStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 计数器增量
///
/// 编排器按页累积的增量，每页处理完后一次性刷入任务计数器。
/// 增量永远为非负值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDeltas {
    /// 已抓取页面增量
    pub fetched: i32,
    /// 已保存引文增量
    pub saved: i32,
    /// 错误增量
    pub errors: i32,
}

impl CounterDeltas {
    /// 是否没有任何增量
    pub fn is_empty(&self) -> bool {
        self.fetched == 0 && self.saved == 0 && self.errors == 0
    }

    /// 清零，计数器刷入后调用
    pub fn reset(&mut self) {
        *self = CounterDeltas::default();
    }
}
