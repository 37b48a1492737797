// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 引文实体
///
/// 规范化后的引文。hash是内容的SHA-256摘要，保证重试和
/// 并行工作器下的幂等写入；站点外键保留来源信息。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// 引文唯一标识符
    pub id: Uuid,
    /// 引文文本（空白已折叠，大小写保留）
    pub text: String,
    /// 作者ID，作者未知或已删除时为空
    pub author_id: Option<Uuid>,
    /// 来源站点ID
    pub site_id: Uuid,
    /// 来源页面URL
    pub source_url: Option<String>,
    /// 内容哈希，64位十六进制小写，全局唯一
    pub hash: String,
    /// 保存该引文的任务ID，任务删除后为空
    pub saved_by_job: Option<Uuid>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 待保存的引文候选
///
/// 哈希在构造前显式计算完成，实体构造后不再隐式修改。
#[derive(Debug, Clone)]
pub struct NewQuote {
    /// 引文文本
    pub text: String,
    /// 作者名（为空表示作者未知）
    pub author_name: Option<String>,
    /// 来源站点ID
    pub site_id: Uuid,
    /// 来源页面URL
    pub source_url: String,
    /// 内容哈希
    pub hash: String,
    /// 保存任务ID
    pub job_id: Uuid,
}
