// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// 任务创建请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct JobCreateRequestDto {
    /// 目标站点ID，站点必须处于激活状态
    pub site_id: Uuid,

    /// 触发者标识，缺省为 "api"
    #[validate(length(min = 1, max = 40))]
    pub initiator: Option<String>,

    /// 开放元数据，必须为JSON对象
    pub meta: Option<Value>,
}

/// 任务更新请求DTO
///
/// 只允许更新元数据与触发者；状态和计数器由工作器推进，
/// 不接受外部修改。
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct JobUpdateRequestDto {
    /// 触发者标识
    #[validate(length(min = 1, max = 40))]
    pub initiator: Option<String>,

    /// 开放元数据，必须为JSON对象
    pub meta: Option<Value>,
}
