// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 作者实体
///
/// 按名称去重的作者。匹配是对name字段的精确匹配，
/// 大小写保留。首次出现时惰性创建。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// 作者唯一标识符
    pub id: Uuid,
    /// 作者名称（全局唯一，精确匹配）
    pub name: String,
    /// 作者简介页URL（可选）
    pub bio_url: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl Author {
    /// 创建新的作者实体
    pub fn new(name: String) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            name,
            bio_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}
