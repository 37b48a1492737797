// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 站点配置实体
///
/// 描述一个允许抓取的目标站点：解析器与工作器从这里读取
/// 选择器和抓取限制。任务执行期间配置视为只读，任务启动时
/// 读取一次。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSite {
    /// 站点唯一标识符
    pub id: Uuid,
    /// 站点名称（全局唯一）
    pub name: String,
    /// 站点基础URL，例如 https://quotes.toscrape.com
    pub base_url: String,
    /// 起始路径，相对于基础URL
    pub start_path: String,
    /// 引文文本选择器（CSS或XPath）
    pub quote_selector: String,
    /// 作者名选择器（CSS或XPath，可为空）
    pub author_selector: String,
    /// 下一页链接选择器（可为空，空表示使用回退启发式）
    pub pagination_selector: String,
    /// 最大抓取页数（≥1）
    pub max_pages: i32,
    /// 请求间隔延迟（毫秒）
    pub rate_limit_ms: i32,
    /// 是否允许对该站点发起抓取
    pub active: bool,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl ScrapeSite {
    /// 创建新的站点配置
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        base_url: String,
        start_path: String,
        quote_selector: String,
        author_selector: String,
        pagination_selector: String,
        max_pages: i32,
        rate_limit_ms: i32,
    ) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            name,
            base_url,
            start_path,
            quote_selector,
            author_selector,
            pagination_selector,
            max_pages,
            rate_limit_ms,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
