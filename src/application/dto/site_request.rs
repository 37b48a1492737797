// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 站点创建请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SiteCreateRequestDto {
    /// 站点名称（全局唯一）
    #[validate(length(min = 1, max = 150))]
    pub name: String,

    /// 站点基础URL
    #[validate(url)]
    pub base_url: String,

    /// 起始路径，缺省为 "/"
    pub start_path: Option<String>,

    /// 引文文本选择器（CSS或XPath）
    #[validate(length(min = 1, max = 500))]
    pub quote_selector: String,

    /// 作者名选择器（可选）
    pub author_selector: Option<String>,

    /// 下一页链接选择器（可选，缺省使用回退启发式）
    pub pagination_selector: Option<String>,

    /// 最大抓取页数
    #[validate(range(min = 1))]
    pub max_pages: Option<i32>,

    /// 请求间隔延迟（毫秒）
    #[validate(range(min = 0))]
    pub rate_limit_ms: Option<i32>,
}

/// 站点更新请求DTO
///
/// 所有字段可选，只更新提供的字段
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SiteUpdateRequestDto {
    /// 站点名称
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,

    /// 站点基础URL
    #[validate(url)]
    pub base_url: Option<String>,

    /// 起始路径
    pub start_path: Option<String>,

    /// 引文文本选择器
    #[validate(length(min = 1, max = 500))]
    pub quote_selector: Option<String>,

    /// 作者名选择器
    pub author_selector: Option<String>,

    /// 下一页链接选择器
    pub pagination_selector: Option<String>,

    /// 最大抓取页数
    #[validate(range(min = 1))]
    pub max_pages: Option<i32>,

    /// 请求间隔延迟（毫秒）
    #[validate(range(min = 0))]
    pub rate_limit_ms: Option<i32>,

    /// 是否允许抓取
    pub active: Option<bool>,
}
