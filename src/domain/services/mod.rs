// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬取编排服务模块
pub mod crawl_service;

/// 内容提取服务模块
pub mod extraction_service;

/// 引文哈希模块
pub mod quote_hash;

/// 选择器编译模块
pub mod selectors;
