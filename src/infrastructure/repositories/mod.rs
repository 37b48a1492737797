// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::{DbErr, SqlErr};

/// 作者仓库实现模块
pub mod author_repo_impl;

/// 任务仓库实现模块
pub mod job_repo_impl;

/// 引文仓库实现模块
pub mod quote_repo_impl;

/// 抓取错误仓库实现模块
pub mod scrape_error_repo_impl;

/// 站点仓库实现模块
pub mod site_repo_impl;

/// 判断数据库错误是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
