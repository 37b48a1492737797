// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 作者仓库模块
pub mod author_repository;

/// 任务仓库模块
pub mod job_repository;

/// 引文仓库模块
pub mod quote_repository;

/// 抓取错误仓库模块
pub mod scrape_error_repository;

/// 站点仓库模块
pub mod site_repository;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 记录已存在（唯一约束冲突）
    #[error("Record already exists")]
    AlreadyExists,
}
