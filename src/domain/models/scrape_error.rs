// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 抓取错误实体
///
/// 按URL/解析粒度记录的详细错误，保持ScrapeJob精简。
/// 错误随任务删除级联删除，没有独立生命周期。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeError {
    /// 错误唯一标识符
    pub id: Uuid,
    /// 所属任务ID
    pub job_id: Uuid,
    /// 出错的URL（可选）
    pub url: Option<String>,
    /// 错误类别标签（network / parse / fatal 等自由文本）
    pub error_type: String,
    /// 错误消息
    pub message: String,
    /// 详细堆栈或错误链文本（可选）
    pub traceback: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 待记录的抓取错误
#[derive(Debug, Clone)]
pub struct NewScrapeError {
    /// 所属任务ID
    pub job_id: Uuid,
    /// 出错的URL
    pub url: Option<String>,
    /// 错误类别
    pub kind: ErrorKind,
    /// 错误消息
    pub message: String,
    /// 详细堆栈或错误链文本
    pub traceback: Option<String>,
}

/// 核心错误类别
///
/// 存储层保留自由文本标签，核心只写这三类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 网络错误：连接失败、HTTP错误状态、超时
    Network,
    /// 解析错误：单个候选处理失败
    Parse,
    /// 致命错误：其他未处理的失败
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Fatal => write!(f, "fatal"),
        }
    }
}
