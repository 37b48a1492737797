// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 队列已关闭
    #[error("Queue closed")]
    Closed,
}

/// 任务投递信封
///
/// 队列传输的最小单元：任务ID与当前尝试次数。任务本体
/// 始终以存储中的记录为准。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobEnvelope {
    /// 任务ID
    pub job_id: Uuid,
    /// 尝试次数（从1开始）
    pub attempt: u32,
}

impl JobEnvelope {
    /// 创建首次投递的信封
    pub fn new(job_id: Uuid) -> Self {
        Self { job_id, attempt: 1 }
    }

    /// 下一次尝试的信封
    pub fn next_attempt(&self) -> Self {
        Self {
            job_id: self.job_id,
            attempt: self.attempt + 1,
        }
    }
}

/// 任务队列特质
///
/// 至少一次投递：入队的信封会被某个工作器取走处理；处理
/// 失败后的重新入队由工作器按显式重试策略决定，重复投递
/// 由核心的幂等写入吸收。
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// 入队任务
    async fn enqueue(&self, envelope: JobEnvelope) -> Result<(), QueueError>;

    /// 出队任务
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(JobEnvelope))` - 成功出队的信封
    /// * `Ok(None)` - 队列已关闭且没有剩余信封
    /// * `Err(QueueError)` - 出队失败
    async fn dequeue(&self) -> Result<Option<JobEnvelope>, QueueError>;
}

/// 进程内任务队列实现
///
/// 基于无界mpsc通道，多个工作器共享接收端。
pub struct InMemoryJobQueue {
    tx: UnboundedSender<JobEnvelope>,
    rx: Mutex<UnboundedReceiver<JobEnvelope>>,
}

impl InMemoryJobQueue {
    /// 创建新的进程内任务队列实例
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, envelope: JobEnvelope) -> Result<(), QueueError> {
        self.tx.send(envelope).map_err(|_| QueueError::Closed)
    }

    async fn dequeue(&self) -> Result<Option<JobEnvelope>, QueueError> {
        let mut rx = self.rx.lock().await;
        Ok(rx.recv().await)
    }
}

#[async_trait]
impl<T: JobQueue + ?Sized> JobQueue for Arc<T> {
    async fn enqueue(&self, envelope: JobEnvelope) -> Result<(), QueueError> {
        (**self).enqueue(envelope).await
    }

    async fn dequeue(&self) -> Result<Option<JobEnvelope>, QueueError> {
        (**self).dequeue().await
    }
}
