// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、抓取和任务分发等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取配置
    pub scraper: ScraperSettings,
    /// 任务分发配置
    pub dispatch: DispatchSettings,
    /// 工作器配置
    pub worker: WorkerSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取配置设置
#[derive(Debug, Deserialize)]
pub struct ScraperSettings {
    /// 页面请求超时时间（秒）
    pub fetch_timeout_secs: u64,
    /// 请求使用的User-Agent
    pub user_agent: String,
}

/// 任务分发配置设置
///
/// 失败任务重新入队的显式退避参数
#[derive(Debug, Deserialize)]
pub struct DispatchSettings {
    /// 单个任务的最大尝试次数
    pub max_attempts: u32,
    /// 初始退避时间（毫秒）
    pub base_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
}

/// 工作器配置设置
#[derive(Debug, Deserialize)]
pub struct WorkerSettings {
    /// 抓取工作器数量
    pub count: usize,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default scraper settings
            .set_default("scraper.fetch_timeout_secs", 10)?
            .set_default(
                "scraper.user_agent",
                "quotecrawl/0.1 (+https://github.com/Kirky-X/quotecrawl)",
            )?
            // Default dispatch retry settings
            .set_default("dispatch.max_attempts", 3)?
            .set_default("dispatch.base_backoff_ms", 1000)?
            .set_default("dispatch.max_backoff_ms", 60000)?
            .set_default("dispatch.backoff_multiplier", 2.0)?
            .set_default("dispatch.jitter_factor", 0.1)?
            // Default worker settings
            .set_default("worker.count", 5)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("QUOTECRAWL").separator("__"));

        builder.build()?.try_deserialize()
    }
}
