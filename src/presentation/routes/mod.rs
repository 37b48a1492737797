// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::repositories::author_repo_impl::AuthorRepositoryImpl;
use crate::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use crate::infrastructure::repositories::quote_repo_impl::QuoteRepositoryImpl;
use crate::infrastructure::repositories::scrape_error_repo_impl::ScrapeErrorRepositoryImpl;
use crate::infrastructure::repositories::site_repo_impl::SiteRepositoryImpl;
use crate::presentation::handlers::{author_handler, job_handler, quote_handler, site_handler};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// 仓库与队列实例通过Extension注入，见main.rs的装配。
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route(
            "/v1/sites",
            post(site_handler::create_site::<SiteRepositoryImpl>)
                .get(site_handler::list_sites::<SiteRepositoryImpl>),
        )
        .route(
            "/v1/sites/{id}",
            get(site_handler::get_site::<SiteRepositoryImpl>)
                .patch(site_handler::update_site::<SiteRepositoryImpl>),
        )
        .route(
            "/v1/jobs",
            post(job_handler::create_job::<JobRepositoryImpl, SiteRepositoryImpl>)
                .get(job_handler::list_jobs::<JobRepositoryImpl>),
        )
        .route(
            "/v1/jobs/{id}",
            get(job_handler::get_job::<JobRepositoryImpl>)
                .patch(job_handler::patch_job::<JobRepositoryImpl>),
        )
        .route(
            "/v1/jobs/{id}/start",
            post(job_handler::start_job::<JobRepositoryImpl>),
        )
        .route(
            "/v1/jobs/{id}/errors",
            get(job_handler::list_job_errors::<JobRepositoryImpl, ScrapeErrorRepositoryImpl>),
        )
        .route(
            "/v1/quotes",
            get(quote_handler::list_quotes::<QuoteRepositoryImpl>),
        )
        .route(
            "/v1/quotes/{id}",
            get(quote_handler::get_quote::<QuoteRepositoryImpl>),
        )
        .route(
            "/v1/authors",
            get(author_handler::list_authors::<AuthorRepositoryImpl>),
        )
        .route(
            "/v1/authors/{id}",
            get(author_handler::get_author::<AuthorRepositoryImpl>),
        );

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
