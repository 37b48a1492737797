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

use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::list_query::SiteListQuery;
use crate::application::dto::site_request::{SiteCreateRequestDto, SiteUpdateRequestDto};
use crate::domain::models::site::ScrapeSite;
use crate::domain::repositories::site_repository::{SiteQueryParams, SiteRepository};
use crate::domain::repositories::RepositoryError;
use crate::domain::services::extraction_service::SiteSelectors;
use crate::presentation::errors::AppError;

pub async fn create_site<S: SiteRepository>(
    Extension(sites): Extension<Arc<S>>,
    Json(payload): Json<SiteCreateRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let site = ScrapeSite::new(
        payload.name,
        payload.base_url,
        payload.start_path.unwrap_or_else(|| "/".to_string()),
        payload.quote_selector,
        payload.author_selector.unwrap_or_default(),
        payload.pagination_selector.unwrap_or_default(),
        payload.max_pages.unwrap_or(50),
        payload.rate_limit_ms.unwrap_or(500),
    );

    // 选择器在配置入库前就要能编译通过
    SiteSelectors::compile(&site)?;

    let created = sites.create(&site).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_site<S: SiteRepository>(
    Extension(sites): Extension<Arc<S>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let site = sites
        .find_by_id(id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(site))
}

pub async fn list_sites<S: SiteRepository>(
    Extension(sites): Extension<Arc<S>>,
    Query(params): Query<SiteListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (items, total) = sites
        .query(SiteQueryParams {
            active: params.active,
            name: params.name,
            limit: params.limit.unwrap_or(100).min(1000),
            offset: params.offset.unwrap_or(0),
        })
        .await?;

    Ok(Json(json!({ "sites": items, "total": total })))
}

pub async fn update_site<S: SiteRepository>(
    Extension(sites): Extension<Arc<S>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SiteUpdateRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut site = sites
        .find_by_id(id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    if let Some(name) = payload.name {
        site.name = name;
    }
    if let Some(base_url) = payload.base_url {
        site.base_url = base_url;
    }
    if let Some(start_path) = payload.start_path {
        site.start_path = start_path;
    }
    if let Some(quote_selector) = payload.quote_selector {
        site.quote_selector = quote_selector;
    }
    if let Some(author_selector) = payload.author_selector {
        site.author_selector = author_selector;
    }
    if let Some(pagination_selector) = payload.pagination_selector {
        site.pagination_selector = pagination_selector;
    }
    if let Some(max_pages) = payload.max_pages {
        site.max_pages = max_pages;
    }
    if let Some(rate_limit_ms) = payload.rate_limit_ms {
        site.rate_limit_ms = rate_limit_ms;
    }
    if let Some(active) = payload.active {
        site.active = active;
    }

    SiteSelectors::compile(&site)?;

    let updated = sites.update(&site).await?;
    Ok(Json(updated))
}
