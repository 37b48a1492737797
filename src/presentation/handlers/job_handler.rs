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
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::job_request::{JobCreateRequestDto, JobUpdateRequestDto};
use crate::application::dto::list_query::JobListQuery;
use crate::domain::models::job::{JobStatus, ScrapeJob};
use crate::domain::repositories::job_repository::{JobQueryParams, JobRepository};
use crate::domain::repositories::scrape_error_repository::ScrapeErrorRepository;
use crate::domain::repositories::site_repository::SiteRepository;
use crate::domain::repositories::RepositoryError;
use crate::presentation::errors::AppError;
use crate::queue::job_queue::{JobEnvelope, JobQueue};

pub async fn create_job<J, S>(
    Extension(jobs): Extension<Arc<J>>,
    Extension(sites): Extension<Arc<S>>,
    Extension(queue): Extension<Arc<dyn JobQueue>>,
    Json(payload): Json<JobCreateRequestDto>,
) -> Result<Response, AppError>
where
    J: JobRepository,
    S: SiteRepository,
{
    payload.validate()?;

    if let Some(meta) = &payload.meta {
        if !meta.is_object() {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "meta must be a JSON object" })),
            )
                .into_response());
        }
    }

    let site = sites
        .find_by_id(payload.site_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    if !site.active {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Specified site is not active for scraping" })),
        )
            .into_response());
    }

    let job = ScrapeJob::new(site.id, payload.initiator, payload.meta);
    let created = jobs.create(&job).await?;

    // 创建即入队
    if let Err(e) = queue.enqueue(JobEnvelope::new(created.id)).await {
        error!("Failed to enqueue job {}: {}", created.id, e);
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to enqueue job" })),
        )
            .into_response());
    }

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn get_job<J: JobRepository>(
    Extension(jobs): Extension<Arc<J>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let job = jobs
        .find_by_id(id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(job))
}

pub async fn list_jobs<J: JobRepository>(
    Extension(jobs): Extension<Arc<J>>,
    Query(params): Query<JobListQuery>,
) -> Result<Response, AppError> {
    let statuses = match &params.status {
        Some(raw) => match JobStatus::from_str(raw) {
            Ok(status) => Some(vec![status]),
            Err(()) => {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("invalid status filter '{}'", raw) })),
                )
                    .into_response());
            }
        },
        None => None,
    };

    let (items, total) = jobs
        .query(JobQueryParams {
            site_id: params.site_id,
            statuses,
            initiator: params.initiator.clone(),
            limit: params.limit.unwrap_or(100).min(1000),
            offset: params.offset.unwrap_or(0),
        })
        .await?;

    Ok(Json(json!({ "jobs": items, "total": total })).into_response())
}

pub async fn patch_job<J: JobRepository>(
    Extension(jobs): Extension<Arc<J>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobUpdateRequestDto>,
) -> Result<Response, AppError> {
    payload.validate()?;

    if let Some(meta) = &payload.meta {
        if !meta.is_object() {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "meta must be a JSON object" })),
            )
                .into_response());
        }
    }

    let updated = jobs.update_meta(id, payload.initiator, payload.meta).await?;
    Ok(Json(updated).into_response())
}

/// 显式启动端点：任务创建后若想稍后再启动，可从这里入队。
/// 只接受PENDING状态的任务。
pub async fn start_job<J: JobRepository>(
    Extension(jobs): Extension<Arc<J>>,
    Extension(queue): Extension<Arc<dyn JobQueue>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let job = jobs
        .find_by_id(id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    if job.status != JobStatus::Pending {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Job is not in PENDING state" })),
        )
            .into_response());
    }

    if let Err(e) = queue.enqueue(JobEnvelope::new(job.id)).await {
        error!("Failed to enqueue job {}: {}", job.id, e);
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to enqueue job" })),
        )
            .into_response());
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "detail": "Job enqueued" })),
    )
        .into_response())
}

pub async fn list_job_errors<J, E>(
    Extension(jobs): Extension<Arc<J>>,
    Extension(errors): Extension<Arc<E>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    J: JobRepository,
    E: ScrapeErrorRepository,
{
    let job = jobs
        .find_by_id(id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let items = errors.find_by_job(job.id).await?;
    Ok(Json(json!({ "errors": items })))
}
