// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Path, Query},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::list_query::AuthorListQuery;
use crate::domain::repositories::author_repository::{AuthorQueryParams, AuthorRepository};
use crate::domain::repositories::RepositoryError;
use crate::presentation::errors::AppError;

pub async fn get_author<A: AuthorRepository>(
    Extension(authors): Extension<Arc<A>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let author = authors
        .find_by_id(id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(author))
}

pub async fn list_authors<A: AuthorRepository>(
    Extension(authors): Extension<Arc<A>>,
    Query(params): Query<AuthorListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (items, total) = authors
        .query(AuthorQueryParams {
            name: params.name,
            limit: params.limit.unwrap_or(100).min(1000),
            offset: params.offset.unwrap_or(0),
        })
        .await?;

    Ok(Json(json!({ "authors": items, "total": total })))
}
