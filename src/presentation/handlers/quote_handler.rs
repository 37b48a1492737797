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

use crate::application::dto::list_query::QuoteListQuery;
use crate::domain::repositories::quote_repository::{QuoteQueryParams, QuoteRepository};
use crate::domain::repositories::RepositoryError;
use crate::presentation::errors::AppError;

pub async fn get_quote<Q: QuoteRepository>(
    Extension(quotes): Extension<Arc<Q>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quote = quotes
        .find_by_id(id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(quote))
}

pub async fn list_quotes<Q: QuoteRepository>(
    Extension(quotes): Extension<Arc<Q>>,
    Query(params): Query<QuoteListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (items, total) = quotes
        .query(QuoteQueryParams {
            site_id: params.site_id,
            author_id: params.author_id,
            limit: params.limit.unwrap_or(100).min(1000),
            offset: params.offset.unwrap_or(0),
        })
        .await?;

    Ok(Json(json!({ "quotes": items, "total": total })))
}
