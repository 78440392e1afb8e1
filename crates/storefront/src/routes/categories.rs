//! Category route handlers.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::db::CategoryRepository;
use crate::error::{ApiJson, AppError, FieldError, Result};
use crate::models::{Category, NewCategory};
use crate::state::AppState;

/// List all categories, ordered by name.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<ApiJson<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(ApiJson(categories))
}

/// Create a category.
#[instrument(skip(state, input), fields(slug = %input.slug))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCategory>,
) -> Result<(StatusCode, ApiJson<Category>)> {
    let input = validate(input)?;
    let category = CategoryRepository::new(state.pool()).create(&input).await?;
    tracing::info!(category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, ApiJson(category)))
}

fn validate(input: NewCategory) -> Result<NewCategory> {
    let name = input.name.trim().to_string();
    let slug = input.slug.trim().to_string();

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if slug.is_empty() {
        errors.push(FieldError::new("slug", "Slug is required"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(NewCategory {
        name,
        slug,
        description: input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    })
}
