//! CRUD handlers shared by every resource family.
//!
//! Each handler is generic over the entity and reads its `ResourceService`
//! from router state, so `/students`, `/courses`, ... differ only in the state
//! they are mounted with.

use axum::extract::State;

use crate::database::models::Entity;
use crate::database::store::Relation;
use crate::extractors::{ApiJson, ApiPath};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ResourceService;

/// GET /{resource}
pub async fn list<T: Entity>(State(service): State<ResourceService<T>>) -> ApiResult<Vec<T>> {
    Ok(ApiResponse::success(service.list().await?))
}

/// GET /{resource}/:id
pub async fn show<T: Entity>(
    State(service): State<ResourceService<T>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<T> {
    Ok(ApiResponse::success(service.get(&id).await?))
}

/// POST /{resource}
pub async fn create<T: Entity>(
    State(service): State<ResourceService<T>>,
    ApiJson(input): ApiJson<T::Input>,
) -> ApiResult<T> {
    let record = service.create(input).await?;
    tracing::info!(resource = T::NAME, id = record.id(), "Created record");
    Ok(ApiResponse::created(record))
}

/// PUT /{resource}/:id
pub async fn update<T: Entity>(
    State(service): State<ResourceService<T>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<T::Input>,
) -> ApiResult<T> {
    Ok(ApiResponse::success(service.update(&id, input).await?))
}

/// DELETE /{resource}/:id
pub async fn delete<T: Entity>(
    State(service): State<ResourceService<T>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<()> {
    service.delete(&id).await?;
    tracing::info!(resource = T::NAME, %id, "Deleted record");
    Ok(ApiResponse::no_content())
}

/// GET /{resource}/student/:id
pub async fn by_student<T: Entity>(
    State(service): State<ResourceService<T>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Vec<T>> {
    Ok(ApiResponse::success(service.list_by(Relation::Student, &id).await?))
}

/// GET /{resource}/course/:id
pub async fn by_course<T: Entity>(
    State(service): State<ResourceService<T>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Vec<T>> {
    Ok(ApiResponse::success(service.list_by(Relation::Course, &id).await?))
}

/// GET /{resource}/professor/:id
pub async fn by_professor<T: Entity>(
    State(service): State<ResourceService<T>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Vec<T>> {
    Ok(ApiResponse::success(service.list_by(Relation::Professor, &id).await?))
}
