// src/api/handlers/organization_handler.rs
use crate::api::dto::organization_dto::{
    CreateOrganizationDto, OrganizationResponse, UpdateOrganizationDto,
};
use crate::api::dto::organization_query_dto::{
    OrganizationListQuery, RadiusSearchQuery, RectangleSearchQuery,
};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::IdPath;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::info;
use validator::Validate;

// Query / Json の失敗も統一エラー形式で返す
fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::ValidationErrors(vec![format!("query: {}", rejection.body_text())])
}

fn body_rejection(rejection: JsonRejection) -> AppError {
    AppError::ValidationErrors(vec![format!("body: {}", rejection.body_text())])
}

pub async fn list_organizations_handler(
    State(app_state): State<AppState>,
    query: Result<Query<OrganizationListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<OrganizationResponse>>> {
    let Query(query) = query.map_err(query_rejection)?;
    let organizations = app_state.organization_service.list(query).await?;
    Ok(Json(organizations))
}

pub async fn get_organization_handler(
    State(app_state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<OrganizationResponse>> {
    let organization = app_state.organization_service.get(id).await?;
    Ok(Json(organization))
}

pub async fn create_organization_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateOrganizationDto>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(body_rejection)?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "create_organization"))?;

    let organization = app_state.organization_service.create(payload).await?;
    info!(organization_id = organization.id, "Organization created via API");
    Ok((StatusCode::CREATED, Json(organization)))
}

pub async fn update_organization_handler(
    State(app_state): State<AppState>,
    IdPath(id): IdPath,
    payload: Result<Json<UpdateOrganizationDto>, JsonRejection>,
) -> AppResult<Json<OrganizationResponse>> {
    let Json(payload) = payload.map_err(body_rejection)?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "update_organization"))?;

    let organization = app_state.organization_service.update(id, payload).await?;
    Ok(Json(organization))
}

pub async fn within_radius_handler(
    State(app_state): State<AppState>,
    query: Result<Query<RadiusSearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<OrganizationResponse>>> {
    let Query(query) = query.map_err(query_rejection)?;
    query
        .validate()
        .map_err(|e| convert_validation_errors(e, "within_radius"))?;

    let organizations = app_state.organization_service.radius_search(&query).await?;
    Ok(Json(organizations))
}

pub async fn within_rectangle_handler(
    State(app_state): State<AppState>,
    query: Result<Query<RectangleSearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<OrganizationResponse>>> {
    let Query(bounds) = query.map_err(query_rejection)?;
    bounds
        .validate()
        .map_err(|e| convert_validation_errors(e, "within_rectangle"))?;

    let organizations = app_state
        .organization_service
        .rectangle_search(&bounds)
        .await?;
    Ok(Json(organizations))
}

pub fn organization_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/organizations",
            get(list_organizations_handler).post(create_organization_handler),
        )
        .route("/organizations/within_radius", get(within_radius_handler))
        .route(
            "/organizations/within_rectangle",
            get(within_rectangle_handler),
        )
        .route(
            "/organizations/{id}",
            get(get_organization_handler).put(update_organization_handler),
        )
        .with_state(app_state)
}
