//! Department and faculty image endpoints
//!
//! Both galleries share handlers; the route decides the [`ImageKind`].
//! Flag changes go through the exclusive-flag setter.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{ImageKind, ImageRepo, ImageRow, NewImage};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ValidPath};
use crate::http::server::AppState;
use crate::models::ValidationError;

/// Add image request. `is_primary` and `is_profile` are accepted on both routes.
#[derive(Deserialize)]
pub struct AddImageRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default, alias = "is_primary", alias = "is_profile")]
    pub exclusive: bool,
}

impl TryFrom<AddImageRequest> for NewImage {
    type Error = ValidationError;

    fn try_from(req: AddImageRequest) -> Result<Self, Self::Error> {
        let image_url = req
            .image_url
            .map(|u| u.trim().to_owned())
            .filter(|u| !u.is_empty())
            .ok_or(ValidationError::Empty { field: "image_url" })?;

        Ok(Self {
            image_url,
            alt_text: req.alt_text,
            exclusive: req.exclusive,
        })
    }
}

/// Image response; the parent and flag keys depend on the gallery
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<i32>,
    pub image_url: String,
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_profile: Option<bool>,
}

impl ImageResponse {
    fn new(kind: ImageKind, row: ImageRow) -> Self {
        let department = kind == ImageKind::Department;
        Self {
            id: row.image_id,
            department_id: department.then_some(row.parent_id),
            faculty_id: (!department).then_some(row.parent_id),
            image_url: row.image_url,
            alt_text: row.alt_text,
            is_primary: department.then_some(row.flagged),
            is_profile: (!department).then_some(row.flagged),
        }
    }
}

async fn list(
    state: &AppState,
    kind: ImageKind,
    parent_id: i32,
) -> Result<Json<Vec<ImageResponse>>, ApiError> {
    let rows = ImageRepo::new(&state.pool, kind).list(parent_id).await?;
    Ok(Json(
        rows.into_iter().map(|r| ImageResponse::new(kind, r)).collect(),
    ))
}

async fn add(
    state: &AppState,
    kind: ImageKind,
    parent_id: i32,
    req: AddImageRequest,
) -> Result<(StatusCode, Json<ImageResponse>), ApiError> {
    let image = NewImage::try_from(req)?;
    let row = ImageRepo::new(&state.pool, kind).add(parent_id, image).await?;
    tracing::info!(?kind, parent_id, image_id = row.image_id, "image added");
    Ok((StatusCode::CREATED, Json(ImageResponse::new(kind, row))))
}

async fn set_flag(
    state: &AppState,
    kind: ImageKind,
    parent_id: i32,
    image_id: i32,
) -> Result<Json<ImageResponse>, ApiError> {
    let row = ImageRepo::new(&state.pool, kind)
        .set_exclusive(parent_id, image_id)
        .await?;
    Ok(Json(ImageResponse::new(kind, row)))
}

async fn remove(
    state: &AppState,
    kind: ImageKind,
    parent_id: i32,
    image_id: i32,
) -> Result<Json<ImageResponse>, ApiError> {
    let row = ImageRepo::new(&state.pool, kind).delete(parent_id, image_id).await?;
    tracing::info!(?kind, parent_id, image_id, "image deleted");
    Ok(Json(ImageResponse::new(kind, row)))
}

/// GET /departments/{id}/images
async fn list_department_images(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<Vec<ImageResponse>>, ApiError> {
    list(&state, ImageKind::Department, id).await
}

/// POST /departments/{id}/images
async fn add_department_image(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
    Json(req): Json<AddImageRequest>,
) -> Result<(StatusCode, Json<ImageResponse>), ApiError> {
    add(&state, ImageKind::Department, id, req).await
}

/// PUT /departments/{id}/images/{image_id}/primary
async fn set_department_primary(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath((id, image_id)): ValidPath<(i32, i32)>,
) -> Result<Json<ImageResponse>, ApiError> {
    set_flag(&state, ImageKind::Department, id, image_id).await
}

/// DELETE /departments/{id}/images/{image_id}
async fn delete_department_image(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath((id, image_id)): ValidPath<(i32, i32)>,
) -> Result<Json<ImageResponse>, ApiError> {
    remove(&state, ImageKind::Department, id, image_id).await
}

/// GET /faculty/{id}/images
async fn list_faculty_images(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<Vec<ImageResponse>>, ApiError> {
    list(&state, ImageKind::Faculty, id).await
}

/// POST /faculty/{id}/images
async fn add_faculty_image(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
    Json(req): Json<AddImageRequest>,
) -> Result<(StatusCode, Json<ImageResponse>), ApiError> {
    add(&state, ImageKind::Faculty, id, req).await
}

/// PUT /faculty/{id}/images/{image_id}/profile
async fn set_faculty_profile(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath((id, image_id)): ValidPath<(i32, i32)>,
) -> Result<Json<ImageResponse>, ApiError> {
    set_flag(&state, ImageKind::Faculty, id, image_id).await
}

/// DELETE /faculty/{id}/images/{image_id}
async fn delete_faculty_image(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath((id, image_id)): ValidPath<(i32, i32)>,
) -> Result<Json<ImageResponse>, ApiError> {
    remove(&state, ImageKind::Faculty, id, image_id).await
}

/// Image routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/departments/{id}/images",
            get(list_department_images).post(add_department_image),
        )
        .route(
            "/departments/{id}/images/{image_id}/primary",
            put(set_department_primary),
        )
        .route(
            "/departments/{id}/images/{image_id}",
            delete(delete_department_image),
        )
        .route(
            "/faculty/{id}/images",
            get(list_faculty_images).post(add_faculty_image),
        )
        .route("/faculty/{id}/images/{image_id}/profile", put(set_faculty_profile))
        .route("/faculty/{id}/images/{image_id}", delete(delete_faculty_image))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(flagged: bool) -> ImageRow {
        ImageRow {
            image_id: 102,
            parent_id: 5,
            image_url: "lab.png".into(),
            alt_text: None,
            flagged,
        }
    }

    #[test]
    fn department_image_uses_primary_key() {
        let json = serde_json::to_value(ImageResponse::new(ImageKind::Department, row(true))).unwrap();
        assert_eq!(json["id"], 102);
        assert_eq!(json["department_id"], 5);
        assert_eq!(json["is_primary"], true);
        assert!(json.get("is_profile").is_none());
        assert!(json.get("faculty_id").is_none());
    }

    #[test]
    fn faculty_image_uses_profile_key() {
        let json = serde_json::to_value(ImageResponse::new(ImageKind::Faculty, row(false))).unwrap();
        assert_eq!(json["faculty_id"], 5);
        assert_eq!(json["is_profile"], false);
        assert!(json.get("is_primary").is_none());
    }

    #[test]
    fn add_request_accepts_either_flag_name() {
        let req: AddImageRequest =
            serde_json::from_str(r#"{"image_url":"a.png","is_primary":true}"#).unwrap();
        assert!(req.exclusive);
        let req: AddImageRequest =
            serde_json::from_str(r#"{"image_url":"a.png","is_profile":true}"#).unwrap();
        assert!(req.exclusive);
    }

    #[test]
    fn add_request_requires_url() {
        let req: AddImageRequest = serde_json::from_str(r#"{"image_url":"  "}"#).unwrap();
        assert_eq!(
            NewImage::try_from(req).unwrap_err(),
            ValidationError::Empty { field: "image_url" }
        );
    }
}
