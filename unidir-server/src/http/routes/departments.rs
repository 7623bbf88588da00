//! Department endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{
    DeletedDepartment, DepartmentChanges, DepartmentRecord, DepartmentRepo, NewDepartment,
    RosterEntry,
};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ValidPath};
use crate::http::server::AppState;
use crate::models::patch::{non_null, present};
use crate::models::{ContactInfo, DepartmentName, ValidationError};

/// Create department request
#[derive(Deserialize)]
pub struct CreateDepartmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
}

impl TryFrom<CreateDepartmentRequest> for NewDepartment {
    type Error = ValidationError;

    fn try_from(req: CreateDepartmentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: DepartmentName::new(req.name.as_deref().unwrap_or_default())?,
            description: req.description.unwrap_or_default(),
            banner_image: req.banner_image.unwrap_or_default(),
            contact: req.contact_info.unwrap_or_default(),
        })
    }
}

/// Sparse department update; absent keys are left unchanged
#[derive(Deserialize)]
pub struct UpdateDepartmentRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub banner_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub contact_info: Option<Option<ContactInfo>>,
}

impl TryFrom<UpdateDepartmentRequest> for DepartmentChanges {
    type Error = ValidationError;

    fn try_from(req: UpdateDepartmentRequest) -> Result<Self, Self::Error> {
        let name = non_null("name", req.name)?
            .map(|n| DepartmentName::new(&n))
            .transpose()?;

        Ok(Self {
            name,
            description: req.description,
            banner_image: req.banner_image,
            // null contact is treated as absent
            contact: req.contact_info.flatten(),
        })
    }
}

/// Department response
#[derive(Serialize)]
pub struct DepartmentResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub banner_image: Option<String>,
    pub contact_info: ContactInfo,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DepartmentRecord> for DepartmentResponse {
    fn from(d: DepartmentRecord) -> Self {
        Self {
            contact_info: d.contact(),
            id: d.id,
            name: d.name,
            description: d.description,
            banner_image: d.banner_image,
            created_at: d.created_at.to_rfc3339(),
            updated_at: d.updated_at.to_rfc3339(),
        }
    }
}

/// Faculty member on a department page
#[derive(Serialize)]
pub struct RosterResponse {
    pub id: i32,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub office_location: Option<String>,
    pub website_url: Option<String>,
    pub department_id: Option<i32>,
}

impl From<RosterEntry> for RosterResponse {
    fn from(r: RosterEntry) -> Self {
        Self {
            name: format!("{} {}", r.first_name, r.last_name),
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            title: r.title,
            bio: r.bio,
            profile_image: r.profile_image,
            email: r.email,
            phone: r.phone,
            office_location: r.office_location,
            website_url: r.website_url,
            department_id: r.department_id,
        }
    }
}

/// Department with its faculty roster
#[derive(Serialize)]
pub struct DepartmentDetailResponse {
    #[serde(flatten)]
    pub department: DepartmentResponse,
    pub faculty: Vec<RosterResponse>,
}

#[derive(Serialize)]
pub struct DeletedDepartmentResponse {
    pub deleted: DeletedDepartment,
}

/// GET /departments - all departments ordered by name
async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    let departments = DepartmentRepo::new(&state.pool).list().await?;
    Ok(Json(departments.into_iter().map(DepartmentResponse::from).collect()))
}

/// GET /departments/{id} - one department with its roster
async fn get_department(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<DepartmentDetailResponse>, ApiError> {
    let repo = DepartmentRepo::new(&state.pool);
    let department = repo.get(id).await?;
    let roster = repo.roster(id).await?;

    Ok(Json(DepartmentDetailResponse {
        department: department.into(),
        faculty: roster.into_iter().map(RosterResponse::from).collect(),
    }))
}

/// POST /departments
async fn create_department(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentResponse>), ApiError> {
    let new = NewDepartment::try_from(req)?;
    let department = DepartmentRepo::new(&state.pool).create(new).await?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

/// PATCH /departments/{id}
async fn update_department(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let changes = DepartmentChanges::try_from(req)?;
    let department = DepartmentRepo::new(&state.pool).update(id, changes).await?;
    Ok(Json(department.into()))
}

/// DELETE /departments/{id}
async fn delete_department(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<DeletedDepartmentResponse>, ApiError> {
    let deleted = DepartmentRepo::new(&state.pool).delete(id).await?;
    Ok(Json(DeletedDepartmentResponse { deleted }))
}

/// Department routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/{id}",
            get(get_department)
                .patch(update_department)
                .delete(delete_department),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<DepartmentChanges, ValidationError> {
        let req: UpdateDepartmentRequest = serde_json::from_str(json).unwrap();
        DepartmentChanges::try_from(req)
    }

    #[test]
    fn create_requires_name() {
        let req: CreateDepartmentRequest = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        assert_eq!(
            NewDepartment::try_from(req).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }

    #[test]
    fn create_defaults_optional_fields() {
        let req: CreateDepartmentRequest = serde_json::from_str(r#"{"name":" Physics "}"#).unwrap();
        let new = NewDepartment::try_from(req).unwrap();
        assert_eq!(new.name.as_str(), "Physics");
        assert_eq!(new.description, "");
        assert!(new.contact.is_blank());
    }

    #[test]
    fn patch_null_name_rejected() {
        assert_eq!(
            parse(r#"{"name":null}"#).unwrap_err(),
            ValidationError::NullNotAllowed { field: "name" }
        );
    }

    #[test]
    fn patch_empty_name_rejected() {
        assert_eq!(
            parse(r#"{"name":"  "}"#).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }

    #[test]
    fn patch_keeps_presence() {
        let changes = parse(r#"{"description":"","banner_image":null}"#).unwrap();
        assert!(changes.name.is_none());
        assert_eq!(changes.description, Some(Some(String::new())));
        assert_eq!(changes.banner_image, Some(None));
        assert!(changes.contact.is_none());
    }

    #[test]
    fn patch_null_contact_is_absent() {
        let changes = parse(r#"{"contact_info":null}"#).unwrap();
        assert!(changes.contact.is_none());
    }
}
