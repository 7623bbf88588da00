//! Faculty endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::departments::DepartmentResponse;
use crate::db::{
    DeletedFaculty, DepartmentSummary, FacultyChanges, FacultyDetail, FacultyRecord, FacultyRepo,
    NewFaculty,
};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ValidPath};
use crate::http::server::AppState;
use crate::models::patch::{non_null, present};
use crate::models::{ContactInfo, PersonName, ValidationError};

/// Query parameters for GET /faculty
#[derive(Debug, Default, Deserialize)]
pub struct FacultyQuery {
    pub search: Option<String>,
}

/// Create faculty request
#[derive(Deserialize)]
pub struct CreateFacultyRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub department_id: Option<i32>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
}

impl TryFrom<CreateFacultyRequest> for NewFaculty {
    type Error = ValidationError;

    fn try_from(req: CreateFacultyRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: PersonName::first(req.first_name.as_deref().unwrap_or_default())?,
            last_name: PersonName::last(req.last_name.as_deref().unwrap_or_default())?,
            title: req.title.unwrap_or_default(),
            bio: req.bio.unwrap_or_default(),
            department_id: req.department_id,
            profile_image: req.profile_image.unwrap_or_default(),
            contact: req.contact_info.unwrap_or_default(),
        })
    }
}

/// Sparse faculty update; absent keys are left unchanged
#[derive(Deserialize)]
pub struct UpdateFacultyRequest {
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub department_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub profile_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub contact_info: Option<Option<ContactInfo>>,
}

impl TryFrom<UpdateFacultyRequest> for FacultyChanges {
    type Error = ValidationError;

    fn try_from(req: UpdateFacultyRequest) -> Result<Self, Self::Error> {
        let first_name = non_null("first_name", req.first_name)?
            .map(|n| PersonName::first(&n))
            .transpose()?;
        let last_name = non_null("last_name", req.last_name)?
            .map(|n| PersonName::last(&n))
            .transpose()?;

        Ok(Self {
            first_name,
            last_name,
            title: req.title,
            bio: req.bio,
            department_id: req.department_id,
            profile_image: req.profile_image,
            contact: req.contact_info.flatten(),
        })
    }
}

/// Faculty fields shared by every response
#[derive(Serialize)]
pub struct FacultyResponse {
    pub id: i32,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub department_id: Option<i32>,
    pub profile_image: Option<String>,
    pub contact_info: ContactInfo,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&FacultyRecord> for FacultyResponse {
    fn from(f: &FacultyRecord) -> Self {
        Self {
            id: f.id,
            name: f.full_name(),
            first_name: f.first_name.clone(),
            last_name: f.last_name.clone(),
            title: f.title.clone(),
            bio: f.bio.clone(),
            department_id: f.department_id,
            profile_image: f.profile_image.clone(),
            contact_info: f.contact(),
            created_at: f.created_at.to_rfc3339(),
            updated_at: f.updated_at.to_rfc3339(),
        }
    }
}

/// Primary department reference in list entries
#[derive(Serialize)]
pub struct DepartmentRef {
    pub id: i32,
    pub name: String,
}

/// Faculty list entry
#[derive(Serialize)]
pub struct FacultyListItem {
    #[serde(flatten)]
    pub faculty: FacultyResponse,
    pub department: Option<DepartmentRef>,
}

impl From<FacultyRecord> for FacultyListItem {
    fn from(f: FacultyRecord) -> Self {
        let faculty = FacultyResponse::from(&f);
        let department = f
            .department_id
            .zip(f.department_name)
            .map(|(id, name)| DepartmentRef { id, name });
        Self {
            faculty,
            department,
        }
    }
}

/// Faculty member with expanded department and memberships
#[derive(Serialize)]
pub struct FacultyDetailResponse {
    #[serde(flatten)]
    pub faculty: FacultyResponse,
    pub department: Option<DepartmentResponse>,
    pub departments: Vec<DepartmentSummary>,
}

impl From<FacultyDetail> for FacultyDetailResponse {
    fn from(d: FacultyDetail) -> Self {
        Self {
            faculty: FacultyResponse::from(&d.record),
            department: d.department.map(DepartmentResponse::from),
            departments: d.departments,
        }
    }
}

#[derive(Serialize)]
pub struct DeletedFacultySummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
}

impl From<DeletedFaculty> for DeletedFacultySummary {
    fn from(d: DeletedFaculty) -> Self {
        Self {
            name: format!("{} {}", d.first_name, d.last_name),
            id: d.id,
            first_name: d.first_name,
            last_name: d.last_name,
        }
    }
}

#[derive(Serialize)]
pub struct DeletedFacultyResponse {
    pub deleted: DeletedFacultySummary,
}

/// GET /faculty?search= - all faculty, optionally filtered by name
async fn list_faculty(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FacultyQuery>,
) -> Result<Json<Vec<FacultyListItem>>, ApiError> {
    let faculty = FacultyRepo::new(&state.pool)
        .list(query.search.as_deref())
        .await?;
    Ok(Json(faculty.into_iter().map(FacultyListItem::from).collect()))
}

/// GET /faculty/{id}
async fn get_faculty(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<FacultyDetailResponse>, ApiError> {
    let detail = FacultyRepo::new(&state.pool).detail(id).await?;
    Ok(Json(detail.into()))
}

/// POST /faculty
async fn create_faculty(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFacultyRequest>,
) -> Result<(StatusCode, Json<FacultyListItem>), ApiError> {
    let new = NewFaculty::try_from(req)?;
    let faculty = FacultyRepo::new(&state.pool).create(new).await?;
    Ok((StatusCode::CREATED, Json(faculty.into())))
}

/// PATCH /faculty/{id}
async fn update_faculty(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
    Json(req): Json<UpdateFacultyRequest>,
) -> Result<Json<FacultyListItem>, ApiError> {
    let changes = FacultyChanges::try_from(req)?;
    let faculty = FacultyRepo::new(&state.pool).update(id, changes).await?;
    Ok(Json(faculty.into()))
}

/// DELETE /faculty/{id}
async fn delete_faculty(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<DeletedFacultyResponse>, ApiError> {
    let deleted = FacultyRepo::new(&state.pool).delete(id).await?;
    Ok(Json(DeletedFacultyResponse {
        deleted: deleted.into(),
    }))
}

/// Faculty routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/faculty", get(list_faculty).post(create_faculty))
        .route(
            "/faculty/{id}",
            get(get_faculty).patch(update_faculty).delete(delete_faculty),
        )
}
