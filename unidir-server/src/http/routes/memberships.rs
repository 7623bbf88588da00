//! Faculty ↔ department membership endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::db::{DepartmentSummary, MembershipRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ValidPath};
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct MembershipResponse {
    pub faculty_id: i32,
    pub department_id: i32,
    pub created: bool,
}

/// GET /faculty/{id}/departments
async fn list_departments(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<Vec<DepartmentSummary>>, ApiError> {
    let departments = MembershipRepo::new(&state.pool).departments_for(id).await?;
    Ok(Json(departments))
}

/// PUT /faculty/{id}/departments/{department_id} - 201 when newly linked, 200 otherwise
async fn link(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath((faculty_id, department_id)): ValidPath<(i32, i32)>,
) -> Result<(StatusCode, Json<MembershipResponse>), ApiError> {
    let created = MembershipRepo::new(&state.pool)
        .link(faculty_id, department_id)
        .await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };

    Ok((
        status,
        Json(MembershipResponse {
            faculty_id,
            department_id,
            created,
        }),
    ))
}

/// DELETE /faculty/{id}/departments/{department_id}
async fn unlink(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidPath((faculty_id, department_id)): ValidPath<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    MembershipRepo::new(&state.pool)
        .unlink(faculty_id, department_id)
        .await?;
    tracing::info!(faculty_id, department_id, "faculty unlinked from department");
    Ok(StatusCode::NO_CONTENT)
}

/// Membership routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/faculty/{id}/departments", get(list_departments))
        .route(
            "/faculty/{id}/departments/{department_id}",
            put(link).delete(unlink),
        )
}
