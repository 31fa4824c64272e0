//! Role and permission export routes.
//!
//! UI permission gating reads the registry through these endpoints instead
//! of duplicating the mapping client side.

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthzLayer, Caller},
    response::ApiResponse,
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tender_rbac::{Permission, Role};

/// Create the `/api/rbac` router.
pub fn router(state: AppState) -> Router<AppState> {
    let enforcer = state.enforcer.clone();

    let caller_routes = Router::new()
        .route("/me", get(me))
        .route("/check", post(check));

    let role_routes = Router::new()
        .route("/roles", get(list_roles))
        .route_layer(AuthzLayer::manager_or_admin(enforcer.clone()));

    let permission_routes = Router::new()
        .route("/permissions", get(list_permissions))
        .route_layer(AuthzLayer::permission(enforcer, Permission::RoleManage));

    caller_routes.merge(role_routes).merge(permission_routes)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerView {
    pub id: i64,
    pub role: Role,
    pub display_name: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub role: Role,
    pub display_name: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Serialize)]
pub struct PermissionView {
    pub permission: Permission,
    pub resource: &'static str,
    pub action: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
    pub missing: Vec<Permission>,
}

async fn me(State(state): State<AppState>, Caller(identity): Caller) -> ApiResponse<CallerView> {
    let registry = state.registry();
    ApiResponse::success(CallerView {
        id: identity.id,
        role: identity.role,
        display_name: registry.display_name(identity.role).to_string(),
        permissions: registry.permissions_for(identity.role),
    })
}

async fn check(
    State(state): State<AppState>,
    Caller(identity): Caller,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<CheckResponse>> {
    let Json(request) = payload?;
    let required = request
        .permissions
        .iter()
        .map(|p| p.parse::<Permission>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let registry = state.registry();
    let missing = registry.missing_permissions(identity.role, &required);

    Ok(ApiResponse::success(CheckResponse {
        allowed: registry.can_access(identity.role, &required),
        missing,
    }))
}

async fn list_roles(State(state): State<AppState>) -> ApiResponse<Vec<RoleView>> {
    let registry = state.registry();
    let roles = registry
        .roles()
        .map(|(role, permissions)| RoleView {
            role,
            display_name: registry.display_name(role).to_string(),
            permissions,
        })
        .collect();

    ApiResponse::success(roles)
}

async fn list_permissions() -> ApiResponse<Vec<PermissionView>> {
    let permissions = Permission::ALL
        .iter()
        .map(|permission| PermissionView {
            permission: *permission,
            resource: permission.resource(),
            action: permission.action(),
        })
        .collect();

    ApiResponse::success(permissions)
}
