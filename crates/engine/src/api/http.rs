//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sheetkeeper_domain::{DomainError, GameSystemKind, User, UserId, UserRole};
use std::sync::Arc;
use uuid::Uuid;

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::{AdventureError, CharacterError, SheetError, UserError};

use super::{adventure_routes, character_routes};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/game-systems", get(list_game_systems))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{user_id}", get(get_user))
        .merge(character_routes::routes())
        .merge(adventure_routes::routes())
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Game systems
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameSystemSummary {
    id: GameSystemKind,
    display_name: &'static str,
    abilities: Vec<&'static str>,
    skills: Vec<SkillSummary>,
    max_level: i32,
}

#[derive(Debug, Serialize)]
struct SkillSummary {
    name: &'static str,
    ability: &'static str,
}

async fn list_game_systems() -> Json<Vec<GameSystemSummary>> {
    let systems = GameSystemKind::ALL
        .iter()
        .map(|kind| {
            let system = kind.system();
            GameSystemSummary {
                id: *kind,
                display_name: system.display_name(),
                abilities: system.abilities().to_vec(),
                skills: system
                    .skills()
                    .iter()
                    .map(|skill| SkillSummary {
                        name: skill.name,
                        ability: skill.ability,
                    })
                    .collect(),
                max_level: system.max_level(),
            }
        })
        .collect();
    Json(systems)
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    display_name: String,
    #[serde(default)]
    role: UserRole,
}

async fn create_user(
    State(app): State<Arc<App>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = app
        .use_cases
        .users
        .create(&request.display_name, request.role)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(State(app): State<Arc<App>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(app.use_cases.users.list().await?))
}

async fn get_user(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = app.use_cases.users.get(UserId::from_uuid(user_id)).await?;
    Ok(Json(user))
}

// =============================================================================
// Errors
// =============================================================================

/// Error returned by HTTP handlers.
///
/// Internal errors are logged and replaced with a generic message.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            DomainError::Validation(_) | DomainError::Parse(_) => {
                ApiError::BadRequest(e.to_string())
            }
            DomainError::Constraint(_) | DomainError::ContainerFull { .. } => {
                ApiError::Conflict(e.to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => ApiError::NotFound(e.to_string()),
            UserError::Domain(e) => e.into(),
            UserError::Repo(e) => e.into(),
        }
    }
}

impl From<CharacterError> for ApiError {
    fn from(e: CharacterError) -> Self {
        match e {
            CharacterError::CharacterNotFound(_) | CharacterError::UserNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            CharacterError::UnsupportedFormat(_) | CharacterError::InvalidDocument(_) => {
                ApiError::BadRequest(e.to_string())
            }
            CharacterError::Domain(e) => e.into(),
            CharacterError::Repo(e) => e.into(),
        }
    }
}

impl From<SheetError> for ApiError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::CharacterNotFound(_) => ApiError::NotFound(e.to_string()),
            SheetError::TabNotDeletable(_) => ApiError::Conflict(e.to_string()),
            SheetError::Domain(e) => e.into(),
            SheetError::Repo(e) => e.into(),
        }
    }
}

impl From<AdventureError> for ApiError {
    fn from(e: AdventureError) -> Self {
        match e {
            AdventureError::AdventureNotFound(_)
            | AdventureError::UserNotFound(_)
            | AdventureError::CharacterNotFound(_) => ApiError::NotFound(e.to_string()),
            AdventureError::NotGameMaster(_) => ApiError::Forbidden(e.to_string()),
            AdventureError::Domain(e) => e.into(),
            AdventureError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("Tab", "x"), StatusCode::NOT_FOUND),
            (DomainError::constraint("no"), StatusCode::CONFLICT),
            (DomainError::container_full("tabs", 8, 8), StatusCode::CONFLICT),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn refused_tab_deletion_is_a_conflict() {
        let error = SheetError::TabNotDeletable(sheetkeeper_domain::TabId::new());
        assert_eq!(ApiError::from(error).into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn players_creating_adventures_are_forbidden() {
        let error = AdventureError::NotGameMaster(UserId::new());
        assert_eq!(ApiError::from(error).into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn repository_failures_hide_details() {
        let error = RepoError::database("save", "connection reset");
        assert_eq!(
            ApiError::from(error).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
