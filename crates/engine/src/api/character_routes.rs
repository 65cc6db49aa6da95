//! Character, sheet, and layout routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sheetkeeper_domain::{
    CharacterId, DashboardTab, DataItem, DataItemId, GameSystemKind, HitPoints, PlayerCharacter,
    SheetView, SkillEntry, TabId, UserId,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::app::App;
use crate::use_cases::character::CharacterExport;
use crate::use_cases::layout::{MoveTarget, TabUpdate};
use crate::use_cases::sheet::{HpChange, ItemUpdate, ItemUpdated, LevelUpdated, NewItem};

use super::http::ApiError;

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new()
        .route(
            "/api/users/{user_id}/characters",
            get(list_characters).post(create_character),
        )
        .route(
            "/api/users/{user_id}/characters/import",
            post(import_character),
        )
        .route(
            "/api/characters/{id}",
            get(get_character)
                .put(rename_character)
                .delete(delete_character),
        )
        .route("/api/characters/{id}/sheet", get(get_sheet))
        .route("/api/characters/{id}/export", get(export_character))
        .route("/api/characters/{id}/level", put(set_level))
        .route("/api/characters/{id}/items", post(add_item))
        .route(
            "/api/characters/{id}/items/{item_id}",
            put(update_item).delete(remove_item),
        )
        .route("/api/characters/{id}/items/{item_id}/move", post(move_item))
        .route("/api/characters/{id}/items/{item_id}/hp", post(adjust_hp))
        .route(
            "/api/characters/{id}/items/{item_id}/skills/{skill}",
            put(set_skill_training),
        )
        .route("/api/characters/{id}/tabs", post(add_tab))
        .route("/api/characters/{id}/tabs/order", put(reorder_tabs))
        .route(
            "/api/characters/{id}/tabs/{tab_id}",
            put(update_tab).delete(delete_tab),
        )
        .route(
            "/api/characters/{id}/tabs/{tab_id}/columns/{column}/cycle",
            post(cycle_column_width),
        )
        .route("/api/characters/{id}/migrate-layout", post(migrate_layout))
}

// =============================================================================
// Characters
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCharacterRequest {
    name: String,
    game_system: GameSystemKind,
}

#[derive(Debug, Deserialize)]
struct RenameRequest {
    name: String,
}

async fn list_characters(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PlayerCharacter>>, ApiError> {
    let characters = app
        .use_cases
        .character
        .list_for_user(UserId::from_uuid(user_id))
        .await?;
    Ok(Json(characters))
}

async fn create_character(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<PlayerCharacter>), ApiError> {
    let character = app
        .use_cases
        .character
        .create(UserId::from_uuid(user_id), &request.name, request.game_system)
        .await?;
    Ok((StatusCode::CREATED, Json(character)))
}

async fn import_character(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
    Json(document): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<PlayerCharacter>), ApiError> {
    let character = app
        .use_cases
        .character
        .import(UserId::from_uuid(user_id), document)
        .await?;
    Ok((StatusCode::CREATED, Json(character)))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerCharacter>, ApiError> {
    let character = app
        .use_cases
        .character
        .get(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(character))
}

async fn rename_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<PlayerCharacter>, ApiError> {
    let character = app
        .use_cases
        .character
        .rename(CharacterId::from_uuid(id), &request.name)
        .await?;
    Ok(Json(character))
}

async fn delete_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .character
        .delete(CharacterId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn export_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CharacterExport>, ApiError> {
    let export = app
        .use_cases
        .character
        .export(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(export))
}

// =============================================================================
// Sheet
// =============================================================================

#[derive(Debug, Deserialize)]
struct SetLevelRequest {
    level: i32,
}

#[derive(Debug, Deserialize)]
struct SkillTrainingRequest {
    proficient: bool,
    #[serde(default)]
    expertise: bool,
}

async fn get_sheet(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SheetView>, ApiError> {
    let view = app.use_cases.sheet.view(CharacterId::from_uuid(id)).await?;
    Ok(Json(view))
}

async fn set_level(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetLevelRequest>,
) -> Result<Json<LevelUpdated>, ApiError> {
    let updated = app
        .use_cases
        .sheet
        .set_level(CharacterId::from_uuid(id), request.level)
        .await?;
    Ok(Json(updated))
}

async fn add_item(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewItem>,
) -> Result<(StatusCode, Json<DataItem>), ApiError> {
    let item = app
        .use_cases
        .sheet
        .add_item(CharacterId::from_uuid(id), request)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(app): State<Arc<App>>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(update): Json<ItemUpdate>,
) -> Result<Json<ItemUpdated>, ApiError> {
    let updated = app
        .use_cases
        .sheet
        .update_item(
            CharacterId::from_uuid(id),
            DataItemId::from_uuid(item_id),
            update,
        )
        .await?;
    Ok(Json(updated))
}

async fn remove_item(
    State(app): State<Arc<App>>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .sheet
        .remove_item(CharacterId::from_uuid(id), DataItemId::from_uuid(item_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn adjust_hp(
    State(app): State<Arc<App>>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(change): Json<HpChange>,
) -> Result<Json<HitPoints>, ApiError> {
    let hit_points = app
        .use_cases
        .sheet
        .adjust_hp(
            CharacterId::from_uuid(id),
            DataItemId::from_uuid(item_id),
            change,
        )
        .await?;
    Ok(Json(hit_points))
}

async fn set_skill_training(
    State(app): State<Arc<App>>,
    Path((id, item_id, skill)): Path<(Uuid, Uuid, String)>,
    Json(request): Json<SkillTrainingRequest>,
) -> Result<Json<SkillEntry>, ApiError> {
    let entry = app
        .use_cases
        .sheet
        .set_skill_training(
            CharacterId::from_uuid(id),
            DataItemId::from_uuid(item_id),
            &skill,
            request.proficient,
            request.expertise,
        )
        .await?;
    Ok(Json(entry))
}

// =============================================================================
// Layout
// =============================================================================

#[derive(Debug, Deserialize)]
struct NewTabRequest {
    name: String,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderTabsRequest {
    tab_ids: Vec<TabId>,
}

#[derive(Debug, Serialize)]
struct ColumnWidthResponse {
    column: u8,
    width: u8,
}

#[derive(Debug, Serialize)]
struct MigrationResponse {
    migrated: usize,
}

async fn move_item(
    State(app): State<Arc<App>>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(target): Json<MoveTarget>,
) -> Result<Json<PlayerCharacter>, ApiError> {
    let character = app
        .use_cases
        .layout
        .move_item(
            CharacterId::from_uuid(id),
            DataItemId::from_uuid(item_id),
            target,
        )
        .await?;
    Ok(Json(character))
}

async fn add_tab(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewTabRequest>,
) -> Result<(StatusCode, Json<DashboardTab>), ApiError> {
    let tab = app
        .use_cases
        .layout
        .add_tab(CharacterId::from_uuid(id), &request.name, request.icon)
        .await?;
    Ok((StatusCode::CREATED, Json(tab)))
}

async fn reorder_tabs(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReorderTabsRequest>,
) -> Result<Json<Vec<DashboardTab>>, ApiError> {
    let tabs = app
        .use_cases
        .layout
        .reorder_tabs(CharacterId::from_uuid(id), &request.tab_ids)
        .await?;
    Ok(Json(tabs))
}

async fn update_tab(
    State(app): State<Arc<App>>,
    Path((id, tab_id)): Path<(Uuid, Uuid)>,
    Json(update): Json<TabUpdate>,
) -> Result<Json<DashboardTab>, ApiError> {
    let tab = app
        .use_cases
        .layout
        .update_tab(CharacterId::from_uuid(id), TabId::from_uuid(tab_id), update)
        .await?;
    Ok(Json(tab))
}

async fn delete_tab(
    State(app): State<Arc<App>>,
    Path((id, tab_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .layout
        .delete_tab(CharacterId::from_uuid(id), TabId::from_uuid(tab_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cycle_column_width(
    State(app): State<Arc<App>>,
    Path((id, tab_id, column)): Path<(Uuid, Uuid, u8)>,
) -> Result<Json<ColumnWidthResponse>, ApiError> {
    let width = app
        .use_cases
        .layout
        .cycle_column_width(CharacterId::from_uuid(id), TabId::from_uuid(tab_id), column)
        .await?;
    Ok(Json(ColumnWidthResponse {
        column,
        width: width.get(),
    }))
}

async fn migrate_layout(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MigrationResponse>, ApiError> {
    let migrated = app
        .use_cases
        .layout
        .migrate_layout(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(MigrationResponse { migrated }))
}
