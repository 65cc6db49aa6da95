//! Game master adventure routes: journal and initiative.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use sheetkeeper_domain::{
    Adventure, AdventureId, Combatant, CombatantId, InitiativeTracker, JournalEntry,
    JournalEntryId, UserId,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::app::App;
use crate::use_cases::adventure::{JournalUpdate, NewAdventure, NewCombatant};

use super::http::ApiError;

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new()
        .route(
            "/api/users/{user_id}/adventures",
            get(list_adventures).post(create_adventure),
        )
        .route(
            "/api/adventures/{id}",
            get(get_adventure).delete(delete_adventure),
        )
        .route("/api/adventures/{id}/journal", post(add_journal_entry))
        .route(
            "/api/adventures/{id}/journal/{entry_id}",
            put(update_journal_entry).delete(remove_journal_entry),
        )
        .route(
            "/api/adventures/{id}/initiative",
            post(add_combatant).delete(end_combat),
        )
        .route("/api/adventures/{id}/initiative/next", post(next_turn))
        .route("/api/adventures/{id}/initiative/previous", post(previous_turn))
        .route("/api/adventures/{id}/initiative/reset", post(reset_initiative))
        .route(
            "/api/adventures/{id}/initiative/{combatant_id}",
            delete(remove_combatant),
        )
}

async fn list_adventures(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Adventure>>, ApiError> {
    let adventures = app
        .use_cases
        .adventure
        .list_for_owner(UserId::from_uuid(user_id))
        .await?;
    Ok(Json(adventures))
}

async fn create_adventure(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<NewAdventure>,
) -> Result<(StatusCode, Json<Adventure>), ApiError> {
    let adventure = app
        .use_cases
        .adventure
        .create(UserId::from_uuid(user_id), request)
        .await?;
    Ok((StatusCode::CREATED, Json(adventure)))
}

async fn get_adventure(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Adventure>, ApiError> {
    let adventure = app
        .use_cases
        .adventure
        .get(AdventureId::from_uuid(id))
        .await?;
    Ok(Json(adventure))
}

async fn delete_adventure(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .adventure
        .delete(AdventureId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Journal
// =============================================================================

#[derive(Debug, Deserialize)]
struct NewJournalEntryRequest {
    title: String,
    #[serde(default)]
    body: String,
}

async fn add_journal_entry(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewJournalEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let entry = app
        .use_cases
        .adventure
        .add_journal_entry(AdventureId::from_uuid(id), &request.title, request.body)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_journal_entry(
    State(app): State<Arc<App>>,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
    Json(update): Json<JournalUpdate>,
) -> Result<Json<JournalEntry>, ApiError> {
    let entry = app
        .use_cases
        .adventure
        .update_journal_entry(
            AdventureId::from_uuid(id),
            JournalEntryId::from_uuid(entry_id),
            update,
        )
        .await?;
    Ok(Json(entry))
}

async fn remove_journal_entry(
    State(app): State<Arc<App>>,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .adventure
        .remove_journal_entry(
            AdventureId::from_uuid(id),
            JournalEntryId::from_uuid(entry_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Initiative
// =============================================================================

async fn add_combatant(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewCombatant>,
) -> Result<(StatusCode, Json<Combatant>), ApiError> {
    let combatant = app
        .use_cases
        .adventure
        .add_combatant(AdventureId::from_uuid(id), request)
        .await?;
    Ok((StatusCode::CREATED, Json(combatant)))
}

async fn remove_combatant(
    State(app): State<Arc<App>>,
    Path((id, combatant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<InitiativeTracker>, ApiError> {
    let tracker = app
        .use_cases
        .adventure
        .remove_combatant(
            AdventureId::from_uuid(id),
            CombatantId::from_uuid(combatant_id),
        )
        .await?;
    Ok(Json(tracker))
}

async fn next_turn(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InitiativeTracker>, ApiError> {
    let tracker = app
        .use_cases
        .adventure
        .next_turn(AdventureId::from_uuid(id))
        .await?;
    Ok(Json(tracker))
}

async fn previous_turn(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InitiativeTracker>, ApiError> {
    let tracker = app
        .use_cases
        .adventure
        .previous_turn(AdventureId::from_uuid(id))
        .await?;
    Ok(Json(tracker))
}

async fn reset_initiative(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InitiativeTracker>, ApiError> {
    let tracker = app
        .use_cases
        .adventure
        .reset_initiative(AdventureId::from_uuid(id))
        .await?;
    Ok(Json(tracker))
}

async fn end_combat(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InitiativeTracker>, ApiError> {
    let tracker = app
        .use_cases
        .adventure
        .end_combat(AdventureId::from_uuid(id))
        .await?;
    Ok(Json(tracker))
}
