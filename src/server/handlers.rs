//! HTTP handlers and request/response types.
//!
//! Index-based commands follow the engine: an out-of-range index or an
//! unusable value changes nothing and still answers with the current state.
//! The state returned by a command is the one the tracker captured under the
//! command's own lock.

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::core::session::{Category, CombatSnapshot, Role, SpectatorView};
use crate::core::storage::EncounterSummary;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AddParticipantRequest {
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub category: Category,
}

/// A single initiative entry. The form field may arrive as a number or as
/// the raw text the operator typed.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiativeRequest {
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitiativeEntry {
    pub index: usize,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchInitiativeRequest {
    pub entries: Vec<InitiativeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveEncounterRequest {
    pub name: String,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePlayersResponse {
    pub saved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadPlayersResponse {
    pub loaded: bool,
    pub state: CombatSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEncounterResponse {
    /// `None` when the name was blank and nothing was written.
    pub encounter: Option<EncounterSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadEncounterResponse {
    pub appended: usize,
    pub state: CombatSnapshot,
}

/// Text handed to the engine's initiative parser.
fn initiative_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

// ============================================================================
// Read-only
// ============================================================================

/// Landing document for `/`: service identity and where to look next.
pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": crate::NAME,
        "version": crate::VERSION,
        "endpoints": {
            "health": "/health",
            "state": "/api/state",
            "view": "/api/view",
            "encounters": "/api/encounters",
        },
    }))
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn get_state(State(state): State<AppState>) -> Json<CombatSnapshot> {
    Json(state.tracker.snapshot().await)
}

pub async fn get_view(State(state): State<AppState>) -> Json<SpectatorView> {
    Json(SpectatorView {
        snapshot: state.tracker.snapshot().await,
        refresh_secs: state.view_refresh_secs,
    })
}

// ============================================================================
// Roster
// ============================================================================

pub async fn add_participant(
    State(state): State<AppState>,
    Json(req): Json<AddParticipantRequest>,
) -> Json<CombatSnapshot> {
    let applied = state
        .tracker
        .add_participant(&req.name, req.role, req.category)
        .await;
    Json(applied.state)
}

pub async fn remove_participant(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Json<CombatSnapshot> {
    Json(state.tracker.remove_participant(index).await.state)
}

pub async fn add_wound(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Json<CombatSnapshot> {
    Json(state.tracker.add_wound(index).await.state)
}

pub async fn remove_wound(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Json<CombatSnapshot> {
    Json(state.tracker.remove_wound(index).await.state)
}

pub async fn set_initiative(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<InitiativeRequest>,
) -> Json<CombatSnapshot> {
    let applied = state
        .tracker
        .set_player_initiative(index, &initiative_text(&req.value))
        .await;
    Json(applied.state)
}

pub async fn set_initiatives(
    State(state): State<AppState>,
    Json(req): Json<BatchInitiativeRequest>,
) -> Json<CombatSnapshot> {
    let entries = req
        .entries
        .iter()
        .map(|e| (e.index, initiative_text(&e.value)))
        .collect();
    Json(state.tracker.set_player_initiatives(entries).await.state)
}

// ============================================================================
// Turn flow
// ============================================================================

pub async fn next_turn(State(state): State<AppState>) -> Json<CombatSnapshot> {
    Json(state.tracker.advance_turn().await.state)
}

pub async fn new_round(State(state): State<AppState>) -> Json<CombatSnapshot> {
    Json(state.tracker.start_new_round().await.state)
}

pub async fn reset_combat(State(state): State<AppState>) -> Json<CombatSnapshot> {
    Json(state.tracker.reset_combat().await.state)
}

pub async fn reset_all(State(state): State<AppState>) -> Json<CombatSnapshot> {
    Json(state.tracker.reset_all().await.state)
}

// ============================================================================
// Persistence
// ============================================================================

pub async fn save_players(State(state): State<AppState>) -> ApiResult<Json<SavePlayersResponse>> {
    let saved = state.tracker.save_players().await?;
    Ok(Json(SavePlayersResponse { saved }))
}

pub async fn load_players(State(state): State<AppState>) -> ApiResult<Json<LoadPlayersResponse>> {
    let applied = state.tracker.load_players().await?;
    Ok(Json(LoadPlayersResponse {
        loaded: applied.outcome,
        state: applied.state,
    }))
}

pub async fn list_encounters(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EncounterSummary>>> {
    Ok(Json(state.tracker.list_encounters().await?))
}

pub async fn save_encounter(
    State(state): State<AppState>,
    Json(req): Json<SaveEncounterRequest>,
) -> ApiResult<Json<SaveEncounterResponse>> {
    let encounter = state.tracker.save_encounter(&req.name).await?;
    Ok(Json(SaveEncounterResponse { encounter }))
}

pub async fn load_encounter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LoadEncounterResponse>> {
    let applied = state
        .tracker
        .load_encounter(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Encounter not found: {id}")))?;
    Ok(Json(LoadEncounterResponse {
        appended: applied.outcome,
        state: applied.state,
    }))
}
