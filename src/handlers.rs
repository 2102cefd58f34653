use crate::errors::AppError;
use crate::models::{
    Activity, ActivityDraft, DashboardResponse, ExportSummary, InsightsResponse, Meal, MealDraft,
    MealLog, MealSlot, NavBadges, TimeOfDay,
};
use crate::repository::{Repository, Snapshot};
use crate::state::AppState;
use crate::stats::{build_dashboard, build_export, build_insights, export_file_name, nav_badges};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub time_of_day: Option<String>,
}

pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let filter = match query.time_of_day.as_deref() {
        None | Some("") | Some("all") => None,
        Some(value) => Some(value.parse::<TimeOfDay>()?),
    };
    let activities = with_repo(&state, move |repo| Ok(repo.activities_by_time(filter))).await?;
    Ok(Json(activities))
}

pub async fn add_activity(
    State(state): State<AppState>,
    payload: Result<Json<ActivityDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let Json(draft) = payload?;
    let activity = with_repo(&state, move |repo| Ok(repo.add_activity(draft)?)).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn remove_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    with_repo(&state, move |repo| Ok(repo.remove_activity(&id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_meals(State(state): State<AppState>) -> Result<Json<MealLog>, AppError> {
    let meals = with_repo(&state, |repo| Ok(repo.meals().clone())).await?;
    Ok(Json(meals))
}

pub async fn add_meal(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    payload: Result<Json<MealDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Meal>), AppError> {
    let slot: MealSlot = slot.parse()?;
    let Json(draft) = payload?;
    let meal = with_repo(&state, move |repo| Ok(repo.add_meal(slot, draft)?)).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn remove_meal(
    State(state): State<AppState>,
    Path((slot, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let slot: MealSlot = slot.parse()?;
    with_repo(&state, move |repo| Ok(repo.remove_meal(slot, &id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    let snapshot = fresh_snapshot(&state).await?;
    Ok(Json(build_dashboard(&snapshot, &state.goals)))
}

pub async fn get_badges(State(state): State<AppState>) -> Result<Json<NavBadges>, AppError> {
    let snapshot = fresh_snapshot(&state).await?;
    Ok(Json(nav_badges(&snapshot)))
}

pub async fn get_insights(State(state): State<AppState>) -> Result<Json<InsightsResponse>, AppError> {
    let snapshot = fresh_snapshot(&state).await?;
    Ok(Json(build_insights(&snapshot, &state.weekly)))
}

pub async fn get_summary(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let snapshot = fresh_snapshot(&state).await?;
    let export: ExportSummary = build_export(&snapshot, &state.weekly);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Local::now().date_naive())
    );
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(export)))
}

/// Clears stored data, then reloads so the next view starts from the seed.
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    with_repo(&state, |repo| {
        repo.reset_all()?;
        repo.reload()?;
        Ok(())
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reads the persisted documents while holding the repository lock so no
/// mutation interleaves with the read.
async fn fresh_snapshot(state: &AppState) -> Result<Snapshot, AppError> {
    let store = Arc::clone(&state.store);
    with_repo(state, move |_| Ok(Snapshot::load(&store))).await
}

/// Runs a repository operation on the blocking pool with the lock held, since
/// the file backend does synchronous I/O.
async fn with_repo<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    F: FnOnce(&mut Repository) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let mut repo = Arc::clone(&state.repo).lock_owned().await;
    tokio::task::spawn_blocking(move || op(&mut repo))
        .await
        .map_err(AppError::internal)?
}
