use crate::controller::Event;
use crate::errors::AppError;
use crate::export::{history_csv, EXPORT_FILE_NAME};
use crate::models::{
    DarkModeRequest, GoalRequest, MotionRequest, NextStateQuery, PanelRequest, PermissionRequest,
    Snapshot,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

const LONG_POLL: Duration = Duration::from_secs(25);

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = state.controller.snapshot().await?;
    Ok(Html(render_index(&snapshot)))
}

pub async fn get_state(State(state): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(state.controller.snapshot().await?))
}

/// Returns at once when the controller has moved past `since`, otherwise
/// holds the request until the next change or the poll window passes.
pub async fn next_state(
    State(state): State<AppState>,
    Query(query): Query<NextStateQuery>,
) -> Result<Json<Snapshot>, AppError> {
    // Subscribe before reading so nothing lands between the two.
    let mut changes = state.controller.subscribe();
    let current = state.controller.snapshot().await?;
    let since = query.since.unwrap_or(current.version);
    // A version behind `since` means the server restarted.
    if current.version != since {
        return Ok(Json(current));
    }

    let wait = async {
        loop {
            match changes.recv().await {
                Ok(snapshot) if snapshot.version > since => return Ok(snapshot),
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => return state.controller.snapshot().await,
                Err(RecvError::Closed) => {
                    return Err(AppError::unavailable("step controller stopped"));
                }
            }
        }
    };
    match tokio::time::timeout(LONG_POLL, wait).await {
        Ok(result) => Ok(Json(result?)),
        Err(_) => Ok(Json(state.controller.snapshot().await?)),
    }
}

pub async fn permission(
    State(state): State<AppState>,
    Json(payload): Json<PermissionRequest>,
) -> Result<Json<Snapshot>, AppError> {
    let event = Event::PermissionResolved {
        granted: payload.granted,
    };
    Ok(Json(state.controller.dispatch(event).await?))
}

pub async fn motion(
    State(state): State<AppState>,
    Json(payload): Json<MotionRequest>,
) -> Result<Json<Snapshot>, AppError> {
    let event = Event::Motion {
        samples: payload.samples,
    };
    Ok(Json(state.controller.dispatch(event).await?))
}

pub async fn set_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<Snapshot>, AppError> {
    let event = Event::SetGoal { raw: payload.goal };
    Ok(Json(state.controller.dispatch(event).await?))
}

pub async fn set_goal_form(
    State(state): State<AppState>,
    Form(payload): Form<GoalRequest>,
) -> Result<Redirect, AppError> {
    state
        .controller
        .dispatch(Event::SetGoal { raw: payload.goal })
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn dark_mode(
    State(state): State<AppState>,
    Json(payload): Json<DarkModeRequest>,
) -> Result<Json<Snapshot>, AppError> {
    let event = Event::SetDarkMode {
        enabled: payload.enabled,
    };
    Ok(Json(state.controller.dispatch(event).await?))
}

pub async fn select_panel(
    State(state): State<AppState>,
    Json(payload): Json<PanelRequest>,
) -> Result<Json<Snapshot>, AppError> {
    let event = Event::SelectPanel {
        panel: payload.panel,
    };
    Ok(Json(state.controller.dispatch(event).await?))
}

pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.controller.snapshot().await?;
    let body = history_csv(&snapshot.history)?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
