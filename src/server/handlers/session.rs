//! Studio session API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::{
    catalog::{self, Theme},
    error::StudioError,
    generate::{self, GenerationOutcome},
    server::state::AppState,
    studio::{SelectionTicket, StudioSession, StudioSnapshot},
    surface::{self, InputEvent, PendingLoad, Tool},
};

type ApiError = (StatusCode, String);

/// Largest surface dimension accepted from clients.
const MAX_DIMENSION: u32 = 4096;

/// Most input events accepted in one request.
const MAX_INPUT_BATCH: usize = 256;

/// Session state returned by most endpoints.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub base_loaded: bool,
    #[serde(flatten)]
    pub state: StudioSnapshot,
}

impl SessionView {
    fn of(id: Uuid, session: &StudioSession) -> Self {
        Self {
            id: id.to_string(),
            width: session.surface().width(),
            height: session.surface().height(),
            base_loaded: session.surface().is_base_loaded(),
            state: session.state().snapshot(),
        }
    }
}

/// Request body for session creation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CarouselRequest {
    pub url: String,
}

/// Any subset of brush settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrushRequest {
    pub color: Option<String>,
    pub tool: Option<Tool>,
    pub line_width: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ResizeRequest {
    pub width: u32,
    pub height: u32,
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID".to_string()))
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), ApiError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Dimensions must be between 1 and {}", MAX_DIMENSION),
        ));
    }
    Ok(())
}

/// Run `f` against a live session, refreshing its expiry.
async fn with_session<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut StudioSession) -> R,
) -> Result<R, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, "Session not found or expired".to_string()))?;
    session.touch();
    Ok(f(session))
}

/// Generate in the background and commit the result if still current.
fn spawn_generation(state: Arc<AppState>, id: Uuid, ticket: SelectionTicket, theme: Theme) {
    tokio::spawn(async move {
        let generator = state.generator.clone();
        let flow_theme = theme.clone();
        let flow = tokio::spawn(async move { generate::illustrate(generator.as_ref(), &flow_theme).await });

        // A panicking generator must still end the generating phase
        let outcome = flow.await.unwrap_or_else(|e| {
            warn!(theme = %theme.id, error = %e, "generation task failed, using preview image");
            GenerationOutcome::fallback(&theme, e.to_string())
        });

        let pending = {
            let mut sessions = state.sessions.write().await;
            sessions
                .get_mut(&id)
                .and_then(|session| session.settle(ticket, outcome))
        };
        if let Some(pending) = pending {
            load_base_image(&state, id, pending).await;
        }
    });
}

fn spawn_load(state: Arc<AppState>, id: Uuid, pending: PendingLoad) {
    tokio::spawn(async move { load_base_image(&state, id, pending).await });
}

/// Fetch/decode a base image and paint it. Failures are silent: the surface
/// keeps its background.
async fn load_base_image(state: &AppState, id: Uuid, pending: PendingLoad) {
    let Ok(image) = state.loader.load(pending.image()).await else {
        return;
    };
    let mut sessions = state.sessions.write().await;
    if let Some(session) = sessions.get_mut(&id) {
        session.complete_load(pending.token(), image);
    }
}

/// Encode a raster copy off the async runtime, outside the sessions lock.
async fn encode(raster: RgbaImage) -> Result<Vec<u8>, ApiError> {
    tokio::task::spawn_blocking(move || surface::encode_png(&raster))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// POST /api/sessions - Open a new studio session.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let width = body.width.unwrap_or(state.config.default_width);
    let height = body.height.unwrap_or(state.config.default_height);
    validate_dimensions(width, height)?;

    let id = Uuid::new_v4();
    let session = StudioSession::new(width, height);
    let view = SessionView::of(id, &session);

    state.sessions.write().await.insert(id, session);
    Ok(Json(view))
}

/// GET /api/sessions/:id - Current session state.
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_id(&id)?;
    with_session(&state, id, |s| Json(SessionView::of(id, s))).await
}

/// DELETE /api/sessions/:id - Close a session.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    match state.sessions.write().await.remove(&id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "Session not found or expired".to_string())),
    }
}

/// POST /api/sessions/:id/theme - Select a theme and start generating.
pub async fn select_theme(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ThemeRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_id(&id)?;
    let theme = catalog::theme_by_id(&body.theme_id)
        .ok_or((
            StatusCode::NOT_FOUND,
            format!("Theme '{}' not found", body.theme_id),
        ))?
        .clone();

    let (ticket, view) = with_session(&state, id, |s| {
        let ticket = s.begin_theme(theme.clone());
        (ticket, SessionView::of(id, s))
    })
    .await?;

    spawn_generation(state.clone(), id, ticket, theme);
    Ok(Json(view))
}

/// POST /api/sessions/:id/carousel - Open a carousel page without generating.
pub async fn select_carousel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CarouselRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_id(&id)?;
    if !catalog::CAROUSEL_IMAGES.contains(&body.url.as_str()) {
        return Err((StatusCode::BAD_REQUEST, "Not a carousel image".to_string()));
    }

    let (pending, view) = with_session(&state, id, |s| {
        let pending = s.select_carousel_image(&body.url);
        (pending, SessionView::of(id, s))
    })
    .await?;

    if let Some(pending) = pending {
        spawn_load(state.clone(), id, pending);
    }
    Ok(Json(view))
}

/// POST /api/sessions/:id/gallery - Leave the studio.
pub async fn back_to_gallery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_id(&id)?;
    with_session(&state, id, |s| {
        s.back_to_gallery();
        Json(SessionView::of(id, s))
    })
    .await
}

/// POST /api/sessions/:id/brush - Change color, tool and/or width.
pub async fn brush(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<BrushRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_id(&id)?;
    with_session(&state, id, |s| -> Result<Json<SessionView>, StudioError> {
        if let Some(color) = &body.color {
            s.set_color(color)?;
        }
        if let Some(tool) = body.tool {
            s.set_tool(tool);
        }
        if let Some(width) = body.line_width {
            s.set_line_width(width)?;
        }
        Ok(Json(SessionView::of(id, s)))
    })
    .await?
    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

/// POST /api/sessions/:id/input - Apply a batch of pointer/touch events.
pub async fn input(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(events): Json<Vec<InputEvent>>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if events.len() > MAX_INPUT_BATCH {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("At most {} events per request", MAX_INPUT_BATCH),
        ));
    }
    with_session(&state, id, |s| {
        for event in &events {
            s.handle_input(event);
        }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:id/resize - Container size changed. Strokes are lost.
pub async fn resize(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ResizeRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_id(&id)?;
    validate_dimensions(body.width, body.height)?;
    with_session(&state, id, |s| {
        s.resize(body.width, body.height);
        Json(SessionView::of(id, s))
    })
    .await
}

/// POST /api/sessions/:id/clear - Erase strokes, keep the base image.
pub async fn clear(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    with_session(&state, id, |s| s.clear_drawing()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sessions/:id/preview - Current raster as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let raster = with_session(&state, id, |s| s.surface().raster().clone()).await?;
    let png = encode(raster).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    ))
}

/// GET /api/sessions/:id/print - Current raster as a downloadable PNG page.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let (raster, theme_id) = with_session(&state, id, |s| {
        let theme_id = s
            .state()
            .selected_theme()
            .map(|t| t.id.clone())
            .unwrap_or_else(|| "desenho".to_string());
        (s.surface().raster().clone(), theme_id)
    })
    .await?;
    let png = encode(raster).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"tiabela-{}.png\"", theme_id),
            ),
        ],
        png,
    ))
}
