use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    dashboard::{Dashboard, DashboardView},
    error::DashboardError,
    selection::{resolve_selection, UrlState},
    session::SessionId,
};

pub const SESSION_COOKIE: &str = "wells_session";

const INDEX_HTML: &str = include_str!("assets/index.html");
const STYLES_CSS: &str = include_str!("assets/styles.css");
const APP_JS: &str = include_str!("assets/app.js");

#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
}

pub struct WebServerConfig {
    pub dashboard: Dashboard,
    pub host: String,
    pub port: u16,
}

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/healthz", get(healthz))
        .route("/api/dashboard", get(dashboard_view))
        .route("/api/session", delete(end_session))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { dashboard })
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        dashboard,
        host,
        port,
    } = config;

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!(
        seed = dashboard.sessions().master_seed(),
        "dashboard live at http://{addr} (Ctrl+C to stop)"
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router(Arc::new(dashboard)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down dashboard");
}

/// Serves the page shell. A request without `gov` is redirected to the URL
/// carrying the default, so the address bar always names the selection.
async fn index(Query(params): Query<HashMap<String, String>>) -> Response {
    let mut url_state = UrlState::from(params);
    let requested = url_state.clone();
    resolve_selection(&mut url_state);
    if url_state != requested {
        return match url_state.to_query_string() {
            Ok(query) => Redirect::to(&format!("/?{query}")).into_response(),
            Err(err) => {
                error!("failed to encode query string: {err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }
    Html(INDEX_HTML).into_response()
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    )
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn dashboard_view(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<HashMap<String, String>>,
) -> Result<(CookieJar, Json<DashboardView>), ApiError> {
    let now = Utc::now();
    let sessions = state.dashboard.sessions();
    sessions.evict_idle(now)?;

    let requested = session_from(&jar);
    let session = sessions.open(requested, now)?;
    let mut url_state = UrlState::from(params);
    let view = state.dashboard.evaluate(session, &mut url_state)?;

    let jar = if requested == Some(session) {
        jar
    } else {
        jar.add(session_cookie(session))
    };
    Ok((jar, Json(view)))
}

async fn end_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    if let Some(session) = session_from(&jar) {
        state.dashboard.sessions().end(session)?;
    }
    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    ))
}

fn session_from(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn session_cookie(session: SessionId) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[derive(Debug)]
struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(value: DashboardError) -> Self {
        ApiError(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("dashboard failed to render: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
