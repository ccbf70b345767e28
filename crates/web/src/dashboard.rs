//! Operator dashboard handlers. Every page here requires a session;
//! unauthenticated requests are redirected to the login flow, never
//! rendered.

use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::Utc;
use tracing::{info, warn};

use crate::auth::{self, LoginForm};
use crate::errors::PageError;
use crate::flash::{Flash, FlashParams, FlashRedirect};
use crate::pages::{render, ErrorResponse};
use crate::tables::{self, TableSpec};
use crate::views::{FlashView, MaintenanceView, MetricRowView};
use crate::WebState;

fn login_redirect() -> Response {
    FlashRedirect::to("/dashboard/login").into_response()
}

// ─── Dashboard home ────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    site_title: String,
    open_incidents: usize,
    open_maintenances: usize,
    upcoming_maintenances: usize,
    upcoming: Vec<MaintenanceView>,
}

/// GET /dashboard — open/upcoming counts for the operator.
pub async fn dashboard_home(
    State(state): State<WebState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if !auth::is_authenticated(&headers) {
        return Ok(login_redirect());
    }

    let now = Utc::now();
    let upcoming = state.store.upcoming_maintenances(now);

    let page = render(DashboardTemplate {
        site_title: state.site.title.clone(),
        open_incidents: state.store.open_incidents(false).len(),
        open_maintenances: state.store.open_maintenances().len(),
        upcoming_maintenances: upcoming.len(),
        upcoming: upcoming.iter().map(MaintenanceView::from_maintenance).collect(),
    })?;
    Ok(page.into_response())
}

// ─── Login / logout ────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    site_title: String,
    flash: Option<FlashView>,
}

/// GET /dashboard/login — the login form.
pub async fn login_page(
    State(state): State<WebState>,
    Query(params): Query<FlashParams>,
) -> Result<Response, PageError> {
    let page = render(LoginTemplate {
        site_title: state.site.title.clone(),
        flash: params.into_flash().map(FlashView::from_flash),
    })?;
    Ok(page.into_response())
}

/// POST /dashboard/login — authenticate and establish a session cookie.
pub async fn login(Form(form): Form<LoginForm>) -> Response {
    match auth::authenticate(&form) {
        Ok(token) => {
            info!(user = %form.username, "Dashboard login");
            metrics::counter!("web.logins").increment(1);
            (
                [(header::SET_COOKIE, auth::session_cookie(&token))],
                Redirect::to("/dashboard"),
            )
                .into_response()
        }
        Err(msg) => {
            warn!(user = %form.username, "Dashboard login rejected");
            metrics::counter!("web.login_failures").increment(1);
            FlashRedirect::with("/dashboard/login", Flash::error(msg)).into_response()
        }
    }
}

/// POST /dashboard/logout — clear the session.
pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

// ─── Metrics list ──────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "metrics.html")]
struct MetricsTemplate {
    site_title: String,
    columns: Vec<&'static str>,
    rows: Vec<MetricRowView>,
}

/// GET /dashboard/metrics — metrics list rendered with the declared
/// default-visible columns.
pub async fn metrics_page(
    State(state): State<WebState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if !auth::is_authenticated(&headers) {
        return Ok(login_redirect());
    }

    let spec = tables::metric_table();
    let page = render(MetricsTemplate {
        site_title: state.site.title.clone(),
        columns: spec.default_visible().iter().map(|c| c.label).collect(),
        rows: state
            .store
            .list_metrics()
            .iter()
            .map(MetricRowView::from_metric)
            .collect(),
    })?;
    Ok(page.into_response())
}

/// GET /dashboard/api/tables/metrics — the column spec as JSON, for the
/// table UI.
pub async fn metric_table_spec(
    headers: HeaderMap,
) -> Result<Json<TableSpec>, (StatusCode, Json<ErrorResponse>)> {
    if !auth::is_authenticated(&headers) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "unauthenticated".to_string(),
                message: "A dashboard session is required".to_string(),
            }),
        ));
    }
    Ok(Json(tables::metric_table()))
}
