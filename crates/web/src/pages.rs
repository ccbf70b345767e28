//! Public page handlers — home, subscribe, and the subscriber
//! self-service flows addressed by management key.
//!
//! Lookup failures and wrong-state requests never surface as errors;
//! they become a flash message and a redirect to a safe page.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use statuspage_core::StatusPageError;
use tracing::{info, warn};

use crate::errors::PageError;
use crate::flash::{Flash, FlashParams, FlashRedirect};
use crate::views::{FlashView, GroupView, IncidentView};
use crate::WebState;

const MSG_SUBSCRIBER_NOT_FOUND: &str = "This Subscriber has not been found.";
const MSG_ALREADY_VERIFIED: &str = "This E-Mail is already verified.";
const MSG_VERIFIED: &str = "This E-Mail has been verified.";
const MSG_NOT_VERIFIED: &str = "This E-Mail is not verified.";
const MSG_UNSUBSCRIBED: &str = "Successfully unsubscribed.";

/// Maximum accepted e-mail length (RFC 5321 path limit).
const MAX_EMAIL_LEN: usize = 254;

pub(crate) fn render<T: Template>(tmpl: T) -> Result<Html<String>, PageError> {
    let body = tmpl
        .render()
        .map_err(|e| StatusPageError::Template(e.to_string()))?;
    Ok(Html(body))
}

fn manage_path(key: &str) -> String {
    format!("/subscribers/{key}/manage")
}

// ─── Home ──────────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    site_title: String,
    flash: Option<FlashView>,
    all_operational: bool,
    groups: Vec<GroupView>,
    open_incidents: Vec<IncidentView>,
    resolved_incidents: Vec<IncidentView>,
}

/// GET / — the public landing page.
pub async fn home(
    State(state): State<WebState>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, PageError> {
    let groups = state
        .store
        .visible_component_groups()
        .iter()
        .map(|g| GroupView::from_group(g, &state.store))
        .collect();
    let open_incidents = state
        .store
        .open_incidents(true)
        .iter()
        .map(IncidentView::from_incident)
        .collect();
    let resolved_incidents = state
        .store
        .resolved_incidents(true)
        .iter()
        .map(IncidentView::from_incident)
        .collect();

    render(HomeTemplate {
        site_title: state.site.title.clone(),
        flash: params.into_flash().map(FlashView::from_flash),
        all_operational: state.store.all_operational(),
        groups,
        open_incidents,
        resolved_incidents,
    })
}

// ─── Subscribe ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub email: String,
    /// Links an external mailer would deliver to the subscriber.
    pub verify_url: String,
    pub manage_url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// POST /subscribers — create an unverified subscriber and hand back the
/// management links. Email delivery is an external collaborator.
pub async fn subscribe(
    State(state): State<WebState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscribeResponse>), (StatusCode, Json<ErrorResponse>)> {
    let email = req.email.trim();
    if !email.contains('@') || email.len() > MAX_EMAIL_LEN {
        warn!(email_len = email.len(), "Rejected subscribe request");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "invalid_email".to_string(),
                message: "A valid e-mail address is required".to_string(),
            }),
        ));
    }

    let subscriber = state.store.create_subscriber(email.to_string());
    metrics::counter!("web.subscribers.created").increment(1);
    info!(subscriber_id = %subscriber.id, "Subscriber created");

    let base = state.site.public_url.trim_end_matches('/');
    Ok((
        StatusCode::CREATED,
        Json(SubscribeResponse {
            email: subscriber.email,
            verify_url: format!(
                "{base}/subscribers/{}/verify",
                subscriber.management_key
            ),
            manage_url: format!(
                "{base}/subscribers/{}/manage",
                subscriber.management_key
            ),
        }),
    ))
}

// ─── Verify ────────────────────────────────────────────────────────────────

/// GET /subscribers/:key/verify — mark the subscriber's e-mail verified.
pub async fn subscriber_verify(
    State(state): State<WebState>,
    Path(key): Path<String>,
) -> FlashRedirect {
    use statuspage_store::VerifyOutcome;

    match state.store.verify_subscriber(&key) {
        VerifyOutcome::NotFound => {
            FlashRedirect::with("/", Flash::error(MSG_SUBSCRIBER_NOT_FOUND))
        }
        VerifyOutcome::AlreadyVerified => {
            FlashRedirect::with(manage_path(&key), Flash::error(MSG_ALREADY_VERIFIED))
        }
        VerifyOutcome::Verified(subscriber) => {
            metrics::counter!("web.subscribers.verified").increment(1);
            info!(subscriber_id = %subscriber.id, "Subscriber e-mail verified");
            FlashRedirect::with(manage_path(&key), Flash::success(MSG_VERIFIED))
        }
    }
}

// ─── Manage ────────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "subscriber_manage.html")]
struct ManageTemplate {
    site_title: String,
    flash: Option<FlashView>,
    email: String,
    verified_at: String,
    unsubscribe_path: String,
}

/// GET /subscribers/:key/manage — the subscriber self-service page.
pub async fn subscriber_manage(
    State(state): State<WebState>,
    Path(key): Path<String>,
    Query(params): Query<FlashParams>,
) -> Result<Response, PageError> {
    let Some(subscriber) = state.store.subscriber_by_management_key(&key) else {
        return Ok(
            FlashRedirect::with("/", Flash::error(MSG_SUBSCRIBER_NOT_FOUND)).into_response(),
        );
    };
    let Some(verified_at) = subscriber.email_verified_at else {
        return Ok(FlashRedirect::with("/", Flash::error(MSG_NOT_VERIFIED)).into_response());
    };

    let page = render(ManageTemplate {
        site_title: state.site.title.clone(),
        flash: params.into_flash().map(FlashView::from_flash),
        email: subscriber.email,
        verified_at: verified_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        unsubscribe_path: format!("/subscribers/{key}/unsubscribe"),
    })?;
    Ok(page.into_response())
}

// ─── Unsubscribe ───────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "subscriber_unsubscribe.html")]
struct UnsubscribeTemplate {
    site_title: String,
    email: String,
    unsubscribe_path: String,
}

/// GET /subscribers/:key/unsubscribe — confirmation page.
pub async fn unsubscribe_page(
    State(state): State<WebState>,
    Path(key): Path<String>,
) -> Result<Response, PageError> {
    let Some(subscriber) = state.store.subscriber_by_management_key(&key) else {
        return Ok(
            FlashRedirect::with("/", Flash::error(MSG_SUBSCRIBER_NOT_FOUND)).into_response(),
        );
    };
    if !subscriber.is_verified() {
        return Ok(FlashRedirect::with("/", Flash::error(MSG_NOT_VERIFIED)).into_response());
    }

    let page = render(UnsubscribeTemplate {
        site_title: state.site.title.clone(),
        email: subscriber.email,
        unsubscribe_path: format!("/subscribers/{key}/unsubscribe"),
    })?;
    Ok(page.into_response())
}

/// POST /subscribers/:key/unsubscribe — delete the subscriber record.
pub async fn unsubscribe(State(state): State<WebState>, Path(key): Path<String>) -> FlashRedirect {
    let Some(subscriber) = state.store.subscriber_by_management_key(&key) else {
        return FlashRedirect::with("/", Flash::error(MSG_SUBSCRIBER_NOT_FOUND));
    };
    if !subscriber.is_verified() {
        return FlashRedirect::with("/", Flash::error(MSG_NOT_VERIFIED));
    }

    state.store.delete_subscriber(&key);
    metrics::counter!("web.subscribers.deleted").increment(1);
    info!(subscriber_id = %subscriber.id, "Subscriber unsubscribed");
    FlashRedirect::with("/", Flash::success(MSG_UNSUBSCRIBED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use statuspage_core::config::SiteConfig;
    use statuspage_store::StatusStore;
    use std::sync::Arc;

    fn test_state() -> WebState {
        WebState::new(Arc::new(StatusStore::empty()), SiteConfig::default())
    }

    fn location(resp: &Response) -> String {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn home_renders() {
        let state = WebState::new(Arc::new(StatusStore::new()), SiteConfig::default());
        let resp = home(State(state), Query(FlashParams::default()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn verify_unknown_key_redirects_home_with_error() {
        let state = test_state();
        let resp = subscriber_verify(State(state), Path("missing".to_string()))
            .await
            .into_response();
        assert!(resp.status().is_redirection());
        let loc = location(&resp);
        assert!(loc.starts_with("/?"));
        assert!(loc.contains("flash_level=error"));
    }

    #[tokio::test]
    async fn verify_sets_timestamp_then_rejects_repeat() {
        let state = test_state();
        let subscriber = state.store.create_subscriber("a@example.com".to_string());
        let key = subscriber.management_key.clone();

        let resp = subscriber_verify(State(state.clone()), Path(key.clone()))
            .await
            .into_response();
        let loc = location(&resp);
        assert!(loc.contains("/manage"));
        assert!(loc.contains("flash_level=success"));
        assert!(state
            .store
            .subscriber_by_management_key(&key)
            .unwrap()
            .is_verified());

        // Second verify: error flash, still redirected to manage
        let resp = subscriber_verify(State(state), Path(key)).await.into_response();
        let loc = location(&resp);
        assert!(loc.contains("/manage"));
        assert!(loc.contains("flash_level=error"));
    }

    #[tokio::test]
    async fn manage_requires_verified_subscriber() {
        let state = test_state();
        let subscriber = state.store.create_subscriber("a@example.com".to_string());
        let key = subscriber.management_key.clone();

        // Unverified: bounced home
        let resp = subscriber_manage(
            State(state.clone()),
            Path(key.clone()),
            Query(FlashParams::default()),
        )
        .await
        .unwrap();
        assert!(resp.status().is_redirection());
        assert!(location(&resp).starts_with("/?"));

        // Verified: renders
        state.store.verify_subscriber(&key);
        let resp = subscriber_manage(State(state), Path(key), Query(FlashParams::default()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn manage_unknown_key_redirects_home() {
        let state = test_state();
        let resp = subscriber_manage(
            State(state),
            Path("missing".to_string()),
            Query(FlashParams::default()),
        )
        .await
        .unwrap();
        assert!(resp.status().is_redirection());
        assert!(location(&resp).starts_with("/?"));
    }

    #[tokio::test]
    async fn unsubscribe_post_deletes_record() {
        let state = test_state();
        let subscriber = state.store.create_subscriber("a@example.com".to_string());
        let key = subscriber.management_key.clone();
        state.store.verify_subscriber(&key);

        let resp = unsubscribe(State(state.clone()), Path(key.clone()))
            .await
            .into_response();
        let loc = location(&resp);
        assert!(loc.starts_with("/?"));
        assert!(loc.contains("flash_level=success"));
        assert!(state.store.subscriber_by_management_key(&key).is_none());
    }

    #[tokio::test]
    async fn unsubscribe_page_guards_match_manage() {
        let state = test_state();
        let resp = unsubscribe_page(State(state.clone()), Path("missing".to_string()))
            .await
            .unwrap();
        assert!(resp.status().is_redirection());

        let subscriber = state.store.create_subscriber("a@example.com".to_string());
        let key = subscriber.management_key.clone();
        state.store.verify_subscriber(&key);
        let resp = unsubscribe_page(State(state), Path(key)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn subscribe_creates_and_links() {
        let state = test_state();
        let (status, Json(resp)) = subscribe(
            State(state.clone()),
            Json(SubscribeRequest {
                email: "ops@example.com".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(resp.verify_url.contains("/verify"));
        assert!(resp.manage_url.contains("/manage"));
        assert_eq!(state.store.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn subscribe_rejects_bad_email() {
        let state = test_state();
        let result = subscribe(
            State(state.clone()),
            Json(SubscribeRequest {
                email: "not-an-email".to_string(),
            }),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(state.store.subscriber_count(), 0);
    }
}
