#![warn(clippy::unwrap_used)]

//! Web surface for the status page — public pages, subscriber
//! self-service flows, and the operator dashboard.
//!
//! Pages are server-rendered with Askama; state lives in
//! `statuspage-store`.

pub mod auth;
pub mod dashboard;
pub mod errors;
pub mod flash;
pub mod pages;
pub mod router;
pub mod tables;
pub mod views;

use statuspage_core::config::SiteConfig;
use statuspage_store::StatusStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct WebState {
    pub store: Arc<StatusStore>,
    pub site: SiteConfig,
    pub start_time: Instant,
}

impl WebState {
    pub fn new(store: Arc<StatusStore>, site: SiteConfig) -> Self {
        Self {
            store,
            site,
            start_time: Instant::now(),
        }
    }
}

pub use router::web_router;
