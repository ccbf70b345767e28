//! Redirect-with-flash-message plumbing.
//!
//! A flash travels in the redirect target's query string; the receiving
//! page reads it back out of `FlashParams` and renders a one-time banner.
//! No server-side session state is involved.

use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashLevel::Success),
            "error" => Some(FlashLevel::Error),
            _ => None,
        }
    }
}

/// A one-time user-facing notification attached to a redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// A redirect response, optionally carrying a flash for the target page.
#[derive(Debug, Clone)]
pub struct FlashRedirect {
    pub target: String,
    pub flash: Option<Flash>,
}

impl FlashRedirect {
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            flash: None,
        }
    }

    pub fn with(target: impl Into<String>, flash: Flash) -> Self {
        Self {
            target: target.into(),
            flash: Some(flash),
        }
    }

    /// The final Location value, flash encoded into the query string.
    pub fn location(&self) -> String {
        match &self.flash {
            None => self.target.clone(),
            Some(flash) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("flash", &flash.message)
                    .append_pair("flash_level", flash.level.as_str())
                    .finish();
                let sep = if self.target.contains('?') { '&' } else { '?' };
                format!("{}{}{}", self.target, sep, query)
            }
        }
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location()).into_response()
    }
}

/// Query parameters a page accepts to display an inbound flash.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlashParams {
    pub flash: Option<String>,
    pub flash_level: Option<String>,
}

impl FlashParams {
    /// Reconstruct the flash, defaulting unknown levels to success.
    pub fn into_flash(self) -> Option<Flash> {
        let message = self.flash?;
        let level = self
            .flash_level
            .as_deref()
            .and_then(FlashLevel::parse)
            .unwrap_or(FlashLevel::Success);
        Some(Flash { level, message })
    }
}
