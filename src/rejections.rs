use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use color_eyre::Report;
use maud::{html, Markup};

use crate::{names, services::policy::CorruptData, views};

#[derive(Debug)]
pub enum AppError {
    Internal(&'static str),
    /// Stored data exists but cannot be read; the detail names the record.
    Corrupt(String),
    Input(&'static str),
    Unauthorized,
    NotFound,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) | AppError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
            AppError::Corrupt(_) => "DATA_CORRUPTED",
            AppError::Input(_) => "INPUT_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let detail = match &self {
            AppError::Internal(detail) | AppError::Input(detail) => Some(*detail),
            AppError::Corrupt(detail) => Some(detail.as_str()),
            _ => None,
        };
        let sign_in = matches!(self, AppError::Unauthorized);
        (self.status(), error_page(self.message(), detail, sign_in)).into_response()
    }
}

fn error_page(message: &str, detail: Option<&str>, sign_in: bool) -> Markup {
    views::page(
        "Error",
        html! {
            h1 { (message) }
            @if let Some(detail) = detail {
                p { (detail) }
            }
            @if sign_in {
                p { a href=(names::LOGIN_URL) { "Sign in as administrator" } }
            }
            a href=(names::HOME_URL) { "Back to the library" }
        },
    )
}

/// Map any error to an [`AppError`], logging the cause. Unreadable stored
/// data is reported as such instead of as a generic failure.
pub trait ResultExt<T> {
    fn reject(self, msg: &'static str) -> Result<T, AppError>;
    fn reject_input(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T, E: Into<Report>> ResultExt<T> for Result<T, E> {
    fn reject(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            let e: Report = e.into();
            tracing::error!("{msg}: {e:#}");
            match e.downcast_ref::<CorruptData>() {
                Some(corrupt) => AppError::Corrupt(corrupt.to_string()),
                None => AppError::Internal(msg),
            }
        })
    }

    fn reject_input(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            let e: Report = e.into();
            tracing::warn!("{msg}: {e:#}");
            AppError::Input(msg)
        })
    }
}
