//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shopzone_core::ProductId;
use thiserror::Error;

use crate::controller::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout failed or could not start.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A product id that is not in the session's catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Checkout(CheckoutError::Rejected(_)) => StatusCode::CONFLICT,
            Self::Checkout(CheckoutError::Submit(_) | CheckoutError::NotAccepted { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Checkout(CheckoutError::Task(_)) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::UnknownProduct(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Checkout(CheckoutError::Task(_)) | Self::Session(_) => {
                "Internal server error".to_string()
            }
            Self::Checkout(CheckoutError::Submit(_)) => {
                "We couldn't reach the order service. Your cart has been kept.".to_string()
            }
            Self::Checkout(CheckoutError::NotAccepted { .. }) => {
                "Your order was not accepted. Your cart has been kept.".to_string()
            }
            Self::Checkout(CheckoutError::Rejected(reason)) => format!("Cannot check out: {reason}"),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
