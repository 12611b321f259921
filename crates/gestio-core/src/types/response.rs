//! Response envelope returned by service operations.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard service response envelope.
///
/// Every exposed operation returns this shape on success. Failures travel
/// as [`AppError`] and are folded into an envelope at the transport
/// boundary with [`ServiceResponse::from_error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// Operation payload, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ServiceResponse<T> {
    /// Build a success envelope with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Build a success envelope without a payload.
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Build a failure envelope from an application error.
    pub fn from_error(err: &AppError) -> Self {
        Self {
            success: false,
            message: err.message.clone(),
            data: None,
        }
    }
}
