use serde::Deserialize;
use thiserror::Error;

/// Body of an ORS failure: `{"error": {"code": 2010, "message": "..."}}`.
#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    code: u32,
    #[serde(default)]
    message: String,
}

/// ORS codes meaning "nothing to route", as opposed to a broken request.
const ROUTE_NOT_FOUND: u32 = 2009;
const POINT_NOT_FOUND: u32 = 2010;

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("API Error (Code {code}): {message}")]
    ApiError { code: u32, message: String },

    // A fallback for when we get an error that isn't in the expected JSON format
    #[error("Unstructured API Error (HTTP {status}): {body}")]
    RawApiError { status: u16, body: String },

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl RoutingError {
    /// Builds the error for a non-success response body.
    pub fn from_response(status: u16, body: String) -> Self {
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(payload) => RoutingError::ApiError {
                code: payload.error.code,
                message: payload.error.message,
            },
            Err(_) => RoutingError::RawApiError { status, body },
        }
    }

    /// True when the provider answered but found no route between the points.
    pub fn is_no_route(&self) -> bool {
        matches!(
            self,
            RoutingError::ApiError { code, .. } if *code == ROUTE_NOT_FOUND || *code == POINT_NOT_FOUND
        )
    }
}
