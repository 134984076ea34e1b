use axum::{
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// ModerationError
///
/// Failures produced by the moderation engine. This type carries no HTTP
/// knowledge; `ApiError` maps it onto status codes at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    /// No entity of the given kind has this id.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    /// The entity exists but its current status forbids the transition.
    #[error("{0}")]
    InvalidState(String),

    /// A required field is empty or an enumerated value is unrecognized.
    #[error("{0}")]
    InvalidInput(String),
}

impl ModerationError {
    pub fn user_not_found(id: &str) -> Self {
        ModerationError::NotFound {
            entity: "User",
            id: id.to_string(),
        }
    }

    pub fn listing_not_found(id: &str) -> Self {
        ModerationError::NotFound {
            entity: "Listing",
            id: id.to_string(),
        }
    }
}

/// ApiError
///
/// Every failure a request can end in. Engine errors are wrapped unchanged;
/// the remaining variants are raised by the router before the engine is called.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Moderation(#[from] ModerationError),

    /// The request body could not be decoded into the expected structure.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// An action suffix matched but the path carries no identifier segment.
    #[error("Invalid URL path structure. Expected {0}")]
    InvalidPath(String),

    #[error("404 page not found")]
    RouteNotFound,

    /// The action exists but only accepts the contained method.
    #[error("Only {0} method is allowed")]
    MethodNotAllowed(Method),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Moderation(ModerationError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Moderation(ModerationError::InvalidState(_))
            | ApiError::Moderation(ModerationError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) | ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// Errors are written back as plain text, mirroring the message the client would
/// see from a bare HTTP error. A 405 also carries the `Allow` header.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(status = status.as_u16(), error = %self, "request rejected");

        match &self {
            ApiError::MethodNotAllowed(allowed) => {
                let allow = allowed.to_string();
                (status, [(header::ALLOW, allow)], self.to_string()).into_response()
            }
            _ => (status, self.to_string()).into_response(),
        }
    }
}
