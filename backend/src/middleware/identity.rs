//! Identity middleware
//!
//! Session handling terminates at the upstream gateway, which forwards the
//! caller's identity in trusted headers. This middleware parses those
//! headers and exposes them to handlers; requests that reach the protected
//! routes without them are rejected.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::UserRole;
use uuid::Uuid;

use crate::error::ErrorResponse;

const USER_ID_HEADER: &str = "x-user-id";
const DISTRIBUTOR_ID_HEADER: &str = "x-distributor-id";
const ROLE_HEADER: &str = "x-user-role";

/// Caller identity forwarded by the gateway
#[derive(Clone, Debug)]
pub struct Identity {
    pub user_id: Uuid,
    /// Absent for super-admins, who operate across distributors
    pub distributor_id: Option<Uuid>,
    pub role: UserRole,
}

impl Identity {
    /// The distributor scope this caller may act in
    pub fn require_distributor(&self) -> Result<Uuid, crate::error::AppError> {
        self.distributor_id
            .ok_or_else(|| crate::error::AppError::Unauthorized("Distributor scope required".to_string()))
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Middleware that resolves the gateway identity headers
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers();

    let user_id = match headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
    {
        Some(id) => id,
        None => return unauthorized_response("Missing or invalid user identity header"),
    };

    let role = match headers
        .get(ROLE_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(UserRole::parse)
    {
        Some(role) => role,
        None => return unauthorized_response("Missing or invalid role header"),
    };

    // Distributor scope is mandatory for everyone but super-admins
    let distributor_id = match headers
        .get(DISTRIBUTOR_ID_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => return unauthorized_response("Invalid distributor identity header"),
        },
        None if role == UserRole::SuperAdmin => None,
        None => return unauthorized_response("Missing distributor identity header"),
    };

    let identity = Identity {
        user_id,
        distributor_id,
        role,
    };

    request.extensions_mut().insert(identity);

    next.run(request).await
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: crate::error::ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
            requested: None,
            available: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for the resolved caller identity
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Identity);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Identity required".to_string(),
                        field: None,
                        requested: None,
                        available: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
