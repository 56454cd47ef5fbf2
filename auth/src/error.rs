use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header},
};
use sea_orm::DbErr;
use std::borrow::Cow;
use stockroom_common::error::ErrorInformation;

/// Where unauthenticated requests get sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable session; the client is redirected to the login page.
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid credentials")]
    InvalidCredentials,

    /// Authenticated, but the access policy said no.
    #[error("forbidden: {0}")]
    Forbidden(Cow<'static, str>),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::FOUND,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Crypto(_) | Self::Internal(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Unauthenticated => HttpResponse::Found()
                .append_header((header::LOCATION, LOGIN_PATH))
                .finish(),
            Self::InvalidCredentials => {
                HttpResponse::Unauthorized().json(ErrorInformation::new("InvalidCredentials", self))
            }
            Self::Forbidden(_) => {
                HttpResponse::Forbidden().json(ErrorInformation::new("Forbidden", self))
            }
            Self::Crypto(_) | Self::Internal(_) | Self::Database(_) => {
                tracing::error!("internal error during authentication: {self}");
                HttpResponse::InternalServerError()
                    .json(ErrorInformation::new("Internal", "internal server error"))
            }
        }
    }
}
