use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use stockroom_auth::AuthError;
use stockroom_common::error::ErrorInformation;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{msg}")]
    BadRequest {
        msg: String,
        details: Option<String>,
    },
}

impl Error {
    pub fn bad_request(msg: impl Into<String>, details: impl Into<Option<String>>) -> Self {
        Self::BadRequest {
            msg: msg.into(),
            details: details.into(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(err) => err.status_code(),
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Auth(err) => err.error_response(),
            Self::Database(err) => {
                tracing::error!("database error: {err}");
                HttpResponse::InternalServerError()
                    .json(ErrorInformation::new("Internal", "internal server error"))
            }
            Self::NotFound(_) => HttpResponse::NotFound().json(ErrorInformation::new(
                "NotFound",
                self,
            )),
            Self::BadRequest { msg, details } => HttpResponse::BadRequest().json(ErrorInformation {
                error: "BadRequest".into(),
                message: msg.clone(),
                details: details.clone(),
            }),
        }
    }
}
