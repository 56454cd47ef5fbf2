use crate::{AuthError, policy::MANAGER_GROUP, service::AuthService};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;
use std::ops::Deref;
use stockroom_common::db::Database;
use uuid::Uuid;

/// Cookie fallback for clients which cannot set an `Authorization` header.
pub const SESSION_COOKIE: &str = "session";

/// A snapshot of who is making the request.
///
/// Built fresh from the store on every request; holding on to it across
/// requests would cache authorization inputs, which the policy forbids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub superuser: bool,
    pub groups: Vec<String>,
}

impl Identity {
    pub fn is_manager(&self) -> bool {
        self.groups.iter().any(|group| group == MANAGER_GROUP)
    }
}

/// Extractor proving that the request carries a valid, unexpired session.
///
/// Rejecting requests without one is what turns into the redirect-to-login
/// response, see [`AuthError::Unauthenticated`].
#[derive(Clone, Debug)]
pub struct Authenticated {
    pub identity: Identity,
    session: Uuid,
}

impl Authenticated {
    pub(crate) fn new(identity: Identity, session: Uuid) -> Self {
        Self { identity, session }
    }

    /// The session token the request authenticated with.
    pub fn session(&self) -> Uuid {
        self.session
    }
}

impl Deref for Authenticated {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.identity
    }
}

impl FromRequest for Authenticated {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let Some(db) = req.app_data::<web::Data<Database>>() else {
                return Err(AuthError::Internal(
                    "authentication store not configured".into(),
                ));
            };

            let token = session_token(&req).ok_or(AuthError::Unauthenticated)?;
            let token = Uuid::parse_str(&token).map_err(|_| AuthError::Unauthenticated)?;

            AuthService::new().resolve(token, db.connection()).await
        })
    }
}

/// Bearer token first, session cookie second.
fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    req.cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}
