use crate::{AuthError, Authenticated, Identity, password};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, Set,
};
use stockroom_entity::{group, session, user};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// How long a login stays valid.
const SESSION_TTL: Duration = Duration::days(14);

/// Session management: issuing, dropping, and resolving login sessions.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthService;

impl AuthService {
    pub fn new() -> Self {
        Self
    }

    /// Check credentials and issue a fresh session.
    pub async fn login(
        &self,
        username: &str,
        provided_password: &str,
        db: &impl ConnectionTrait,
    ) -> Result<(Uuid, Identity), AuthError> {
        let Some(user) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify(provided_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let now = OffsetDateTime::now_utc();
        let session = session::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            created_at: Set(now),
            expires_at: Set(now + SESSION_TTL),
        }
        .insert(db)
        .await?;

        tracing::info!(username, "login");

        let identity = identity_of(user, db).await?;
        Ok((session.id, identity))
    }

    /// Drop a session. Dropping a session which is already gone is fine.
    pub async fn logout(
        &self,
        session: Uuid,
        db: &impl ConnectionTrait,
    ) -> Result<(), AuthError> {
        session::Entity::delete_by_id(session).exec(db).await?;
        Ok(())
    }

    /// Resolve a bearer token into the identity behind it.
    ///
    /// Unknown and expired tokens are indistinguishable from having no
    /// session at all.
    pub async fn resolve(
        &self,
        token: Uuid,
        db: &impl ConnectionTrait,
    ) -> Result<Authenticated, AuthError> {
        let Some((session, Some(user))) = session::Entity::find_by_id(token)
            .find_also_related(user::Entity)
            .one(db)
            .await?
        else {
            return Err(AuthError::Unauthenticated);
        };

        if session.expires_at < OffsetDateTime::now_utc() {
            return Err(AuthError::Unauthenticated);
        }

        let identity = identity_of(user, db).await?;
        Ok(Authenticated::new(identity, session.id))
    }
}

async fn identity_of(
    user: user::Model,
    db: &impl ConnectionTrait,
) -> Result<Identity, AuthError> {
    let groups = user
        .find_related(group::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|group| group.name)
        .collect();

    Ok(Identity {
        id: user.id,
        username: user.username,
        superuser: user.superuser,
        groups,
    })
}
