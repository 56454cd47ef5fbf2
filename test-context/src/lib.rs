#![allow(clippy::expect_used)]

pub mod call;

use anyhow::Context;
use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectOptions, EntityTrait, QueryFilter, Set};
use stockroom_common::db::Database;
use stockroom_entity::{group, session, user, user_group};
use stockroom_migration::{Migrator, MigratorTrait};
use test_context::AsyncTestContext;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// The password every fixture user logs in with.
pub const TEST_PASSWORD: &str = "stockroom";

/// A fresh, fully migrated database per test.
pub struct StockroomContext {
    pub db: Database,
}

impl StockroomContext {
    async fn new() -> anyhow::Result<Self> {
        // a single connection keeps the in-memory database alive and shared
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect_with(options).await?;
        Migrator::up(db.connection(), None).await?;

        Ok(Self { db })
    }

    /// A user with no special rights.
    pub async fn user(&self, username: &str) -> anyhow::Result<TestUser> {
        self.user_with(username, false, &[]).await
    }

    pub async fn superuser(&self, username: &str) -> anyhow::Result<TestUser> {
        self.user_with(username, true, &[]).await
    }

    /// A member of the manager group.
    pub async fn manager(&self, username: &str) -> anyhow::Result<TestUser> {
        self.user_with(username, false, &["manager"]).await
    }

    /// Create a user with a live session.
    pub async fn user_with(
        &self,
        username: &str,
        superuser: bool,
        groups: &[&str],
    ) -> anyhow::Result<TestUser> {
        let db = self.db.connection();

        let id = Uuid::new_v4();
        user::ActiveModel {
            id: Set(id),
            username: Set(username.to_string()),
            password_hash: Set(hash_password(TEST_PASSWORD)?),
            superuser: Set(superuser),
        }
        .insert(db)
        .await?;

        for name in groups {
            let group = match group::Entity::find()
                .filter(group::Column::Name.eq(*name))
                .one(db)
                .await?
            {
                Some(group) => group,
                None => {
                    group::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        name: Set(name.to_string()),
                    }
                    .insert(db)
                    .await?
                }
            };

            user_group::ActiveModel {
                user_id: Set(id),
                group_id: Set(group.id),
            }
            .insert(db)
            .await?;
        }

        let now = OffsetDateTime::now_utc();
        let session = session::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(id),
            created_at: Set(now),
            expires_at: Set(now + Duration::hours(1)),
        }
        .insert(db)
        .await?;

        Ok(TestUser {
            id,
            username: username.to_string(),
            token: session.id.to_string(),
        })
    }

    /// Create an already expired session for a user.
    pub async fn expired_session(&self, user: &TestUser) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let session = session::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            created_at: Set(now - Duration::hours(2)),
            expires_at: Set(now - Duration::hours(1)),
        }
        .insert(self.db.connection())
        .await?;

        Ok(session.id.to_string())
    }
}

impl AsyncTestContext for StockroomContext {
    async fn setup() -> Self {
        Self::new().await.expect("failed to set up test database")
    }
}

/// A fixture user, logged in.
#[derive(Clone, Debug)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    /// Session token, ready for use as a bearer token.
    pub token: String,
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .ok()
        .context("hashing failed")?
        .to_string())
}
