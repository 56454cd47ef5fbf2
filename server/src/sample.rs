//! Demo content for `--sample-data` runs.

use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use stockroom_auth::{password, policy::MANAGER_GROUP};
use stockroom_common::db::Database;
use stockroom_entity::{asset, asset_attribute, group, user, user_group};
use time::OffsetDateTime;
use uuid::Uuid;

/// Seed an admin account, a manager, and a handful of demo assets.
///
/// Does nothing if the store already holds users.
pub async fn seed(db: &Database) -> anyhow::Result<()> {
    let db = db.connection();

    if user::Entity::find().count(db).await? > 0 {
        tracing::info!("sample data: store is not empty, skipping");
        return Ok(());
    }

    let managers = group::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(MANAGER_GROUP.to_string()),
    }
    .insert(db)
    .await?;

    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set("admin".to_string()),
        password_hash: Set(password::hash("admin")?),
        superuser: Set(true),
    }
    .insert(db)
    .await?;

    let mfoster = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set("mfoster".to_string()),
        password_hash: Set(password::hash("manager")?),
        superuser: Set(false),
    }
    .insert(db)
    .await?;
    user_group::ActiveModel {
        user_id: Set(mfoster.id),
        group_id: Set(managers.id),
    }
    .insert(db)
    .await?;

    let bdavis = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set("bdavis".to_string()),
        password_hash: Set(password::hash("user")?),
        superuser: Set(false),
    }
    .insert(db)
    .await?;

    let demo = [
        (
            "Dell Laptop",
            "Electronics",
            asset::Status::CheckedOut,
            Some(bdavis.id),
            vec![("serial", "5CG1234XYZ"), ("ram", "32 GB")],
        ),
        (
            "Conference Projector",
            "Electronics",
            asset::Status::OutForRepairs,
            None,
            vec![("lamp hours", "1840")],
        ),
        (
            "Office Chair",
            "Furniture",
            asset::Status::Operational,
            None,
            vec![],
        ),
    ];

    let now = OffsetDateTime::now_utc();
    for (name, category, status, assigned_to, attributes) in demo {
        let asset = asset::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            category: Set(category.to_string()),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            depreciation: Set(None),
            assigned_to: Set(assigned_to),
        }
        .insert(db)
        .await?;

        for (attribute, value) in attributes {
            asset_attribute::ActiveModel {
                id: Set(Uuid::new_v4()),
                asset_id: Set(asset.id),
                name: Set(attribute.to_string()),
                value: Set(value.to_string()),
            }
            .insert(db)
            .await?;
        }
    }

    tracing::info!("sample data: seeded demo users (admin/admin) and assets");

    Ok(())
}
