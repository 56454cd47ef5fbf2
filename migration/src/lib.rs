pub use sea_orm_migration::prelude::*;

mod m0000010_create_user;
mod m0000020_create_asset;
mod m0000030_create_asset_attribute;
mod m0000040_create_session;

pub struct Migrator;

impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0000010_create_user::Migration),
            Box::new(m0000020_create_asset::Migration),
            Box::new(m0000030_create_asset_attribute::Migration),
            Box::new(m0000040_create_session::Migration),
        ]
    }
}
