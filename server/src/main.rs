mod sample;

use actix_web::{App, HttpServer, middleware, web};
use clap::Parser;
use stockroom_common::db::Database;
use stockroom_migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;
use utoipa_actix_web::AppExt;

/// Run the stockroom API server
#[derive(clap::Parser, Debug)]
#[command(name = "stockroomd", version, about = "Asset tracking service")]
pub struct Run {
    /// The address to bind to
    #[arg(long, env = "STOCKROOM_BIND", default_value = "[::1]:8080")]
    pub bind: String,

    /// Database connection URL
    #[arg(
        long,
        env = "STOCKROOM_DATABASE_URL",
        default_value = "sqlite://stockroom.db?mode=rwc"
    )]
    pub database_url: String,

    /// Inject an admin user and a few demo assets during startup
    #[arg(long, env = "STOCKROOM_SAMPLE_DATA")]
    pub sample_data: bool,
}

impl Run {
    async fn run(self) -> anyhow::Result<()> {
        let db = Database::connect(&self.database_url).await?;
        Migrator::up(db.connection(), None).await?;

        if self.sample_data {
            sample::seed(&db).await?;
        }

        tracing::info!("listening on {}", self.bind);

        let bind = self.bind.clone();
        HttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .into_utoipa_app()
                .service(utoipa_actix_web::scope("/api/v1").configure(|svc| {
                    stockroom_auth::endpoints::configure(svc, db.clone());
                    stockroom_module_asset::endpoints::configure(svc, db.clone());
                }))
                .openapi_service(|api| {
                    web::resource("/openapi.json").route(web::get().to(move || {
                        let api = api.clone();
                        async move { web::Json(api) }
                    }))
                })
                .into_app()
        })
        .bind(bind)?
        .run()
        .await?;

        Ok(())
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Run::parse().run().await
}
