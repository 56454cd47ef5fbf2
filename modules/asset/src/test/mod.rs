use actix_web::App;
use stockroom_test_context::{StockroomContext, call::CallService};
use utoipa_actix_web::AppExt;

/// Build the service under test, wired the same way the server wires it.
pub async fn caller(ctx: &StockroomContext) -> anyhow::Result<impl CallService> {
    let (app, _openapi) = App::new()
        .into_utoipa_app()
        .service(utoipa_actix_web::scope("/api/v1").configure(|svc| {
            stockroom_auth::endpoints::configure(svc, ctx.db.clone());
            crate::endpoints::configure(svc, ctx.db.clone());
        }))
        .split_for_parts();

    Ok(actix_web::test::init_service(app).await)
}
