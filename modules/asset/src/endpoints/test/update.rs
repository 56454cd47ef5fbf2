use super::{Create, Update, attribute_pairs, get_asset};
use crate::test::caller;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::json;
use stockroom_test_context::StockroomContext;
use test_context::test_context;

#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn update_fields(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let manager = ctx.manager("alice").await?;

    let created = Create::new(&manager, "Dell Laptop")
        .category("Electronics")
        .execute(&app)
        .await?
        .expect("must have a result");

    Update::new(&manager, &created.id, "Dell Laptop 13\"")
        .category("Computers")
        .status("out_for_repairs")
        .depreciation("2031-01-01")
        .execute(&app)
        .await?;

    let asset = get_asset(&app, &manager, &created.id).await;
    assert_eq!(asset["name"], json!("Dell Laptop 13\""));
    assert_eq!(asset["category"], json!("Computers"));
    assert_eq!(asset["status"], json!("out_for_repairs"));
    assert_eq!(asset["depreciation"], json!("2031-01-01"));

    Ok(())
}

/// Inline-form attribute rows: keep and edit one, delete one, add one.
#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn update_attribute_rows(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let manager = ctx.manager("alice").await?;

    let created = Create::new(&manager, "Dell Laptop")
        .attribute("serial", "SN-1234")
        .attribute("color", "black")
        .execute(&app)
        .await?
        .expect("must have a result");

    let asset = get_asset(&app, &manager, &created.id).await;
    let rows = asset["attributes"].as_array().expect("must be an array");
    let id_of = |name: &str| {
        rows.iter()
            .find(|row| row["name"] == json!(name))
            .map(|row| row["id"].clone())
            .expect("attribute must exist")
    };

    Update::new(&manager, &created.id, "Dell Laptop")
        .attribute_row(json!({"id": id_of("serial"), "name": "serial", "value": "SN-5678"}))
        .attribute_row(json!({"id": id_of("color"), "name": "color", "value": "black", "delete": true}))
        .attribute_row(json!({"name": "warranty", "value": "2 years"}))
        .execute(&app)
        .await?;

    let asset = get_asset(&app, &manager, &created.id).await;
    assert_eq!(
        attribute_pairs(&asset),
        vec![
            ("serial".to_string(), "SN-5678".to_string()),
            ("warranty".to_string(), "2 years".to_string()),
        ]
    );

    Ok(())
}

/// A failing row rejects the whole submission; nothing sticks.
#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn update_is_atomic(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let manager = ctx.manager("alice").await?;

    let created = Create::new(&manager, "Dell Laptop")
        .attribute("serial", "SN-1234")
        .execute(&app)
        .await?
        .expect("must have a result");

    // the first row would insert fine, the second refers to a foreign attribute
    Update::new(&manager, &created.id, "Renamed")
        .attribute_row(json!({"name": "warranty", "value": "2 years"}))
        .attribute_row(json!({
            "id": uuid::Uuid::new_v4().to_string(),
            "name": "serial",
            "value": "SN-9999",
        }))
        .expect_status(StatusCode::BAD_REQUEST)
        .execute(&app)
        .await?;

    let asset = get_asset(&app, &manager, &created.id).await;
    assert_eq!(asset["name"], json!("Dell Laptop"));
    assert_eq!(
        attribute_pairs(&asset),
        vec![("serial".to_string(), "SN-1234".to_string())]
    );

    Ok(())
}

/// An empty name is rejected and the stored fields stay untouched.
#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn update_with_empty_name(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let manager = ctx.manager("alice").await?;

    let created = Create::new(&manager, "Dell Laptop")
        .category("Electronics")
        .execute(&app)
        .await?
        .expect("must have a result");

    Update::new(&manager, &created.id, "")
        .category("Computers")
        .expect_status(StatusCode::BAD_REQUEST)
        .execute(&app)
        .await?;

    let asset = get_asset(&app, &manager, &created.id).await;
    assert_eq!(asset["name"], json!("Dell Laptop"));
    assert_eq!(asset["category"], json!("Electronics"));

    Ok(())
}

/// Being the assignee grants viewing, not managing.
#[test_context(StockroomContext)]
#[rstest]
#[case::superuser(true, &[], StatusCode::NO_CONTENT)]
#[case::manager(false, &["manager"], StatusCode::NO_CONTENT)]
#[case::assignee(false, &[], StatusCode::FORBIDDEN)]
#[test_log::test(actix_web::test)]
async fn update_requires_manage(
    ctx: &StockroomContext,
    #[case] superuser: bool,
    #[case] groups: &[&str],
    #[case] expected_status: StatusCode,
) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let manager = ctx.manager("alice").await?;
    let actor = ctx.user_with("bob", superuser, groups).await?;

    let created = Create::new(&manager, "Dell Laptop")
        .assigned_to(&actor)
        .execute(&app)
        .await?
        .expect("must have a result");

    Update::new(&actor, &created.id, "Renamed")
        .assigned_to(&actor)
        .expect_status(expected_status)
        .execute(&app)
        .await?;

    Ok(())
}

#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn update_unknown_asset(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let manager = ctx.manager("alice").await?;

    Update::new(&manager, uuid::Uuid::new_v4().to_string(), "Renamed")
        .expect_status(StatusCode::NOT_FOUND)
        .execute(&app)
        .await?;

    Ok(())
}
