#[cfg(test)]
mod test;

use crate::{
    Error,
    model::{AssetDetails, AssetHead, AssetQuery, AssetRequest, AssignRequest},
    service::AssetService,
};
use actix_web::{
    HttpRequest, HttpResponse, Responder, delete, get, http::header, post, put, web,
};
use serde_json::json;
use stockroom_auth::Authenticated;
use stockroom_common::{
    db::Database,
    model::{Paginated, PaginatedResults},
};

pub fn configure(config: &mut utoipa_actix_web::service_config::ServiceConfig, db: Database) {
    let service = AssetService::new();

    config
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(service))
        .service(list)
        // must come before the `{id}` routes
        .service(categories)
        .service(create)
        .service(read)
        .service(update)
        .service(delete)
        .service(duplicate_prefill)
        .service(duplicate)
        .service(assign);
}

#[utoipa::path(
    tag = "asset",
    operation_id = "listAssets",
    params(
        AssetQuery,
        Paginated,
    ),
    responses(
        (status = 200, description = "The assets visible to the user", body = PaginatedResults<AssetHead>),
        (status = 302, description = "The user was not authenticated"),
    )
)]
#[get("/asset")]
/// List assets, most recently created first
async fn list(
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
    web::Query(filters): web::Query<AssetQuery>,
    web::Query(paginated): web::Query<Paginated>,
) -> Result<impl Responder, Error> {
    let result = service
        .list(&auth, &filters, paginated, db.connection())
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    tag = "asset",
    operation_id = "listAssetCategories",
    responses(
        (status = 200, description = "The distinct categories of visible assets", body = [String]),
        (status = 302, description = "The user was not authenticated"),
    )
)]
#[get("/asset/category")]
/// List the categories in use, for filter drop-downs
async fn categories(
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
) -> Result<impl Responder, Error> {
    let result = service.categories(&auth, db.connection()).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    tag = "asset",
    operation_id = "createAsset",
    request_body = AssetRequest,
    responses(
        (
            status = 201, description = "Created the asset",
            headers(
                ("location" = String, description = "The relative URL to the created asset")
            )
        ),
        (status = 400, description = "The request was not valid"),
        (status = 302, description = "The user was not authenticated"),
        (status = 403, description = "The user authenticated, but is not authorized to create assets"),
    )
)]
#[post("/asset")]
/// Create a new asset
async fn create(
    req: HttpRequest,
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
    web::Json(request): web::Json<AssetRequest>,
) -> Result<impl Responder, Error> {
    let id = db
        .transaction(async |tx| service.create(&auth, request, tx).await)
        .await?;

    Ok(HttpResponse::Created()
        .append_header((header::LOCATION, format!("{}/{}", req.path(), id)))
        .json(json!({"id": id})))
}

#[utoipa::path(
    tag = "asset",
    operation_id = "readAsset",
    params(
        ("id", Path, description = "The ID of the asset to read"),
    ),
    responses(
        (status = 200, description = "The asset was found and returned", body = AssetDetails),
        (status = 302, description = "The user was not authenticated"),
        (status = 403, description = "The user authenticated, but may not view this asset"),
        (status = 404, description = "The asset was not found"),
    )
)]
#[get("/asset/{id}")]
/// Read an asset, including its attributes
async fn read(
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
    id: web::Path<String>,
) -> Result<impl Responder, Error> {
    match service.read(&auth, &id, db.connection()).await? {
        Some(details) => Ok(HttpResponse::Ok().json(details)),
        None => Err(Error::NotFound(id.into_inner())),
    }
}

#[utoipa::path(
    tag = "asset",
    operation_id = "updateAsset",
    request_body = AssetRequest,
    params(
        ("id", Path, description = "The ID of the asset to update"),
    ),
    responses(
        (status = 204, description = "The asset was updated"),
        (status = 400, description = "The request was not valid"),
        (status = 302, description = "The user was not authenticated"),
        (status = 403, description = "The user authenticated, but may not manage this asset"),
        (status = 404, description = "The asset was not found"),
    )
)]
#[put("/asset/{id}")]
/// Update an asset and its attributes
async fn update(
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
    id: web::Path<String>,
    web::Json(request): web::Json<AssetRequest>,
) -> Result<impl Responder, Error> {
    db.transaction(async |tx| service.update(&auth, &id, request, tx).await)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    tag = "asset",
    operation_id = "deleteAsset",
    params(
        ("id", Path, description = "The ID of the asset to delete"),
    ),
    responses(
        (status = 204, description = "The asset and its attributes were deleted"),
        (status = 302, description = "The user was not authenticated"),
        (status = 403, description = "The user authenticated, but may not manage this asset"),
        (status = 404, description = "The asset was not found"),
    )
)]
#[delete("/asset/{id}")]
/// Delete an asset
async fn delete(
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
    id: web::Path<String>,
) -> Result<impl Responder, Error> {
    db.transaction(async |tx| service.delete(&auth, &id, tx).await)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    tag = "asset",
    operation_id = "duplicateAssetPrefill",
    params(
        ("id", Path, description = "The ID of the asset to duplicate"),
    ),
    responses(
        (status = 200, description = "A creation request pre-filled from the asset", body = AssetRequest),
        (status = 302, description = "The user was not authenticated"),
        (status = 403, description = "The user authenticated, but is not authorized"),
        (status = 404, description = "The asset was not found"),
    )
)]
#[get("/asset/{id}/duplicate")]
/// Pre-fill a creation form from an existing asset
async fn duplicate_prefill(
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
    id: web::Path<String>,
) -> Result<impl Responder, Error> {
    let request = service
        .duplicate_prefill(&auth, &id, db.connection())
        .await?;

    Ok(HttpResponse::Ok().json(request))
}

#[utoipa::path(
    tag = "asset",
    operation_id = "duplicateAsset",
    params(
        ("id", Path, description = "The ID of the asset to duplicate"),
    ),
    responses(
        (status = 201, description = "The duplicate was created"),
        (status = 302, description = "The user was not authenticated"),
        (status = 403, description = "The user authenticated, but is not authorized"),
        (status = 404, description = "The asset was not found"),
    )
)]
#[post("/asset/{id}/duplicate")]
/// Duplicate an asset, copying its attributes but not its assignee
async fn duplicate(
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
    id: web::Path<String>,
) -> Result<impl Responder, Error> {
    let id = db
        .transaction(async |tx| service.duplicate(&auth, &id, tx).await)
        .await?;

    Ok(HttpResponse::Created().json(json!({"id": id})))
}

#[utoipa::path(
    tag = "asset",
    operation_id = "assignAsset",
    request_body = AssignRequest,
    params(
        ("id", Path, description = "The ID of the asset to assign"),
    ),
    responses(
        (status = 204, description = "The asset was assigned and checked out"),
        (status = 302, description = "The user was not authenticated"),
        (status = 404, description = "The asset or the user was not found"),
    )
)]
#[post("/asset/{id}/assign")]
/// Assign an asset to a user, checking it out
async fn assign(
    service: web::Data<AssetService>,
    db: web::Data<Database>,
    auth: Authenticated,
    id: web::Path<String>,
    web::Json(request): web::Json<AssignRequest>,
) -> Result<impl Responder, Error> {
    db.transaction(async |tx| service.assign(&auth, &id, &request.user_id, tx).await)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
