#[cfg(test)]
mod test;

use crate::{
    AuthError, AuthService, Authenticated,
    model::{CurrentUser, LoginRequest, LoginResponse, UserHead},
};
use actix_web::{HttpResponse, Responder, get, post, web};
use sea_orm::{EntityTrait, QueryOrder};
use stockroom_common::db::Database;
use stockroom_entity::user;

pub fn configure(config: &mut utoipa_actix_web::service_config::ServiceConfig, db: Database) {
    config
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(AuthService::new()))
        .service(login)
        .service(logout)
        .service(whoami)
        .service(users);
}

#[utoipa::path(
    tag = "auth",
    operation_id = "login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted, session issued", body = LoginResponse),
        (status = 401, description = "Unknown user or wrong password"),
    )
)]
#[post("/login")]
/// Log in with username and password
async fn login(
    service: web::Data<AuthService>,
    db: web::Data<Database>,
    web::Json(request): web::Json<LoginRequest>,
) -> Result<impl Responder, AuthError> {
    let (token, identity) = db
        .transaction(async |tx| service.login(&request.username, &request.password, tx).await)
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: token.to_string(),
        user: identity.into(),
    }))
}

#[utoipa::path(
    tag = "auth",
    operation_id = "logout",
    responses(
        (status = 204, description = "The session was dropped"),
        (status = 302, description = "The user was not authenticated"),
    )
)]
#[post("/logout")]
/// Drop the current session
async fn logout(
    auth: Authenticated,
    service: web::Data<AuthService>,
    db: web::Data<Database>,
) -> Result<impl Responder, AuthError> {
    db.transaction(async |tx| service.logout(auth.session(), tx).await)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    tag = "auth",
    operation_id = "whoami",
    responses(
        (status = 200, description = "The current user", body = CurrentUser),
        (status = 302, description = "The user was not authenticated"),
    )
)]
#[get("/whoami")]
/// Describe the current user
async fn whoami(auth: Authenticated) -> Result<impl Responder, AuthError> {
    Ok(HttpResponse::Ok().json(CurrentUser::from(auth.identity)))
}

#[utoipa::path(
    tag = "auth",
    operation_id = "listUsers",
    responses(
        (status = 200, description = "All known users", body = [UserHead]),
        (status = 302, description = "The user was not authenticated"),
    )
)]
#[get("/user")]
/// List users, for assignment pickers
async fn users(
    _auth: Authenticated,
    db: web::Data<Database>,
) -> Result<impl Responder, AuthError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Username)
        .all(db.connection())
        .await?;

    Ok(HttpResponse::Ok().json(users.into_iter().map(UserHead::from).collect::<Vec<_>>()))
}
