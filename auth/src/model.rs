use crate::Identity;
use serde::{Deserialize, Serialize};
use stockroom_entity::user;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct LoginResponse {
    /// Opaque session token, to be presented as `Authorization: Bearer …`.
    pub token: String,
    pub user: CurrentUser,
}

/// The authenticated user, as returned by login and whoami.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub superuser: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

impl From<Identity> for CurrentUser {
    fn from(value: Identity) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
            superuser: value.superuser,
            groups: value.groups,
        }
    }
}

/// A user as listed for assignment pickers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserHead {
    pub id: String,
    pub username: String,
    pub superuser: bool,
}

impl From<user::Model> for UserHead {
    fn from(value: user::Model) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
            superuser: value.superuser,
        }
    }
}
