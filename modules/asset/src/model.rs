use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use stockroom_entity::{asset, asset::Status, asset_attribute};
use time::{Date, OffsetDateTime};
use utoipa::{IntoParams, ToSchema};

/// An asset, as returned by the list view.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema, PartialEq, Eq)]
pub struct AssetHead {
    /// The ID of the asset
    pub id: String,

    pub name: String,
    pub category: String,
    pub status: Status,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,

    /// The date the asset depreciates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<Date>,

    /// The ID of the user the asset is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl From<asset::Model> for AssetHead {
    fn from(value: asset::Model) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            category: value.category,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
            depreciation: value.depreciation,
            assigned_to: value.assigned_to.map(|id| id.to_string()),
        }
    }
}

/// Detailed asset information, extends [`AssetHead`] with its attributes.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema, PartialEq, Eq)]
pub struct AssetDetails {
    #[serde(flatten)]
    pub head: AssetHead,

    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
}

impl Deref for AssetDetails {
    type Target = AssetHead;

    fn deref(&self) -> &Self::Target {
        &self.head
    }
}

impl DerefMut for AssetDetails {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.head
    }
}

/// A single attribute of an asset.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema, PartialEq, Eq)]
pub struct AttributeValue {
    pub id: String,
    pub name: String,
    pub value: String,
}

impl From<asset_attribute::Model> for AttributeValue {
    fn from(value: asset_attribute::Model) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            value: value.value,
        }
    }
}

/// Mutable properties of an asset, submitted by create and update.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema, PartialEq, Eq)]
pub struct AssetRequest {
    /// The name of the asset.
    pub name: String,

    /// The category; an absent or empty value falls back to the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// The status; absent falls back to `operational`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<Date>,

    /// The ID of the user to assign the asset to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    /// Attribute rows, in inline-form style: rows with an `id` refer to
    /// existing attributes, rows without one are inserted, delete-marked
    /// rows are removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeRow>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema, PartialEq, Eq)]
pub struct AttributeRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,
    pub value: String,

    #[serde(default)]
    pub delete: bool,
}

/// Filter values accepted by the list view.
///
/// Absent or empty values exclude nothing.
#[derive(
    IntoParams, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub struct AssetQuery {
    /// Case-insensitive substring match against name, ID, or category.
    #[serde(default)]
    pub search: String,

    /// Exact category to match.
    #[serde(default)]
    pub category: String,

    /// Exact status to match. A value outside the status enum matches nothing.
    #[serde(default)]
    pub status: String,
}

/// Request body of the assign operation.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema, PartialEq, Eq)]
pub struct AssignRequest {
    /// The ID of the user to assign the asset to.
    pub user_id: String,
}
