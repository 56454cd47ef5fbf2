
use crate::{
    Error,
    model::{AssetDetails, AssetHead, AssetQuery, AssetRequest, AttributeRow},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use sea_query::{Condition, Expr, Func, SimpleExpr};
use std::{borrow::Cow, collections::HashSet};
use stockroom_auth::{
    Identity,
    policy::{self, Scope},
};
use stockroom_common::model::{Paginated, PaginatedResults};
use stockroom_entity::{asset, asset::Status, asset_attribute, user};
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "General";

/// Name suffix applied when duplicating an asset.
pub const COPY_SUFFIX: &str = " (Copy)";

const MAX_NAME_LENGTH: usize = 255;
const MAX_CATEGORY_LENGTH: usize = 255;
const MAX_ATTRIBUTE_NAME_LENGTH: usize = 255;
const MAX_ATTRIBUTE_VALUE_LENGTH: usize = 1023;

#[derive(Clone, Copy, Debug, Default)]
pub struct AssetService;

impl AssetService {
    pub fn new() -> Self {
        Self
    }

    /// List the assets visible to `user`, narrowed by `filters`.
    ///
    /// The visibility scope is applied before any user-supplied filter, so
    /// search or filter refinement can never reveal an asset outside the
    /// user's permission scope.
    pub async fn list(
        &self,
        user: &Identity,
        filters: &AssetQuery,
        paginated: Paginated,
        db: &impl ConnectionTrait,
    ) -> Result<PaginatedResults<AssetHead>, Error> {
        let select = apply_filters(scoped(user), filters);

        let total = select.clone().count(db).await?;

        let mut select = select.order_by_desc(asset::Column::CreatedAt);
        if !paginated.is_unlimited() {
            select = select.offset(paginated.offset).limit(paginated.limit);
        }

        let items = select
            .all(db)
            .await?
            .into_iter()
            .map(AssetHead::from)
            .collect();

        Ok(PaginatedResults { items, total })
    }

    /// The distinct categories of the assets visible to `user`.
    pub async fn categories(
        &self,
        user: &Identity,
        db: &impl ConnectionTrait,
    ) -> Result<Vec<String>, Error> {
        Ok(scoped(user)
            .select_only()
            .column(asset::Column::Category)
            .distinct()
            .order_by_asc(asset::Column::Category)
            .into_tuple::<String>()
            .all(db)
            .await?)
    }

    /// Read a single asset with its attributes.
    ///
    /// Returns `Ok(None)` when the asset does not exist; an asset the user is
    /// not allowed to see is a forbidden error, never "not found".
    pub async fn read(
        &self,
        user: &Identity,
        id: &str,
        db: &impl ConnectionTrait,
    ) -> Result<Option<AssetDetails>, Error> {
        let Some(asset) = find_by_id(id, db).await? else {
            return Ok(None);
        };

        policy::can_view(user, asset.assigned_to).require()?;

        let attributes = asset
            .find_related(asset_attribute::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(Some(AssetDetails {
            head: asset.into(),
            attributes,
        }))
    }

    /// Create a new asset, including its attributes, returning the new ID.
    pub async fn create(
        &self,
        user: &Identity,
        request: AssetRequest,
        db: &impl ConnectionTrait,
    ) -> Result<String, Error> {
        policy::can_create(user).require()?;
        validate_or_fail(&request)?;

        let assigned_to = resolve_assignee(request.assigned_to.as_deref(), db).await?;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        asset::ActiveModel {
            id: Set(id),
            name: Set(request.name),
            category: Set(category_or_default(request.category)),
            status: Set(request.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            depreciation: Set(request.depreciation),
            assigned_to: Set(assigned_to),
        }
        .insert(db)
        .await?;

        insert_attributes(id, request.attributes.iter().filter(|row| !row.delete), db).await?;

        tracing::info!(asset = %id, "created");

        Ok(id.to_string())
    }

    /// Update an asset and its attribute rows.
    pub async fn update(
        &self,
        user: &Identity,
        id: &str,
        request: AssetRequest,
        db: &impl ConnectionTrait,
    ) -> Result<(), Error> {
        let Some(asset) = find_by_id(id, db).await? else {
            return Err(Error::NotFound(id.to_string()));
        };

        policy::can_manage(user).require()?;
        validate_or_fail(&request)?;

        let assigned_to = resolve_assignee(request.assigned_to.as_deref(), db).await?;

        apply_attribute_rows(&asset, &request.attributes, db).await?;

        let mut asset: asset::ActiveModel = asset.into();
        asset.name = Set(request.name);
        asset.category = Set(category_or_default(request.category));
        asset.status = Set(request.status.unwrap_or_default());
        asset.depreciation = Set(request.depreciation);
        asset.assigned_to = Set(assigned_to);
        asset.updated_at = Set(OffsetDateTime::now_utc());
        asset.update(db).await?;

        Ok(())
    }

    /// Delete an asset, removing its attributes with it.
    pub async fn delete(
        &self,
        user: &Identity,
        id: &str,
        db: &impl ConnectionTrait,
    ) -> Result<(), Error> {
        let Some(asset) = find_by_id(id, db).await? else {
            return Err(Error::NotFound(id.to_string()));
        };

        policy::can_manage(user).require()?;

        // the FK cascades as well, but the ownership contract lives here
        asset_attribute::Entity::delete_many()
            .filter(asset_attribute::Column::AssetId.eq(asset.id))
            .exec(db)
            .await?;
        asset::Entity::delete_by_id(asset.id).exec(db).await?;

        tracing::info!(asset = %asset.id, "deleted");

        Ok(())
    }

    /// Pre-fill a creation request from an existing asset.
    ///
    /// The name gets suffixed, the assignee is dropped; duplicates start
    /// unassigned.
    pub async fn duplicate_prefill(
        &self,
        user: &Identity,
        id: &str,
        db: &impl ConnectionTrait,
    ) -> Result<AssetRequest, Error> {
        let Some(asset) = find_by_id(id, db).await? else {
            return Err(Error::NotFound(id.to_string()));
        };

        policy::can_view(user, asset.assigned_to).require()?;
        policy::can_create(user).require()?;

        let attributes = asset
            .find_related(asset_attribute::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(|attribute| AttributeRow {
                id: None,
                name: attribute.name,
                value: attribute.value,
                delete: false,
            })
            .collect();

        Ok(AssetRequest {
            name: format!("{}{COPY_SUFFIX}", asset.name),
            category: Some(asset.category),
            status: Some(asset.status),
            depreciation: asset.depreciation,
            assigned_to: None,
            attributes,
        })
    }

    /// Persist a duplicate of an existing asset, returning the new ID.
    pub async fn duplicate(
        &self,
        user: &Identity,
        id: &str,
        db: &impl ConnectionTrait,
    ) -> Result<String, Error> {
        let request = self.duplicate_prefill(user, id, db).await?;
        self.create(user, request, db).await
    }

    /// Assign an asset to a user, checking it out.
    ///
    /// Any authenticated user may do this; the identity is required but not
    /// further consulted.
    pub async fn assign(
        &self,
        _user: &Identity,
        id: &str,
        assignee: &str,
        db: &impl ConnectionTrait,
    ) -> Result<(), Error> {
        let Some(asset) = find_by_id(id, db).await? else {
            return Err(Error::NotFound(id.to_string()));
        };

        let assignee = Uuid::parse_str(assignee)
            .map_err(|_| Error::NotFound(assignee.to_string()))?;
        if user::Entity::find_by_id(assignee).one(db).await?.is_none() {
            return Err(Error::NotFound(assignee.to_string()));
        }

        let mut asset: asset::ActiveModel = asset.into();
        asset.assigned_to = Set(Some(assignee));
        asset.status = Set(Status::CheckedOut);
        asset.updated_at = Set(OffsetDateTime::now_utc());
        asset.update(db).await?;

        Ok(())
    }
}

/// The base selection, restricted to what `user` may see.
fn scoped(user: &Identity) -> Select<asset::Entity> {
    let select = asset::Entity::find();

    match policy::list_scope(user) {
        Scope::All => select,
        Scope::AssignedOnly(id) => select.filter(asset::Column::AssignedTo.eq(id)),
    }
}

fn apply_filters(mut select: Select<asset::Entity>, filters: &AssetQuery) -> Select<asset::Entity> {
    if !filters.search.is_empty() {
        let mut condition = Condition::any()
            .add(contains_ci(asset::Column::Name.into_expr(), &filters.search))
            .add(contains_ci(
                asset::Column::Id.into_expr().cast_as("text"),
                &filters.search,
            ))
            .add(contains_ci(
                asset::Column::Category.into_expr(),
                &filters.search,
            ));

        // stores which keep UUIDs in binary form do not render them as text
        // for the cast above, so a fully spelled out ID matches directly
        if let Ok(id) = Uuid::parse_str(filters.search.trim()) {
            condition = condition.add(asset::Column::Id.eq(id));
        }

        select = select.filter(condition);
    }

    if !filters.category.is_empty() {
        select = select.filter(asset::Column::Category.eq(filters.category.as_str()));
    }

    if !filters.status.is_empty() {
        select = select.filter(asset::Column::Status.eq(filters.status.as_str()));
    }

    select
}

/// Case-insensitive substring match, backend neutral.
fn contains_ci(expr: impl Into<SimpleExpr>, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(expr.into())).like(format!("%{}%", needle.to_lowercase()))
}

/// An ID that does not parse cannot exist, so it is simply not found.
async fn find_by_id(id: &str, db: &impl ConnectionTrait) -> Result<Option<asset::Model>, Error> {
    let Ok(id) = Uuid::parse_str(id) else {
        return Ok(None);
    };

    Ok(asset::Entity::find_by_id(id).one(db).await?)
}

/// The assignee comes from a form field, so a dangling reference is a
/// validation problem rather than a missing page.
async fn resolve_assignee(
    assigned_to: Option<&str>,
    db: &impl ConnectionTrait,
) -> Result<Option<Uuid>, Error> {
    let Some(value) = assigned_to.filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    let id = Uuid::parse_str(value).map_err(|_| Error::bad_request("Unknown assignee", None))?;

    if user::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(Error::bad_request("Unknown assignee", None));
    }

    Ok(Some(id))
}

fn category_or_default(category: Option<String>) -> String {
    match category {
        Some(category) if !category.is_empty() => category,
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

async fn insert_attributes<'a>(
    asset_id: Uuid,
    rows: impl IntoIterator<Item = &'a AttributeRow>,
    db: &impl ConnectionTrait,
) -> Result<(), Error> {
    let models = rows
        .into_iter()
        .map(|row| asset_attribute::ActiveModel {
            id: Set(Uuid::new_v4()),
            asset_id: Set(asset_id),
            name: Set(row.name.clone()),
            value: Set(row.value.clone()),
        })
        .collect::<Vec<_>>();

    if models.is_empty() {
        return Ok(());
    }

    asset_attribute::Entity::insert_many(models).exec(db).await?;

    Ok(())
}

/// Apply inline-form attribute rows: rows with an ID update or (when
/// delete-marked) remove an existing attribute, rows without one insert.
async fn apply_attribute_rows(
    asset: &asset::Model,
    rows: &[AttributeRow],
    db: &impl ConnectionTrait,
) -> Result<(), Error> {
    let existing = asset
        .find_related(asset_attribute::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|attribute| attribute.id)
        .collect::<HashSet<_>>();

    for row in rows {
        match &row.id {
            Some(id) => {
                let id = Uuid::parse_str(id)
                    .map_err(|_| Error::bad_request("Unknown attribute row", None))?;
                if !existing.contains(&id) {
                    return Err(Error::bad_request(
                        "Attribute does not belong to this asset",
                        None,
                    ));
                }

                if row.delete {
                    asset_attribute::Entity::delete_by_id(id).exec(db).await?;
                } else {
                    let mut attribute = asset_attribute::ActiveModel {
                        id: Set(id),
                        ..Default::default()
                    };
                    attribute.name = Set(row.name.clone());
                    attribute.value = Set(row.value.clone());
                    attribute.update(db).await?;
                }
            }
            // a row which never existed and is already delete-marked
            None if row.delete => {}
            None => {
                insert_attributes(asset.id, [row], db).await?;
            }
        }
    }

    Ok(())
}

/// Collect validation violations; an empty result means the request is valid.
fn validate(request: &AssetRequest) -> Vec<Cow<'static, str>> {
    let mut result = vec![];

    if request.name.is_empty() {
        result.push("name must not be empty".into());
    }
    if request.name.len() > MAX_NAME_LENGTH {
        result.push(format!("name must be at most {MAX_NAME_LENGTH} characters").into());
    }

    if let Some(category) = &request.category
        && category.len() > MAX_CATEGORY_LENGTH
    {
        result.push(format!("category must be at most {MAX_CATEGORY_LENGTH} characters").into());
    }

    for row in &request.attributes {
        if row.delete {
            continue;
        }

        if row.name.is_empty() {
            result.push("attribute name must not be empty".into());
        }
        if row.name.len() > MAX_ATTRIBUTE_NAME_LENGTH {
            result.push(
                format!("attribute name must be at most {MAX_ATTRIBUTE_NAME_LENGTH} characters")
                    .into(),
            );
        }
        if row.value.len() > MAX_ATTRIBUTE_VALUE_LENGTH {
            result.push(
                format!("attribute value must be at most {MAX_ATTRIBUTE_VALUE_LENGTH} characters")
                    .into(),
            );
        }
    }

    result
}

fn validate_or_fail(request: &AssetRequest) -> Result<(), Error> {
    let violations = validate(request);
    if !violations.is_empty() {
        let details = violations
            .iter()
            .map(|violation| format!("* {violation}"))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(Error::bad_request("Invalid asset", Some(details)));
    }

    Ok(())
}
