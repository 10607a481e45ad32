//! Category business logic - Handles category CRUD for expense organization.
//!
//! Categories are a pure filtering/aggregation dimension; the only rule they
//! carry is per-user name uniqueness, enforced with an explicit composite-key
//! existence query against (user, name) among non-deleted categories.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new category for a user, rejecting empty and duplicate names.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
) -> Result<category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }

    let existing = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Name.eq(name))
        .filter(category::Column::DeletedAt.is_null())
        .one(db)
        .await?;

    if existing.is_some() {
        return Err(Error::DuplicateCategory {
            name: name.to_string(),
        });
    }

    let category = category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = category.insert(db).await?;
    Ok(result)
}

/// Finds a category by its unique id, returning None if it does not exist or
/// has been soft-deleted.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .filter(category::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all non-deleted categories for a user, ordered alphabetically.
pub async fn list_categories_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::DeletedAt.is_null())
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Soft-deletes a category. Expenses referencing it keep their reference.
pub async fn soft_delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let category = get_category_by_id(db, category_id)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    let mut active_model: category::ActiveModel = category.into();
    active_model.deleted_at = Set(Some(Utc::now()));
    active_model.update(db).await?;

    Ok(())
}
