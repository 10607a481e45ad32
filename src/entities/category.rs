//! Category entity - A filtering and aggregation dimension for expenses.
//!
//! Categories carry no algorithmic behavior of their own. Each user's
//! category names are unique among non-deleted categories; uniqueness is
//! enforced by an explicit composite-key existence query in the core layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the user who owns this category
    pub user_id: String,
    /// Human-readable name, unique per user among non-deleted categories
    pub name: String,
    /// Soft-delete marker
    pub deleted_at: Option<DateTimeUtc>,
    /// When this row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One category has many budgets
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
