//! Budget entity - A monthly spending limit, per category or overall.
//!
//! A budget with a null `category_id` is an overall budget covering all of a
//! user's spending for the month. At most one non-deleted budget exists per
//! (user, category, month) key; the core layer enforces this with an explicit
//! composite-key existence query.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the user who owns this budget
    pub user_id: String,
    /// Category this budget limits; None for an overall budget
    pub category_id: Option<i64>,
    /// Positive budget amount for the month
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    /// First day of the month this budget covers
    pub month: Date,
    /// Soft-delete marker
    pub deleted_at: Option<DateTimeUtc>,
    /// When this row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget optionally limits one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
