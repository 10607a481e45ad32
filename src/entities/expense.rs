//! Expense entity - Represents both one-time spends and recurring templates.
//!
//! A row with `expense_type = recurring` is a **template**: it is not itself a
//! spend, its `date` is informational, and the generator materializes concrete
//! occurrences from it. A row with a non-null `parent_expense_id` is a
//! **generated occurrence** of the template with that id; occurrences are
//! always `one_time` and `is_auto_generated`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether an expense is a concrete spend or a recurring template.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ExpenseType {
    /// A single dated spend (including generated occurrences)
    #[sea_orm(string_value = "one_time")]
    OneTime,
    /// A recurring template from which occurrences are generated
    #[sea_orm(string_value = "recurring")]
    Recurring,
}

/// How often a recurring template produces occurrences.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum RecurringFrequency {
    /// One occurrence per calendar day
    #[sea_orm(string_value = "daily")]
    Daily,
    /// One occurrence every seven days
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// One occurrence per calendar month (month-end dates clamp)
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// One occurrence per calendar year
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the user who owns this expense
    pub user_id: String,
    /// Optional category this expense belongs to
    pub category_id: Option<i64>,
    /// Positive amount, two fractional digits by convention
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    /// Short human-readable title (never empty)
    pub title: String,
    /// Optional free-form description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Calendar date the expense is attributed to (informational for templates)
    pub date: Date,
    /// Whether this row is a one-time spend or a recurring template
    pub expense_type: ExpenseType,
    /// Frequency of generation; set only on recurring templates
    pub recurring_frequency: Option<RecurringFrequency>,
    /// First date of the recurrence; required for templates
    pub recurring_start_date: Option<Date>,
    /// Optional last date of the recurrence; generation never passes it
    pub recurring_end_date: Option<Date>,
    /// Template this row was generated from; null for templates and manual spends
    pub parent_expense_id: Option<i64>,
    /// True only for occurrences created by the generator
    #[sea_orm(default_value = "false")]
    pub is_auto_generated: bool,
    /// Soft-delete marker; soft-deleted templates are excluded from generation
    pub deleted_at: Option<DateTimeUtc>,
    /// When this row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// A generated occurrence points back to its recurring template
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentExpenseId",
        to = "Column::Id"
    )]
    ParentExpense,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
