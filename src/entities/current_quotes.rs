//! `SeaORM` Entity for the current_quotes table
//!
//! Holds the latest observed quote per (source_id, unit_currency_code,
//! rate_currency_code); that triple is unique at the database level.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "current_quotes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub source_id: i32,
    /// Multiplier the rates apply to, e.g. "100 units = X"
    pub unit: i32,
    pub unit_currency_code: String,
    pub rate_currency_code: String,
    pub buy_rate: f64,
    pub sale_rate: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
