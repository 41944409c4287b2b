//! `SeaORM` Entity for the quote_versions table
//!
//! Append-only value history of a current quote. Consecutive identical
//! observations collapse into one row whose updated_at keeps advancing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quote_versions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub current_quote_id: i32,
    pub unit: i32,
    pub buy_rate: f64,
    pub sale_rate: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
