use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current selling price per bird for one breed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "chicken_prices")]
#[schema(as = ChickenPrice)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub breed: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub price_per_unit: Decimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
