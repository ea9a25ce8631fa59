use crate::{
    entities::chicken_price::{self, Entity as ChickenPriceEntity},
    errors::ServiceError,
    services::amounts::non_negative_amount,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::OnConflict, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SetPrice {
    pub breed: String,
    pub price_per_unit: Decimal,
}

/// Catalogue price for `breed`, if one has been set
pub async fn price_for<C>(conn: &C, breed: &str) -> Result<Option<Decimal>, ServiceError>
where
    C: ConnectionTrait,
{
    Ok(ChickenPriceEntity::find_by_id(breed.trim().to_string())
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .map(|price| price.price_per_unit))
}

#[derive(Clone)]
pub struct PricingService {
    db: Arc<DatabaseConnection>,
}

impl PricingService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates or replaces the price of one breed
    #[instrument(skip(self))]
    pub async fn set_price(
        &self,
        breed: &str,
        price_per_unit: Decimal,
    ) -> Result<chicken_price::Model, ServiceError> {
        let breed = breed.trim();
        if breed.is_empty() {
            return Err(ServiceError::ValidationError("breed is required".to_string()));
        }
        non_negative_amount("price_per_unit", price_per_unit)?;

        let price = chicken_price::ActiveModel {
            breed: Set(breed.to_string()),
            price_per_unit: Set(price_per_unit),
            updated_at: Set(Utc::now()),
        };
        ChickenPriceEntity::insert(price)
            .on_conflict(
                OnConflict::column(chicken_price::Column::Breed)
                    .update_columns([
                        chicken_price::Column::PricePerUnit,
                        chicken_price::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        info!(breed, price = %price_per_unit, "Chicken price set");
        self.get_price(breed).await
    }

    pub async fn get_price(&self, breed: &str) -> Result<chicken_price::Model, ServiceError> {
        ChickenPriceEntity::find_by_id(breed.trim().to_string())
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("No price set for breed '{}'", breed)))
    }

    pub async fn list(&self) -> Result<Vec<chicken_price::Model>, ServiceError> {
        ChickenPriceEntity::find()
            .order_by_asc(chicken_price::Column::Breed)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}
