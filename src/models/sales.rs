use super::product::validate_price;
use crate::entities::sale;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    #[schema(value_type = String, example = "49.99")]
    pub unit_price: Decimal,
    #[schema(value_type = String, example = "99.98")]
    pub total_amount: Decimal,
    pub sold_at: DateTime<Utc>,
}

impl From<sale::Model> for Sale {
    fn from(model: sale::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            unit_price: model.unit_price,
            total_amount: model.total_amount,
            sold_at: model.sold_at,
        }
    }
}

/// Request to record a sale against current stock
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewSale {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Overrides the product's current price when present
    #[serde(default)]
    #[validate(custom = "validate_price")]
    #[schema(value_type = Option<String>)]
    pub unit_price: Option<Decimal>,
    /// Defaults to now
    #[serde(default)]
    pub sold_at: Option<DateTime<Utc>>,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_stock_units: i64,
    #[schema(value_type = String)]
    pub inventory_value: Decimal,
    pub total_sales: u64,
    pub units_sold: i64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub low_stock_count: u64,
    pub out_of_stock_count: u64,
    pub category_count: u64,
}

/// A product ranked by sales revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopProduct {
    pub product_id: Uuid,
    pub name: String,
    pub category: String,
    pub units_sold: i64,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::MAX_PRICE;
    use rust_decimal_macros::dec;

    fn new_sale(quantity: i32, unit_price: Option<Decimal>) -> NewSale {
        NewSale {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price,
            sold_at: None,
        }
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(new_sale(1, None).validate().is_ok());
        assert!(new_sale(0, None).validate().is_err());
    }

    #[test]
    fn unit_price_override_is_bounded() {
        assert!(new_sale(1, Some(MAX_PRICE)).validate().is_ok());
        assert!(new_sale(1, Some(dec!(-1))).validate().is_err());
        assert!(new_sale(1, Some(MAX_PRICE + dec!(0.01))).validate().is_err());
    }
}
