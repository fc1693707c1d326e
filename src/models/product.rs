use crate::entities::product;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A product as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[schema(value_type = String, example = "129.99")]
    pub price: Decimal,
    pub stock: i32,
    pub min_stock: i32,
    pub supplier: String,
}

/// Stock classification derived from `stock` and `min_stock`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl Product {
    /// Stock at or below the minimum threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.is_out_of_stock() {
            StockStatus::OutOfStock
        } else if self.is_low_stock() {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Value of the units on hand at the current price, or `None` on overflow.
    pub fn stock_value(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.stock))
    }
}

impl From<product::Model> for Product {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            price: model.price,
            stock: model.stock,
            min_stock: model.min_stock,
            supplier: model.supplier,
        }
    }
}

/// Payload for creating a product or replacing one in full
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(
        length(max = 255, message = "Product name cannot exceed 255 characters"),
        custom = "validate_not_blank"
    )]
    pub name: String,

    #[validate(
        length(max = 100, message = "Category cannot exceed 100 characters"),
        custom = "validate_not_blank"
    )]
    pub category: String,

    #[validate(custom = "validate_price")]
    #[schema(value_type = String, example = "129.99")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub min_stock: i32,

    #[serde(default)]
    #[validate(length(max = 255, message = "Supplier cannot exceed 255 characters"))]
    pub supplier: String,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            min_stock: product.min_stock,
            supplier: product.supplier.clone(),
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Largest accepted unit price
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

pub(crate) fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("price");
        err.message = Some("Price cannot be negative".into());
        return Err(err);
    }
    if *price > MAX_PRICE {
        let mut err = ValidationError::new("price");
        err.message = Some(format!("Price cannot exceed {}", MAX_PRICE).into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn product(stock: i32, min_stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Laptop Pro".into(),
            category: "Electronics".into(),
            price: dec!(1299.99),
            stock,
            min_stock,
            supplier: "Acme".into(),
        }
    }

    #[rstest]
    #[case(0, 10, StockStatus::OutOfStock)]
    #[case(0, 0, StockStatus::OutOfStock)]
    #[case(5, 10, StockStatus::LowStock)]
    #[case(10, 10, StockStatus::LowStock)]
    #[case(11, 10, StockStatus::InStock)]
    fn stock_status_follows_thresholds(
        #[case] stock: i32,
        #[case] min_stock: i32,
        #[case] expected: StockStatus,
    ) {
        assert_eq!(product(stock, min_stock).stock_status(), expected);
    }

    #[test]
    fn stock_value_multiplies_price_by_units() {
        assert_eq!(product(3, 1).stock_value(), Some(dec!(3899.97)));
    }

    #[test]
    fn stock_value_at_the_limits_does_not_overflow() {
        let mut p = product(i32::MAX, 0);
        p.price = MAX_PRICE;
        assert_eq!(
            p.stock_value(),
            Some(MAX_PRICE * Decimal::from(i32::MAX))
        );

        p.price = Decimal::MAX;
        assert_eq!(p.stock_value(), None);
    }

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(1000000000), true)]
    #[case(dec!(1000000000.01), false)]
    #[case(dec!(100000000000000000000), false)]
    fn price_is_bounded(#[case] price: Decimal, #[case] valid: bool) {
        let mut input = ProductInput::from(&product(1, 1));
        input.price = price;
        assert_eq!(input.validate().is_ok(), valid);
    }

    #[test]
    fn input_rejects_negative_numbers_and_blank_names() {
        let mut input = ProductInput::from(&product(1, 1));
        assert!(input.validate().is_ok());

        input.stock = -1;
        input.min_stock = -5;
        input.price = dec!(-0.01);
        input.name = "   ".into();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("stock"));
        assert!(fields.contains_key("min_stock"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("name"));
    }
}
