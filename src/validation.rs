//! Product form validation.
//!
//! Every rule yields a single message meant for the admin who filled in the
//! form. Handlers run these checks before touching images or the database.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{AppError, Result},
    models::{Category, ProductDraft, ProductForm, ProductPatch},
};

pub const MAX_NAME_LENGTH: usize = 200;

/// Largest value the `NUMERIC(12, 2)` price column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

impl ProductForm {
    pub fn validate_create(&self) -> Result<ProductDraft> {
        Ok(ProductDraft {
            name: validate_name(required(&self.name, "Name")?)?,
            description: validate_description(required(&self.description, "Description")?)?,
            price: validate_price(required(&self.price, "Price")?)?,
            category: validate_category(required(&self.category, "Category")?)?,
            stock: validate_stock(required(&self.stock, "Stock")?)?,
        })
    }

    /// Fields left out of the form are left unchanged.
    pub fn validate_update(&self) -> Result<ProductPatch> {
        Ok(ProductPatch {
            name: self.name.as_deref().map(validate_name).transpose()?,
            description: self
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            price: self.price.as_deref().map(validate_price).transpose()?,
            category: self.category.as_deref().map(validate_category).transpose()?,
            stock: self.stock.as_deref().map(validate_stock).transpose()?,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}

pub fn validate_description(description: &str) -> Result<String> {
    let trimmed = description.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest(
            "Description cannot be empty".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Prices are stored with two decimals (half away from zero), so the range
/// is checked after rounding.
pub fn validate_price(price: &str) -> Result<Decimal> {
    let price = Decimal::from_str(price.trim())
        .map_err(|_| AppError::BadRequest("Price must be a number".to_string()))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Price must be greater than zero".to_string(),
        ));
    }

    if price > MAX_PRICE {
        return Err(AppError::BadRequest(format!(
            "Price must be at most {}",
            MAX_PRICE
        )));
    }

    Ok(price)
}

pub fn validate_stock(stock: &str) -> Result<i32> {
    let stock = stock
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("Stock must be a whole number".to_string()))?;

    if stock < 0 {
        return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
    }

    Ok(stock)
}

pub fn validate_category(category: &str) -> Result<Category> {
    category.parse().map_err(AppError::BadRequest)
}
