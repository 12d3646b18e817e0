use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::Category;

/// Column limits of the `products` table.
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 250;
pub const PRICE_SCALE: u32 = 2;
pub const PRICE_INTEGER_DIGITS: u32 = 8;

/// A catalog entry. `id` is `None` while the product is transient and is
/// assigned by the store on `create`; it never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Option<i32>,
    pub name: String,
    pub description: String,
    /// Exact decimal, exchanged as a string so no precision is lost.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// Build a transient product from a JSON payload.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let mut product = Product::new("", "", Decimal::ZERO, false, Category::Unknown);
        product.apply_payload(payload)?;
        Ok(product)
    }

    /// Overwrite every field except `id` from a JSON payload.
    ///
    /// All fields are validated before any is assigned, so a rejected payload
    /// leaves the product untouched. Values are never coerced: `available`
    /// must be a JSON boolean and `category` an exact enumeration name.
    pub fn apply_payload(&mut self, payload: &Value) -> Result<(), ValidationError> {
        let data = payload.as_object().ok_or_else(|| {
            ValidationError::new("Invalid product: body of request contained bad or no data")
        })?;

        let name = required_str(data, "name")?;
        if name.trim().is_empty() {
            return Err(ValidationError::new("Invalid product: name must not be empty"));
        }
        check_length("name", name, MAX_NAME_LEN)?;
        let description = required_str(data, "description")?;
        check_length("description", description, MAX_DESCRIPTION_LEN)?;
        let price = parse_price(required(data, "price")?)?;
        let available = match required(data, "available")? {
            Value::Bool(flag) => *flag,
            other => {
                return Err(ValidationError::new(format!(
                    "Invalid type for boolean [available]: {}",
                    json_kind(other)
                )))
            }
        };
        let category = required_str(data, "category")?.parse::<Category>()?;

        self.name = name.to_string();
        self.description = description.to_string();
        self.price = price;
        self.available = available;
        self.category = category;
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

fn required<'a>(data: &'a Map<String, Value>, key: &str) -> Result<&'a Value, ValidationError> {
    data.get(key)
        .ok_or_else(|| ValidationError::new(format!("Invalid product: missing {key}")))
}

fn required_str<'a>(data: &'a Map<String, Value>, key: &str) -> Result<&'a str, ValidationError> {
    match required(data, key)? {
        Value::String(s) => Ok(s),
        other => Err(ValidationError::new(format!(
            "Invalid type for string [{key}]: {}",
            json_kind(other)
        ))),
    }
}

fn check_length(key: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::new(format!(
            "Invalid product: {key} is {len} characters, at most {max} allowed"
        )));
    }
    Ok(())
}

/// Parse a price given as a decimal string or a JSON number. Numbers are read
/// from their source text (serde_json `arbitrary_precision`), so no digits are
/// lost on the way in. The result must fit `NUMERIC(10, 2)` exactly: at most
/// two fractional digits that are not trailing zeros, at most eight integer
/// digits.
pub fn parse_price(value: &Value) -> Result<Decimal, ValidationError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(ValidationError::new(format!(
                "Invalid type for decimal [price]: {}",
                json_kind(other)
            )))
        }
    };
    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ValidationError::new(format!("Invalid product: bad price {text:?}")))?;

    if price.normalize().scale() > PRICE_SCALE {
        return Err(ValidationError::new(format!(
            "Invalid product: price {text} has more than {PRICE_SCALE} decimal places"
        )));
    }
    if price.abs().trunc() >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(ValidationError::new(format!(
            "Invalid product: price {text} has more than {PRICE_INTEGER_DIGITS} integer digits"
        )));
    }
    Ok(price)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
