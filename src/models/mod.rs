mod category;
mod product;

pub use category::{Category, InvalidCategory};
pub use product::{parse_price, Product};
