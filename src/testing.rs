//! Random product fixtures for tests.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::models::{Category, Product};

static ADJECTIVES: &[&str] = &[
    "Red", "Classic", "Deluxe", "Compact", "Heavy-Duty", "Lightweight", "Organic", "Vintage",
    "Portable", "Essential",
];

static NOUNS: &[&str] = &[
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Chevy", "Hammer",
    "Wrench",
];

/// Builds transient products with random, valid field values.
pub struct ProductFactory {
    rng: StdRng,
}

impl ProductFactory {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn build(&mut self) -> Product {
        let adjective = ADJECTIVES.choose(&mut self.rng).unwrap_or(&"Classic");
        let noun = NOUNS.choose(&mut self.rng).unwrap_or(&"Hat");
        let category = *Category::ALL.choose(&mut self.rng).unwrap_or(&Category::Unknown);
        Product::new(
            format!("{adjective} {noun}"),
            format!("A {} {}", adjective.to_lowercase(), noun.to_lowercase()),
            Decimal::new(self.rng.gen_range(50..=200_00), 2),
            self.rng.gen_bool(0.5),
            category,
        )
    }

    pub fn build_many(&mut self, count: usize) -> Vec<Product> {
        (0..count).map(|_| self.build()).collect()
    }
}
