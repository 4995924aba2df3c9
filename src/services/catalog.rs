use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::state::game::Product;

/// Error raised by product sources.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// There is nothing to pick from.
    #[error("product catalog is empty")]
    Empty,
    /// A configured product cannot be guessed.
    #[error("product `{name}` has an invalid price ({price})")]
    InvalidPrice {
        /// Offending product name.
        name: String,
        /// Offending price.
        price: f64,
    },
}

/// Source of products for new rounds.
pub trait ProductCatalog: Send + Sync {
    /// Select the product for a new round.
    fn pick(&self) -> Result<Product, CatalogError>;
}

/// In-memory catalog that picks uniformly at random.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Build a catalog, refusing products whose price is not a positive number.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if let Some(invalid) = products
            .iter()
            .find(|product| !product.price.is_finite() || product.price <= 0.0)
        {
            return Err(CatalogError::InvalidPrice {
                name: invalid.name.clone(),
                price: invalid.price,
            });
        }

        Ok(Self { products })
    }

    /// Number of products available.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no product at all.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for StaticCatalog {
    fn pick(&self) -> Result<Product, CatalogError> {
        self.products
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(CatalogError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: f64) -> Product {
        Product {
            name: name.into(),
            price,
        }
    }

    #[test]
    fn picks_one_of_the_configured_products() {
        let products = vec![product("Kettle", 24.5), product("Toaster", 39.0)];
        let catalog = StaticCatalog::new(products.clone()).unwrap();
        assert_eq!(catalog.len(), 2);

        for _ in 0..16 {
            let picked = catalog.pick().unwrap();
            assert!(products.contains(&picked));
        }
    }

    #[test]
    fn empty_catalog_fails_at_pick_time() {
        let catalog = StaticCatalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.pick(), Err(CatalogError::Empty));
    }

    #[test]
    fn non_positive_prices_are_refused() {
        let err = StaticCatalog::new(vec![product("Kettle", 24.5), product("Free hug", 0.0)])
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidPrice {
                name: "Free hug".into(),
                price: 0.0,
            }
        );
        assert!(StaticCatalog::new(vec![product("Void", f64::NAN)]).is_err());
    }
}
