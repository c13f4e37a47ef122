//! Seller catalogue

use crate::error::{HaggleError, Result};
use crate::types::ItemId;
use serde::{Deserialize, Serialize};

/// An item the seller is willing to negotiate over
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ItemId,
    pub title: String,
    pub category: String,
    pub asking_price: u64,
    /// Seller will not go below this
    pub minimum_price: u64,
    /// 0.0 (patient) to 1.0 (keen to sell)
    #[serde(default)]
    pub urgency: f64,
}

impl Listing {
    pub fn new(
        id: &str,
        title: &str,
        category: &str,
        asking_price: u64,
        minimum_price: u64,
    ) -> Self {
        Self {
            id: ItemId::from(id),
            title: title.to_string(),
            category: category.to_string(),
            asking_price,
            minimum_price,
            urgency: 0.0,
        }
    }

    pub fn with_urgency(mut self, urgency: f64) -> Self {
        self.urgency = urgency;
        self
    }

    /// Reject listings the seller could never honour
    pub fn validate(&self) -> Result<()> {
        if self.asking_price < self.minimum_price {
            return Err(HaggleError::InvalidListing(format!(
                "{}: asking price {} is below minimum {}",
                self.id, self.asking_price, self.minimum_price
            )));
        }
        if !(0.0..=1.0).contains(&self.urgency) {
            return Err(HaggleError::InvalidListing(format!(
                "{}: urgency {} outside [0, 1]",
                self.id, self.urgency
            )));
        }
        Ok(())
    }
}

/// The seller's inventory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn get(&self, id: &ItemId) -> Result<&Listing> {
        self.listings
            .iter()
            .find(|l| &l.id == id)
            .ok_or_else(|| HaggleError::ItemNotFound(id.0.clone()))
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        self.listings.iter().try_for_each(Listing::validate)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![
            Listing::new("1", "iPhone 12 Pro", "Electronics", 520, 420).with_urgency(0.3),
            Listing::new("2", "Vintage Leather Sofa", "Furniture", 350, 250).with_urgency(0.7),
            Listing::new("3", "Mountain Bike", "Sports", 850, 700).with_urgency(0.5),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.validate().is_ok());

        let sofa = catalog.get(&ItemId::from("2")).unwrap();
        assert_eq!(sofa.title, "Vintage Leather Sofa");
        assert_eq!(sofa.minimum_price, 250);
    }

    #[test]
    fn test_unknown_item() {
        let catalog = Catalog::default();
        let err = catalog.get(&ItemId::from("99")).unwrap_err();
        assert!(matches!(err, HaggleError::ItemNotFound(id) if id == "99"));
    }

    #[test]
    fn test_listing_below_minimum_rejected() {
        let listing = Listing::new("x", "Broken Lamp", "Furniture", 10, 20);
        assert!(matches!(
            listing.validate(),
            Err(HaggleError::InvalidListing(_))
        ));
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = r#"[{"id":"7","title":"Desk","category":"Furniture",
            "asking_price":200,"minimum_price":150}]"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();

        let desk = catalog.get(&ItemId::from("7")).unwrap();
        assert_eq!(desk.urgency, 0.0);
        assert_eq!(desk.asking_price, 200);
    }
}
