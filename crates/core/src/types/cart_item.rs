//! Cart line items.
//!
//! [`CartItem`] is the persisted shape of one cart entry. Field names are part
//! of the on-device storage format and must not change:
//!
//! ```json
//! {"id": "b", "title": "Hat", "image_url": "https://...", "price": 5, "quantity": 2}
//! ```

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Quantity};

/// A product being added to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

impl NewCartItem {
    /// Create a new cart candidate.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// One product entry in the cart.
///
/// Items are treated as immutable values: quantity changes produce a new item
/// via [`CartItem::with_quantity`] rather than mutating a shared one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl CartItem {
    /// Copy of this item with a different quantity; all other fields are kept.
    #[must_use]
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity: Quantity::ONE,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hat() -> CartItem {
        CartItem {
            id: ProductId::new("b"),
            title: "Hat".to_string(),
            image_url: "u".to_string(),
            price: Price::from_cents(500).unwrap(),
            quantity: Quantity::new(2).unwrap(),
        }
    }

    #[test]
    fn test_from_new_item_starts_at_one() {
        let item = CartItem::from(NewCartItem::new(
            "a",
            "Shoe",
            "u",
            Price::from_cents(1000).unwrap(),
        ));
        assert_eq!(item.quantity, Quantity::ONE);
        assert_eq!(item.title, "Shoe");
    }

    #[test]
    fn test_with_quantity_keeps_other_fields() {
        let item = hat();
        let updated = item.with_quantity(Quantity::new(7).unwrap());
        assert_eq!(updated.quantity.get(), 7);
        assert_eq!(updated.id, item.id);
        assert_eq!(updated.title, item.title);
        assert_eq!(updated.image_url, item.image_url);
        assert_eq!(updated.price, item.price);
        assert_eq!(item.quantity.get(), 2);
    }

    #[test]
    fn test_reads_persisted_shape() {
        let json = r#"{"id":"b","title":"Hat","image_url":"u","price":5,"quantity":2}"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, hat());
    }

    #[test]
    fn test_writes_persisted_field_names() {
        let value = serde_json::to_value(hat()).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["id", "image_url", "price", "quantity", "title"]);
        assert_eq!(object["quantity"], 2);
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let json = r#"{"id":"b","title":"Hat","image_url":"u","price":5,"quantity":0}"#;
        assert!(serde_json::from_str::<CartItem>(json).is_err());
    }
}
