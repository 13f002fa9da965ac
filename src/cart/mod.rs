use serde::{Deserialize, Serialize};

use crate::catalog::Product;

pub const CART_STORAGE_KEY: &str = "cart";

/// A product plus its quantity. Serialized flat, so a stored entry reads
/// `{"id":1,"title":...,"price":...,"quantity":2}`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Receipt {
    pub total_items: u64,
    pub total_price: f64,
}

/// Ordered cart entries, at most one per product id.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from persisted entries. Zero quantities are dropped
    /// and repeated ids are merged into the first occurrence.
    pub fn from_items(entries: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for entry in entries {
            if entry.quantity == 0 {
                continue;
            }
            match cart.position(entry.product.id) {
                Some(idx) => {
                    let existing = &mut cart.items[idx];
                    existing.quantity = existing.quantity.saturating_add(entry.quantity);
                }
                None => cart.items.push(entry),
            }
        }
        cart
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<CartItem> = serde_json::from_str(json)?;
        Ok(Self::from_items(entries))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, product_id: u64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    fn position(&self, product_id: u64) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product.id == product_id)
    }

    /// Returns the quantity now held for the product.
    pub fn add(&mut self, product: &Product) -> u32 {
        match self.position(product.id) {
            Some(idx) => {
                let item = &mut self.items[idx];
                item.quantity = item.quantity.saturating_add(1);
                item.quantity
            }
            None => {
                self.items.push(CartItem {
                    product: product.clone(),
                    quantity: 1,
                });
                1
            }
        }
    }

    /// Takes one unit away; the entry disappears when its last unit goes.
    /// Returns `false` when the product is not in the cart.
    pub fn remove_one(&mut self, product_id: u64) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };
        if self.items[idx].quantity > 1 {
            self.items[idx].quantity -= 1;
        } else {
            self.items.remove(idx);
        }
        true
    }

    pub fn remove_all(&mut self, product_id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != product_id);
        self.items.len() != before
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn checkout(&mut self) -> Receipt {
        let receipt = Receipt {
            total_items: self.total_items(),
            total_price: self.total_price(),
        };
        self.items.clear();
        receipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, price: f64) -> Product {
        Product {
            id,
            title: format!("product {id}"),
            thumbnail: format!("https://cdn.example/{id}.png"),
            category: "beauty".to_string(),
            price,
        }
    }

    #[test]
    fn adding_twice_increments_a_single_entry() {
        let mut cart = Cart::new();
        let p = product(1, 100.0);
        assert_eq!(cart.add(&p), 1);
        assert_eq!(cart.add(&p), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().quantity, 2);
    }

    #[test]
    fn remove_one_decrements_then_removes() {
        let mut cart = Cart::new();
        let p = product(1, 100.0);
        cart.add(&p);
        cart.add(&p);
        assert!(cart.remove_one(1));
        assert_eq!(cart.get(1).unwrap().quantity, 1);
        assert!(cart.remove_one(1));
        assert!(cart.get(1).is_none());
        assert!(!cart.remove_one(1));
    }

    #[test]
    fn remove_all_drops_the_whole_line() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10.0));
        cart.add(&product(1, 10.0));
        cart.add(&product(2, 20.0));
        assert!(cart.remove_all(1));
        assert!(!cart.remove_all(1));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].product.id, 2);
    }

    #[test]
    fn totals_sum_quantities_and_subtotals() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1500.0));
        cart.add(&product(1, 1500.0));
        cart.add(&product(2, 250.0));
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), 3250.0);
    }

    #[test]
    fn checkout_reports_and_clears() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10.0));
        cart.add(&product(2, 5.0));
        let receipt = cart.checkout();
        assert_eq!(receipt.total_items, 2);
        assert_eq!(receipt.total_price, 15.0);
        assert!(cart.is_empty());
    }

    #[test]
    fn stored_entries_are_flat_json() {
        let mut cart = Cart::new();
        cart.add(&product(7, 42.0));
        let json = cart.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], 7);
        assert_eq!(value[0]["quantity"], 1);
        assert_eq!(value[0]["title"], "product 7");
        assert_eq!(Cart::from_json(&json).unwrap(), cart);
    }

    #[test]
    fn restore_drops_zero_quantities_and_merges_duplicates() {
        let json = r#"[
            {"id":1,"title":"a","thumbnail":"","category":"x","price":1.0,"quantity":2},
            {"id":2,"title":"b","thumbnail":"","category":"x","price":1.0,"quantity":0},
            {"id":1,"title":"a","thumbnail":"","category":"x","price":1.0,"quantity":3}
        ]"#;
        let cart = Cart::from_json(json).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().quantity, 5);
    }
}
