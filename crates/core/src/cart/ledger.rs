use tracing::warn;

use super::{CartEntry, CartRepository};
use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// The shopper's cart: one entry per product plus a derived total.
///
/// Every mutation writes the full entry list back to the repository.
/// Persistence problems are logged and otherwise ignored; the in-memory
/// ledger stays authoritative for the current action.
#[derive(Debug)]
pub struct CartLedger<R> {
    entries: Vec<CartEntry>,
    repository: R,
}

impl<R: CartRepository> CartLedger<R> {
    /// Hydrate a ledger from its repository.
    ///
    /// Starts empty when nothing is stored, the store is unreachable, or the
    /// stored blob is malformed.
    #[must_use]
    pub fn load(repository: R) -> Self {
        let entries = match repository.load() {
            Ok(Some(entries)) => normalize(entries),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart, starting empty");
                Vec::new()
            }
        };

        Self {
            entries,
            repository,
        }
    }

    /// Current entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn entry(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.id == product_id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |count, e| count.saturating_add(e.quantity))
    }

    /// Sum of `price * quantity`, computed on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Add one unit of `product`.
    pub fn add_item(&mut self, product: &Product) {
        if let Some(current) = self.entry(product.id).map(|e| e.quantity) {
            self.update_quantity(product.id, i64::from(current) + 1);
            return;
        }

        self.entries.push(CartEntry::new(product.clone()));
        self.persist();
    }

    /// Remove the entry for `product_id`, if any.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.entries.retain(|e| e.id != product_id);
        self.persist();
    }

    /// Set the quantity for `product_id`. Zero or negative removes the entry.
    ///
    /// Unknown products are left alone.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == product_id) {
            entry.quantity = quantity;
        }
        self.persist();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Borrow the repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Give back the repository, e.g. to flush a buffered store.
    #[must_use]
    pub fn into_repository(self) -> R {
        self.repository
    }

    fn persist(&mut self) {
        if let Err(e) = self.repository.save(&self.entries) {
            warn!(error = %e, entries = self.entries.len(), "Failed to persist cart");
        }
    }
}

/// Drop zero-quantity entries and merge duplicate ids from a stored blob.
fn normalize(stored: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut entries: Vec<CartEntry> = Vec::with_capacity(stored.len());
    for mut entry in stored {
        if entry.quantity == 0 {
            continue;
        }
        entry.id = entry.product.id;
        if let Some(existing) = entries.iter_mut().find(|e| e.id == entry.id) {
            existing.quantity = existing.quantity.saturating_add(entry.quantity);
        } else {
            entries.push(entry);
        }
    }
    entries
}
