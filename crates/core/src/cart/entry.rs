use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// One line in the cart.
///
/// `id` always equals `product.id`. A stored entry never has a zero quantity;
/// the ledger removes the entry instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: ProductId,
    pub quantity: u32,
    pub product: Product,
}

impl CartEntry {
    pub(crate) fn new(product: Product) -> Self {
        Self {
            id: product.id,
            quantity: 1,
            product,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}
