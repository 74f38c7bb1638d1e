//! Local cart commands.
//!
//! The cart is the same ledger the storefront uses, persisted through a
//! [`FileStore`]: one file per key in the data directory. The blob lives in
//! `<data dir>/cart-storage`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cornerstore_core::cart::{CartRepository, KeyValueCartRepository, KeyValueStore, StoreError};
use cornerstore_core::{CartLedger, ProductId};
use tracing::info;

use super::catalog;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".cornerstore";

/// A key-value store backed by plain files.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if valid {
            Ok(self.dir.join(key))
        } else {
            Err(StoreError::Unavailable(format!("invalid key {key:?}")))
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        std::fs::write(self.path(key)?, value).map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

/// The CLI's cart.
pub type LocalCart = CartLedger<KeyValueCartRepository<FileStore>>;

/// Load the cart kept in `dir`.
///
/// # Errors
///
/// Returns an I/O error if the data directory cannot be created.
pub fn open(dir: &Path) -> std::io::Result<LocalCart> {
    Ok(CartLedger::load(KeyValueCartRepository::new(FileStore::open(dir)?)))
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn show(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    print_cart(&open(dir)?);
    Ok(())
}

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns an error if the product is not in the catalog or the catalog
/// cannot be reached.
pub async fn add(dir: &Path, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let product = catalog::client()?.find_product(id).await?;

    let mut cart = open(dir)?;
    cart.add_item(&product);
    info!(product_id = %id, "Added to local cart");

    print_cart(&cart);
    Ok(())
}

/// Set the quantity of an entry.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn set(dir: &Path, id: ProductId, quantity: i64) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(dir)?;
    if cart.entry(id).is_none() {
        println!("Product {id} is not in the cart");
    }
    cart.update_quantity(id, quantity);

    print_cart(&cart);
    Ok(())
}

/// Remove an entry.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn remove(dir: &Path, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(dir)?;
    cart.remove_item(id);

    print_cart(&cart);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn clear(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(dir)?;
    cart.clear_cart();

    print_cart(&cart);
    Ok(())
}

fn print_cart<R: CartRepository>(cart: &CartLedger<R>) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for entry in cart.entries() {
        println!(
            "{:>4}  {:>3} x {:>10}  {:>10}  {}",
            entry.id.to_string(),
            entry.quantity,
            entry.product.price.to_string(),
            entry.line_total().to_string(),
            entry.product.title
        );
    }
    println!();
    println!("Items: {}", cart.item_count());
    println!("Total: {}", cart.total());
}
