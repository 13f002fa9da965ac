use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::cart::{Cart, CartItem, Receipt, CART_STORAGE_KEY};
use crate::catalog::{self, PriceRule, Product};
use crate::currency::CurrencyFormat;
use crate::events::Action;
use crate::storage::{KeyValueStore, StorageError};
use crate::utils;
use crate::view::{self, CategoryFilter, PageIndicator, ViewState};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch product data. Please try again later.";

#[derive(Clone, Debug)]
pub struct Settings {
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub price_rule: PriceRule,
    pub currency: CurrencyFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: view::DEFAULT_PAGE_SIZE,
            page_size_options: utils::DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            price_rule: PriceRule::default(),
            currency: CurrencyFormat::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("invalid page size {value}, expected positive integer")]
    InvalidPageSize { value: usize },

    #[error("product {id} is not in the catalog")]
    UnknownProduct { id: u64 },

    #[error("failed to encode cart: {source}")]
    CartEncode {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A message meant for the person at the keyboard, the terminal
/// counterpart of a browser `alert`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub catalog: Vec<Product>,
    pub filtered: Vec<Product>,
    pub cart: Cart,
    pub view: ViewState,
}

/// Everything a renderer needs, detached from the controller.
#[derive(Clone, Debug, Serialize)]
pub struct StorefrontView {
    pub products: Vec<Product>,
    pub filtered_count: usize,
    pub page: PageIndicator,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub categories: Vec<String>,
    pub active_category: String,
    pub cart: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: f64,
    #[serde(skip)]
    pub currency: CurrencyFormat,
}

impl StorefrontView {
    pub fn format_price(&self, amount: f64) -> String {
        self.currency.format(amount)
    }
}

pub struct Storefront<S: KeyValueStore> {
    state: AppState,
    store: S,
    settings: Settings,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore> Storefront<S> {
    /// Builds a controller and restores whatever cart the store holds.
    pub fn new(store: S, settings: Settings) -> Result<Self, StorefrontError> {
        let view = ViewState::new(settings.page_size).ok_or(StorefrontError::InvalidPageSize {
            value: settings.page_size,
        })?;
        let cart = restore_cart(&store)?;
        debug!(entries = cart.len(), "cart restored");
        Ok(Self {
            state: AppState {
                view,
                cart,
                ..AppState::default()
            },
            store,
            settings,
            notices: Vec::new(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.state.cart
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Fetches and installs the catalog. A failure is logged, turned into
    /// a notice and leaves the catalog empty; it is not returned as an error.
    pub async fn load_catalog(&mut self, client: &reqwest::Client, url: &str) -> bool {
        match catalog::fetch_catalog(client, url, &self.settings.price_rule).await {
            Ok(products) => {
                self.set_catalog(products);
                true
            }
            Err(e) => {
                error!(error = %e, "catalog fetch failed");
                self.set_catalog(Vec::new());
                self.notices.push(Notice::Error(FETCH_FAILED_MESSAGE.to_string()));
                false
            }
        }
    }

    pub fn set_catalog(&mut self, products: Vec<Product>) {
        self.state.catalog = products;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.state.filtered =
            view::filter_by_category(&self.state.catalog, self.state.view.category());
    }

    /// Applies one user action. Returns whether anything changed.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, StorefrontError> {
        debug!(?action, "dispatch");
        let filtered_len = self.state.filtered.len();
        match action {
            Action::AddToCart(id) => self.add_to_cart(id).map(|_| true),
            Action::RemoveOne(id) => self.remove_one(id),
            Action::RemoveAll(id) => self.remove_all(id),
            Action::Checkout => self.checkout().map(|_| true),
            Action::NextPage => Ok(self.state.view.next_page(filtered_len)),
            Action::PrevPage => Ok(self.state.view.prev_page()),
            Action::GoToPage(page) => Ok(self.state.view.go_to_page(page, filtered_len)),
            Action::SetPageSize(size) => {
                self.set_page_size(size)?;
                Ok(true)
            }
            Action::FilterCategory(filter) => {
                self.filter_by_category(filter);
                Ok(true)
            }
        }
    }

    pub fn filter_by_category(&mut self, filter: CategoryFilter) {
        self.state.view.set_category(filter);
        self.refilter();
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), StorefrontError> {
        if !self.state.view.set_page_size(size) {
            return Err(StorefrontError::InvalidPageSize { value: size });
        }
        Ok(())
    }

    /// Returns the quantity now in the cart for `id`.
    pub fn add_to_cart(&mut self, id: u64) -> Result<u32, StorefrontError> {
        let product = self
            .state
            .catalog
            .iter()
            .find(|p| p.id == id)
            .or_else(|| self.state.cart.get(id).map(|item| &item.product))
            .cloned()
            .ok_or(StorefrontError::UnknownProduct { id })?;
        let mut cart = self.state.cart.clone();
        let quantity = cart.add(&product);
        self.commit_cart(cart)?;
        Ok(quantity)
    }

    pub fn remove_one(&mut self, id: u64) -> Result<bool, StorefrontError> {
        let mut cart = self.state.cart.clone();
        if !cart.remove_one(id) {
            return Ok(false);
        }
        self.commit_cart(cart)?;
        Ok(true)
    }

    pub fn remove_all(&mut self, id: u64) -> Result<bool, StorefrontError> {
        let mut cart = self.state.cart.clone();
        if !cart.remove_all(id) {
            return Ok(false);
        }
        self.commit_cart(cart)?;
        Ok(true)
    }

    /// Clears the stored cart first; the in-memory cart and the total notice
    /// only change once the store has accepted the removal.
    pub fn checkout(&mut self) -> Result<Receipt, StorefrontError> {
        self.store.remove(CART_STORAGE_KEY)?;
        let receipt = self.state.cart.checkout();
        self.notices.push(Notice::Info(format!(
            "Total price: {}",
            self.settings.currency.format(receipt.total_price)
        )));
        Ok(receipt)
    }

    /// Writes `cart` to the store and installs it only if the write succeeded.
    fn commit_cart(&mut self, cart: Cart) -> Result<(), StorefrontError> {
        let json = cart
            .to_json()
            .map_err(|e| StorefrontError::CartEncode { source: e })?;
        self.store.set(CART_STORAGE_KEY, &json)?;
        self.state.cart = cart;
        Ok(())
    }

    pub fn view(&self) -> StorefrontView {
        let state = &self.state;
        StorefrontView {
            products: state.view.visible(&state.filtered).to_vec(),
            filtered_count: state.filtered.len(),
            page: state.view.indicator(state.filtered.len()),
            page_size: state.view.page_size(),
            page_size_options: page_size_options(
                &self.settings.page_size_options,
                state.view.page_size(),
            ),
            categories: catalog::categories(&state.catalog),
            active_category: state.view.category().as_str().to_string(),
            cart: state.cart.items().to_vec(),
            total_items: state.cart.total_items(),
            total_price: state.cart.total_price(),
            currency: self.settings.currency.clone(),
        }
    }
}

fn restore_cart<S: KeyValueStore>(store: &S) -> Result<Cart, StorefrontError> {
    let Some(json) = store.get(CART_STORAGE_KEY)? else {
        return Ok(Cart::new());
    };
    match Cart::from_json(&json) {
        Ok(cart) => Ok(cart),
        Err(e) => {
            warn!(error = %e, "stored cart is unreadable, starting empty");
            Ok(Cart::new())
        }
    }
}

/// The selector always offers the active size, even when it was set from
/// outside the configured list.
fn page_size_options(configured: &[usize], active: usize) -> Vec<usize> {
    let mut options = configured.to_vec();
    if !options.contains(&active) {
        options.push(active);
        options.sort_unstable();
    }
    options
}
