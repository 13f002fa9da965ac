pub mod app;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod currency;
pub mod events;
pub mod logging;
pub mod output;
pub mod storage;
pub mod utils;
pub mod view;

pub use controller::{Notice, Settings, Storefront, StorefrontError, StorefrontView};

#[cfg(test)]
mod tests;
