//! Terminal browser for the PokeAPI catalog: a filterable list screen and a
//! detail screen with prev/next navigation.

pub mod app;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod logging;
pub mod models;
pub mod sprite;
pub mod theme;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod test_support;
