//! Fixed economy data: commodity prices, timings, probabilities and shop
//! catalogs. Nothing here is ever mutated.

mod catalog;
pub mod constants;

pub use catalog::{ShopId, ShopItem};
