//! The Minums storefront library.
//!
//! Maintains the drinks cart in client-local persistent storage, builds
//! priced line items from product detail selections, and derives the order
//! summary (subtotal, flat delivery fee, percentage tax) rendered on the
//! cart, checkout, and confirmation pages.
//!
//! The DOM surface itself is an external collaborator: this crate produces
//! view models ([`pages`]) and talks to the page chrome through the
//! [`ui::StorefrontUi`] seam.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod pages;
pub mod product;
pub mod storage;
pub mod ui;
