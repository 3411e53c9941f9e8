//! Grab Eat Core - Shared domain types and rules.
//!
//! This crate holds everything about the ordering flow that can be decided
//! without talking to the network:
//! - menu items, categories, and menu filtering
//! - the cart mapping and its quantity invariant
//! - promo code state and discount arithmetic
//! - checkout payloads and finalized order documents
//! - contact and job application form validation
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage, no HTTP clients. The `storefront` crate wires these into the API
//! client, durable storage, and HTTP routes.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, and statuses
//! - [`menu`] - Menu items and filtering
//! - [`cart`] - Cart mapping and resolved cart lines
//! - [`promo`] - Promo code application state
//! - [`pricing`] - Discount percentages, delivery fees, and order totals
//! - [`customer`] - Checkout form validation
//! - [`order`] - Checkout request and finalized order
//! - [`forms`] - Contact and job application forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod customer;
pub mod forms;
pub mod menu;
pub mod order;
pub mod pricing;
pub mod promo;
pub mod types;

pub use cart::{Cart, CartLine};
pub use customer::{Customer, CustomerInfo};
pub use forms::FieldErrors;
pub use menu::{ALL_CATEGORIES, Category, CategoryRef, MenuFilter, MenuItem};
pub use order::{CheckoutRequest, Order, OrderLine};
pub use pricing::{DeliveryPolicy, DiscountPercent, OrderTotals};
pub use promo::{PromoApplication, PromoRequest, PromoStatus};
pub use types::*;
