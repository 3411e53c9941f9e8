//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart store backed by durable per-browser storage
//! - `menu` - Category and menu loading, image URL resolution
//! - `promo` - Promo code verification and stored promo state
//! - `checkout` - Order draft, payment session, payment page handoff
//! - `confirmation` - Finalized order lookup by payment session id
//! - `countdown` - Confirmation page countdown stream
//!
//! Services borrow the [`FoodApiClient`](crate::api::FoodApiClient) and
//! configuration from `AppState` and take storage as a
//! [`KeyValueStore`](crate::storage::KeyValueStore), so they run the same
//! against a browser session or an in-memory store.

pub mod cart;
pub mod checkout;
pub mod confirmation;
pub mod countdown;
pub mod menu;
pub mod promo;

pub use cart::CartStore;
pub use checkout::{CheckoutError, CheckoutHandoff, CheckoutOrchestrator, PaymentRedirect};
pub use confirmation::Confirmation;
pub use countdown::{CountdownEvent, countdown};
pub use menu::{MenuLoader, MenuState};
pub use promo::PromoVerifier;
