// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Market Ledger
//!
//! This library models a small marketplace ledger: vendors holding per-item
//! inventory, customers with purchase history and loyalty tiers, and an
//! atomic purchase transaction that adjusts inventory, sales totals,
//! purchase history, and loyalty tier together or not at all.
//!
//! ## Core Components
//!
//! - [`Market`]: Top-level aggregate owning the vendor and customer registries
//! - [`Vendor`]: Seller with a named-item inventory and cumulative sales counter
//! - [`Customer`]: Buyer with purchase volume, loyalty tier, and history
//! - [`LoyaltyTier`]: Promotion-only discount tier (Casual/Fanatic/Legend)
//! - [`MarketError`]: Error types for validation failures
//!
//! ## Example
//!
//! ```
//! use market_ledger_rs::{CustomerId, Market, VendorId};
//!
//! let market = Market::new("Night Market");
//! market.register_vendor(VendorId(1), "Snacks Inc").unwrap();
//! market.add_stock(VendorId(1), "Chips", 50).unwrap();
//! market.register_customer(CustomerId(1), "Alice").unwrap();
//!
//! let receipt = market
//!     .purchase(VendorId(1), CustomerId(1), "Chips", 10)
//!     .unwrap();
//! assert_eq!(receipt, "Purchased 10 x Chips for 10 (discount 0%)");
//! ```
//!
//! ## Thread Safety
//!
//! Operations on a market are expected to be linearized by the hosting
//! environment. Each [`Market`] guards its state with a single lock, so a
//! market shared across threads still applies every operation atomically.

mod base;
pub mod customer;
pub mod error;
mod market;
mod registry;
mod tier;
pub mod vendor;

pub use base::{CustomerId, VendorId};
pub use customer::Customer;
pub use error::MarketError;
pub use market::{CustomerSnapshot, Market, VendorSnapshot};
pub use registry::Registry;
pub use tier::LoyaltyTier;
