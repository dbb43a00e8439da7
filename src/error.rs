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

//! Error types for market operations.
//!
//! Every variant is a deterministic caller-input validation failure. Errors
//! are detected before any mutation, so a failed operation leaves the market
//! untouched. Counter overflow is not represented here: overflowing a `u64`
//! inventory or sales counter is an invariant violation and panics.

use thiserror::Error;

/// Market operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// Registration attempted with an ID already present in the registry
    #[error("duplicate ID already registered")]
    DuplicateId,

    /// No vendor is registered under the given ID
    #[error("vendor not found")]
    VendorNotFound,

    /// No customer is registered under the given ID
    #[error("customer not found")]
    CustomerNotFound,

    /// A quantity argument was zero where a positive quantity is required
    #[error("invalid quantity (must be positive)")]
    InvalidQuantity,

    /// Requested item is not stocked, or stocked quantity is insufficient
    #[error("item unavailable or insufficient stock")]
    ItemUnavailable,
}
