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

//! Vendor records and per-item inventory.
//!
//! Quantities are `u64`, so a negative quantity is unrepresentable; the
//! availability check before every decrement is what keeps the subtraction
//! from underflowing. Counter overflow on the accumulate path is an
//! invariant violation, not an input error, and panics.

use crate::MarketError;
use std::collections::HashMap;

/// A seller with a named-item inventory and cumulative sales counter.
#[derive(Debug)]
pub struct Vendor {
    name: String,
    /// Quantity on hand, indexed by item name.
    inventory: HashMap<String, u64>,
    total_units_sold: u64,
}

impl Vendor {
    /// Creates a vendor with an empty inventory and zero units sold.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inventory: HashMap::new(),
            total_units_sold: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantity on hand for `item`; zero if the item was never stocked.
    pub fn stock_of(&self, item: &str) -> u64 {
        self.inventory.get(item).copied().unwrap_or(0)
    }

    pub fn total_units_sold(&self) -> u64 {
        self.total_units_sold
    }

    /// Iterates over all tracked inventory lines.
    pub fn inventory(&self) -> impl Iterator<Item = (&str, u64)> {
        self.inventory.iter().map(|(item, qty)| (item.as_str(), *qty))
    }

    /// Adds `qty` units of `item`, accumulating onto an existing line or
    /// creating a new one.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidQuantity`] if `qty` is zero.
    ///
    /// # Panics
    ///
    /// Panics if the accumulated quantity would overflow `u64`.
    pub fn add_stock(&mut self, item: &str, qty: u64) -> Result<(), MarketError> {
        if qty == 0 {
            return Err(MarketError::InvalidQuantity);
        }
        let line = self.inventory.entry(item.to_owned()).or_insert(0);
        *line = line
            .checked_add(qty)
            .unwrap_or_else(|| panic!("inventory counter overflow for item {item:?}"));
        Ok(())
    }

    /// Removes exactly `qty` units of `item` from stock.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::ItemUnavailable`] if the item is not tracked or
    /// fewer than `qty` units are on hand. The two cases are deliberately not
    /// distinguished.
    pub fn take_stock(&mut self, item: &str, qty: u64) -> Result<(), MarketError> {
        match self.inventory.get_mut(item) {
            Some(line) if *line >= qty => {
                *line -= qty;
                Ok(())
            }
            _ => Err(MarketError::ItemUnavailable),
        }
    }

    /// Folds a completed sale into the cumulative sales counter.
    ///
    /// # Panics
    ///
    /// Panics if the counter would overflow `u64`.
    pub fn record_sale(&mut self, qty: u64) {
        self.total_units_sold = self
            .total_units_sold
            .checked_add(qty)
            .unwrap_or_else(|| panic!("sales counter overflow for vendor {:?}", self.name));
    }
}
