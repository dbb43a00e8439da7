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

//! Customer records: purchase volume, loyalty tier, and history.

use crate::tier::LoyaltyTier;

/// A buyer with cumulative purchase volume, a loyalty tier, and an
/// append-only purchase history.
///
/// The tier is re-evaluated on every recorded purchase, so between
/// operations it is always consistent with the cumulative total under the
/// promotion rule.
#[derive(Debug)]
pub struct Customer {
    name: String,
    tier: LoyaltyTier,
    /// Monotonically non-decreasing across the customer's lifetime.
    total_units_purchased: u64,
    /// Human-readable line items, immutable once appended.
    history: Vec<String>,
}

impl Customer {
    /// Creates a customer at the `Casual` tier with no purchases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tier: LoyaltyTier::Casual,
            total_units_purchased: 0,
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> LoyaltyTier {
        self.tier
    }

    pub fn total_units_purchased(&self) -> u64 {
        self.total_units_purchased
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Folds a completed purchase into the record: bumps the cumulative
    /// total, appends the history line, and re-evaluates the tier against
    /// the updated total.
    ///
    /// The caller must capture the pre-purchase discount before calling this;
    /// any promotion decided here applies to the next purchase only.
    ///
    /// # Panics
    ///
    /// Panics if the cumulative total would overflow `u64`.
    pub fn record_purchase(&mut self, item: &str, quantity: u64) {
        self.total_units_purchased = self
            .total_units_purchased
            .checked_add(quantity)
            .unwrap_or_else(|| panic!("purchase counter overflow for customer {:?}", self.name));
        self.history.push(format!("{quantity} x {item}"));
        self.tier = self.tier.promote(self.total_units_purchased);
    }
}
