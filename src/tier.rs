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

//! Loyalty tier state machine.
//!
//! Tiers form a closed, ordered set and only move forward:
//! - `Casual` ──100 units──► `Fanatic` ──500 units──► `Legend`
//! - `Casual` ──500 units in one jump──► `Legend`
//!
//! Promotion is evaluated against the cumulative purchase total *after* the
//! current purchase has been folded in, but the discount charged for that
//! purchase is the tier held when it started. A customer crossing a threshold
//! pays the old rate; the new rate applies from the next purchase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer loyalty tier with a fixed discount percentage.
///
/// Variant order matters: it defines the promotion ordering used by
/// [`LoyaltyTier::promote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoyaltyTier {
    /// Entry tier, no discount.
    Casual,
    /// Reached at 100 cumulative units, 5% discount.
    Fanatic,
    /// Reached at 500 cumulative units, 15% discount.
    Legend,
}

impl LoyaltyTier {
    /// Cumulative units needed to earn `Fanatic`.
    const FANATIC_THRESHOLD: u64 = 100;
    /// Cumulative units needed to earn `Legend`.
    const LEGEND_THRESHOLD: u64 = 500;

    /// Discount percentage granted by this tier.
    pub fn discount_percent(self) -> u64 {
        match self {
            LoyaltyTier::Casual => 0,
            LoyaltyTier::Fanatic => 5,
            LoyaltyTier::Legend => 15,
        }
    }

    /// Tier earned by a cumulative purchase total, ignoring any tier
    /// already held.
    fn earned_by(total_units: u64) -> LoyaltyTier {
        if total_units >= Self::LEGEND_THRESHOLD {
            LoyaltyTier::Legend
        } else if total_units >= Self::FANATIC_THRESHOLD {
            LoyaltyTier::Fanatic
        } else {
            LoyaltyTier::Casual
        }
    }

    /// Returns the tier after re-evaluating against `total_units`.
    ///
    /// Tiers never regress: a customer below a threshold keeps the tier they
    /// already hold. A single large purchase may skip `Fanatic` entirely.
    #[must_use]
    pub fn promote(self, total_units: u64) -> LoyaltyTier {
        self.max(Self::earned_by(total_units))
    }

    /// Cost charged for `quantity` units at this tier's discount.
    ///
    /// `floor(quantity * (100 - discount) / 100)` in integer math. The
    /// multiply is widened to `u128` so quantities near `u64::MAX` cannot
    /// overflow; the result never exceeds `quantity`, so the narrowing cast
    /// is lossless.
    pub fn charge(self, quantity: u64) -> u64 {
        let rate = 100 - self.discount_percent() as u128;
        (quantity as u128 * rate / 100) as u64
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoyaltyTier::Casual => "Casual",
            LoyaltyTier::Fanatic => "Fanatic",
            LoyaltyTier::Legend => "Legend",
        };
        write!(f, "{label}")
    }
}
