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

//! Market aggregate and the purchase transaction.
//!
//! The [`Market`] owns two registries (vendors, customers) and is the only
//! entry point for mutating them. Lifecycle operations are thin keyed-map
//! CRUD; `purchase` is the transactional core: it validates every
//! precondition across both registries before mutating anything, then
//! applies all effects under one lock acquisition.
//!
//! # Atomicity
//!
//! Every operation takes the market-wide lock exactly once. Since all
//! preconditions are checked before the first mutation, a failed operation
//! leaves no partial state, and no observer ever sees a purchase half
//! applied. There is no rollback path because none is needed.

use crate::base::{CustomerId, VendorId};
use crate::customer::Customer;
use crate::registry::Registry;
use crate::tier::LoyaltyTier;
use crate::vendor::Vendor;
use crate::MarketError;
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug)]
struct MarketData {
    vendors: Registry<VendorId, Vendor>,
    customers: Registry<CustomerId, Customer>,
}

/// Point-in-time copy of a vendor record, for reporting and assertions.
///
/// Inventory lines are sorted by item name so snapshots of equal state
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorSnapshot {
    pub id: VendorId,
    pub name: String,
    pub inventory: Vec<(String, u64)>,
    pub total_units_sold: u64,
}

/// Point-in-time copy of a customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub name: String,
    pub tier: LoyaltyTier,
    pub total_units_purchased: u64,
    pub history: Vec<String>,
}

/// Top-level marketplace aggregate.
///
/// The hosting environment is expected to linearize operations per market;
/// the internal mutex is the single mutual-exclusion boundary that makes
/// each operation atomic if the value is nevertheless shared across threads.
///
/// # Invariants
///
/// - Vendor and customer IDs are unique within their registry.
/// - Inventory quantities and both cumulative counters never go negative.
/// - A customer's tier always matches the promotion rule for their
///   cumulative total between operations, and never regresses.
#[derive(Debug)]
pub struct Market {
    name: String,
    inner: Mutex<MarketData>,
}

impl Market {
    /// Creates a market with empty vendor and customer registries.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(MarketData {
                vendors: Registry::new(),
                customers: Registry::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a vendor under a caller-chosen ID with an empty inventory.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::DuplicateId`] if the ID is taken; the existing
    /// vendor is unchanged.
    pub fn register_vendor(&self, id: VendorId, name: impl Into<String>) -> Result<(), MarketError> {
        self.inner.lock().vendors.insert(id, Vendor::new(name))
    }

    /// Registers a customer under a caller-chosen ID at the `Casual` tier.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::DuplicateId`] if the ID is taken.
    pub fn register_customer(
        &self,
        id: CustomerId,
        name: impl Into<String>,
    ) -> Result<(), MarketError> {
        self.inner.lock().customers.insert(id, Customer::new(name))
    }

    /// Removes a vendor; its inventory is discarded without reconciliation.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::VendorNotFound`] if no vendor has this ID.
    pub fn delete_vendor(&self, id: VendorId) -> Result<(), MarketError> {
        self.inner
            .lock()
            .vendors
            .remove(id)
            .map(|_| ())
            .ok_or(MarketError::VendorNotFound)
    }

    /// Removes a customer along with their purchase history.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::CustomerNotFound`] if no customer has this ID.
    pub fn delete_customer(&self, id: CustomerId) -> Result<(), MarketError> {
        self.inner
            .lock()
            .customers
            .remove(id)
            .map(|_| ())
            .ok_or(MarketError::CustomerNotFound)
    }

    /// Consumes the market, signalling the owning store to release it.
    ///
    /// Deletion is permissive: non-empty registries do not block it, and any
    /// remaining vendor or customer data is discarded with the value.
    pub fn delete(self) {}

    /// Adds stock to a vendor's inventory, accumulating onto an existing
    /// line or creating a new one.
    ///
    /// # Errors
    ///
    /// - [`MarketError::VendorNotFound`] - no vendor has this ID.
    /// - [`MarketError::InvalidQuantity`] - `qty` is zero.
    pub fn add_stock(&self, vendor_id: VendorId, item: &str, qty: u64) -> Result<(), MarketError> {
        self.inner
            .lock()
            .vendors
            .get_mut(vendor_id)
            .ok_or(MarketError::VendorNotFound)?
            .add_stock(item, qty)
    }

    /// Executes a purchase of `quantity` units of `item` from a vendor on
    /// behalf of a customer, returning the receipt.
    ///
    /// Preconditions are checked in a fixed order before any mutation; once
    /// they all hold, every effect applies together:
    ///
    /// | Step | Effect |
    /// |------|--------|
    /// | 1 | Capture the discount from the customer's current tier |
    /// | 2 | Compute `charged = floor(quantity * (100 - discount) / 100)` |
    /// | 3 | Decrement the vendor's stock of `item` by `quantity` |
    /// | 4 | Increment the vendor's total units sold |
    /// | 5 | Increment the customer's total units purchased |
    /// | 6 | Append a `"{quantity} x {item}"` history line |
    /// | 7 | Re-evaluate the tier against the updated total |
    ///
    /// A purchase that pushes the customer over a tier threshold is charged
    /// at the old rate; the promotion applies from the next purchase.
    ///
    /// # Errors
    ///
    /// - [`MarketError::VendorNotFound`] - `vendor_id` is not registered.
    /// - [`MarketError::CustomerNotFound`] - `customer_id` is not registered.
    /// - [`MarketError::InvalidQuantity`] - `quantity` is zero.
    /// - [`MarketError::ItemUnavailable`] - item never stocked, or stock
    ///   below `quantity` (the two are not distinguished).
    pub fn purchase(
        &self,
        vendor_id: VendorId,
        customer_id: CustomerId,
        item: &str,
        quantity: u64,
    ) -> Result<String, MarketError> {
        let mut guard = self.inner.lock();
        // Split the borrow so vendor and customer can be mutated in the
        // same critical section.
        let data = &mut *guard;

        let vendor = data
            .vendors
            .get_mut(vendor_id)
            .ok_or(MarketError::VendorNotFound)?;
        let customer = data
            .customers
            .get_mut(customer_id)
            .ok_or(MarketError::CustomerNotFound)?;
        if quantity == 0 {
            return Err(MarketError::InvalidQuantity);
        }
        if vendor.stock_of(item) < quantity {
            return Err(MarketError::ItemUnavailable);
        }

        // Discount locks in before any promotion this purchase may earn.
        let tier_at_start = customer.tier();
        let discount = tier_at_start.discount_percent();
        let charged = tier_at_start.charge(quantity);

        // All preconditions hold; nothing below can fail.
        vendor.take_stock(item, quantity)?;
        vendor.record_sale(quantity);
        customer.record_purchase(item, quantity);

        Ok(format!(
            "Purchased {quantity} x {item} for {charged} (discount {discount}%)"
        ))
    }

    /// Builds a one-line status report for a customer.
    ///
    /// Format: `{name} ({tier}): {total} units purchased`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::CustomerNotFound`] if no customer has this ID.
    pub fn describe_customer(&self, id: CustomerId) -> Result<String, MarketError> {
        let data = self.inner.lock();
        let customer = data.customers.get(id).ok_or(MarketError::CustomerNotFound)?;
        Ok(format!(
            "{} ({}): {} units purchased",
            customer.name(),
            customer.tier(),
            customer.total_units_purchased()
        ))
    }

    /// Snapshots a single vendor.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::VendorNotFound`] if no vendor has this ID.
    pub fn vendor(&self, id: VendorId) -> Result<VendorSnapshot, MarketError> {
        let data = self.inner.lock();
        let vendor = data.vendors.get(id).ok_or(MarketError::VendorNotFound)?;
        Ok(snapshot_vendor(id, vendor))
    }

    /// Snapshots a single customer.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::CustomerNotFound`] if no customer has this ID.
    pub fn customer(&self, id: CustomerId) -> Result<CustomerSnapshot, MarketError> {
        let data = self.inner.lock();
        let customer = data.customers.get(id).ok_or(MarketError::CustomerNotFound)?;
        Ok(snapshot_customer(id, customer))
    }

    /// Snapshots all vendors in ascending ID order.
    pub fn vendors(&self) -> Vec<VendorSnapshot> {
        let data = self.inner.lock();
        data.vendors
            .iter_sorted()
            .map(|(id, vendor)| snapshot_vendor(id, vendor))
            .collect()
    }

    /// Snapshots all customers in ascending ID order.
    pub fn customers(&self) -> Vec<CustomerSnapshot> {
        let data = self.inner.lock();
        data.customers
            .iter_sorted()
            .map(|(id, customer)| snapshot_customer(id, customer))
            .collect()
    }

    pub fn vendor_count(&self) -> usize {
        self.inner.lock().vendors.len()
    }

    pub fn customer_count(&self) -> usize {
        self.inner.lock().customers.len()
    }
}

fn snapshot_vendor(id: VendorId, vendor: &Vendor) -> VendorSnapshot {
    let mut inventory: Vec<(String, u64)> = vendor
        .inventory()
        .map(|(item, qty)| (item.to_owned(), qty))
        .collect();
    inventory.sort();
    VendorSnapshot {
        id,
        name: vendor.name().to_owned(),
        inventory,
        total_units_sold: vendor.total_units_sold(),
    }
}

fn snapshot_customer(id: CustomerId, customer: &Customer) -> CustomerSnapshot {
    CustomerSnapshot {
        id,
        name: customer.name().to_owned(),
        tier: customer.tier(),
        total_units_purchased: customer.total_units_purchased(),
        history: customer.history().to_vec(),
    }
}
