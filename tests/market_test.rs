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

//! Market public API integration tests.

use market_ledger_rs::{CustomerId, LoyaltyTier, Market, MarketError, VendorId};

const V1: VendorId = VendorId(1);
const C1: CustomerId = CustomerId(1);

/// Market with one stocked vendor and one registered customer.
fn stocked_market(item: &str, qty: u64) -> Market {
    let market = Market::new("Test Market");
    market.register_vendor(V1, "Snacks Inc").unwrap();
    market.add_stock(V1, item, qty).unwrap();
    market.register_customer(C1, "Alice").unwrap();
    market
}

/// Drives a customer's cumulative total to `target` without promotion
/// mattering for the test (well-stocked vendor, whatever tier results).
fn buy_until_total(market: &Market, target: u64) {
    let mut bought = 0;
    while bought < target {
        let step = (target - bought).min(50);
        market.purchase(V1, C1, "Chips", step).unwrap();
        bought += step;
    }
}

// =============================================================================
// Lifecycle (CRUD shell)
// =============================================================================

#[test]
fn new_market_is_empty() {
    let market = Market::new("Night Market");
    assert_eq!(market.name(), "Night Market");
    assert_eq!(market.vendor_count(), 0);
    assert_eq!(market.customer_count(), 0);
}

#[test]
fn register_vendor_starts_with_empty_inventory() {
    let market = Market::new("Test Market");
    market.register_vendor(V1, "Snacks Inc").unwrap();

    let vendor = market.vendor(V1).unwrap();
    assert_eq!(vendor.name, "Snacks Inc");
    assert!(vendor.inventory.is_empty());
    assert_eq!(vendor.total_units_sold, 0);
}

#[test]
fn register_customer_starts_casual() {
    let market = Market::new("Test Market");
    market.register_customer(C1, "Alice").unwrap();

    let customer = market.customer(C1).unwrap();
    assert_eq!(customer.name, "Alice");
    assert_eq!(customer.tier, LoyaltyTier::Casual);
    assert_eq!(customer.total_units_purchased, 0);
    assert!(customer.history.is_empty());
}

/// Scenario: `register_vendor` called twice with the same ID.
#[test]
fn duplicate_vendor_registration_rejected() {
    let market = Market::new("Test Market");
    market.register_vendor(V1, "Snacks Inc").unwrap();
    market.add_stock(V1, "Chips", 50).unwrap();

    let result = market.register_vendor(V1, "Impostor");
    assert_eq!(result, Err(MarketError::DuplicateId));

    // First vendor's state unchanged.
    let vendor = market.vendor(V1).unwrap();
    assert_eq!(vendor.name, "Snacks Inc");
    assert_eq!(vendor.inventory, vec![("Chips".to_owned(), 50)]);
}

#[test]
fn duplicate_customer_registration_rejected() {
    let market = Market::new("Test Market");
    market.register_customer(C1, "Alice").unwrap();

    let result = market.register_customer(C1, "Impostor");
    assert_eq!(result, Err(MarketError::DuplicateId));
    assert_eq!(market.customer(C1).unwrap().name, "Alice");
}

#[test]
fn vendor_and_customer_id_spaces_are_independent() {
    let market = Market::new("Test Market");
    market.register_vendor(V1, "Snacks Inc").unwrap();
    // Same numeric ID in the other registry is fine.
    market.register_customer(C1, "Alice").unwrap();

    assert_eq!(market.vendor_count(), 1);
    assert_eq!(market.customer_count(), 1);
}

#[test]
fn delete_vendor_discards_inventory() {
    let market = Market::new("Test Market");
    market.register_vendor(V1, "Snacks Inc").unwrap();
    market.add_stock(V1, "Chips", 50).unwrap();

    market.delete_vendor(V1).unwrap();
    assert_eq!(market.vendor_count(), 0);
    assert_eq!(market.vendor(V1), Err(MarketError::VendorNotFound));
}

#[test]
fn delete_absent_vendor_returns_not_found() {
    let market = Market::new("Test Market");
    assert_eq!(market.delete_vendor(V1), Err(MarketError::VendorNotFound));
}

#[test]
fn delete_absent_customer_returns_not_found() {
    let market = Market::new("Test Market");
    assert_eq!(
        market.delete_customer(C1),
        Err(MarketError::CustomerNotFound)
    );
}

#[test]
fn deleted_id_can_be_reused() {
    let market = Market::new("Test Market");
    market.register_vendor(V1, "First").unwrap();
    market.delete_vendor(V1).unwrap();

    market.register_vendor(V1, "Second").unwrap();
    assert_eq!(market.vendor(V1).unwrap().name, "Second");
}

#[test]
fn delete_market_is_permissive_about_contents() {
    let market = stocked_market("Chips", 50);
    market.purchase(V1, C1, "Chips", 10).unwrap();

    // Non-empty registries and in-flight data do not block deletion.
    market.delete();
}

#[test]
fn describe_customer_reports_name_tier_and_total() {
    let market = stocked_market("Chips", 200);
    market.purchase(V1, C1, "Chips", 10).unwrap();

    assert_eq!(
        market.describe_customer(C1).unwrap(),
        "Alice (Casual): 10 units purchased"
    );
}

#[test]
fn describe_absent_customer_returns_not_found() {
    let market = Market::new("Test Market");
    assert_eq!(
        market.describe_customer(C1),
        Err(MarketError::CustomerNotFound)
    );
}

// =============================================================================
// Purchase transaction
// =============================================================================

/// Scenario: first purchase at the Casual tier.
///
/// 1. Vendor stocked with 50 Chips
/// 2. Casual customer buys 10 at 0% discount
/// 3. Charged 10, stock 40, customer total 10, tier stays Casual
#[test]
fn casual_purchase_full_price() {
    let market = stocked_market("Chips", 50);

    let receipt = market.purchase(V1, C1, "Chips", 10).unwrap();
    assert_eq!(receipt, "Purchased 10 x Chips for 10 (discount 0%)");

    let vendor = market.vendor(V1).unwrap();
    assert_eq!(vendor.inventory, vec![("Chips".to_owned(), 40)]);
    assert_eq!(vendor.total_units_sold, 10);

    let customer = market.customer(C1).unwrap();
    assert_eq!(customer.total_units_purchased, 10);
    assert_eq!(customer.tier, LoyaltyTier::Casual);
    assert_eq!(customer.history, vec!["10 x Chips".to_owned()]);
}

/// Scenario: the purchase that crosses a threshold is charged at the old
/// rate; the promotion applies to the next purchase.
///
/// 1. Customer at total 95, still Casual
/// 2. Buys 10 at 0% -> charged 10, total 105, tier becomes Fanatic
/// 3. Next purchase of 10 is charged floor(10 * 95 / 100) = 9
#[test]
fn promotion_applies_to_next_purchase() {
    let market = stocked_market("Chips", 1000);
    buy_until_total(&market, 95);
    assert_eq!(market.customer(C1).unwrap().tier, LoyaltyTier::Casual);

    let receipt = market.purchase(V1, C1, "Chips", 10).unwrap();
    assert_eq!(receipt, "Purchased 10 x Chips for 10 (discount 0%)");

    let customer = market.customer(C1).unwrap();
    assert_eq!(customer.total_units_purchased, 105);
    assert_eq!(customer.tier, LoyaltyTier::Fanatic);

    let receipt = market.purchase(V1, C1, "Chips", 10).unwrap();
    assert_eq!(receipt, "Purchased 10 x Chips for 9 (discount 5%)");
}

/// Scenario: one large purchase jumps from total 90 straight to Legend.
#[test]
fn large_purchase_skips_fanatic_tier() {
    let market = stocked_market("Chips", 1000);
    buy_until_total(&market, 90);
    assert_eq!(market.customer(C1).unwrap().tier, LoyaltyTier::Casual);

    market.purchase(V1, C1, "Chips", 510).unwrap();

    let customer = market.customer(C1).unwrap();
    assert_eq!(customer.total_units_purchased, 600);
    assert_eq!(customer.tier, LoyaltyTier::Legend);
}

#[test]
fn legend_discount_charged_after_promotion() {
    let market = stocked_market("Chips", 1000);
    buy_until_total(&market, 500);
    assert_eq!(market.customer(C1).unwrap().tier, LoyaltyTier::Legend);

    // floor(20 * 85 / 100) = 17
    let receipt = market.purchase(V1, C1, "Chips", 20).unwrap();
    assert_eq!(receipt, "Purchased 20 x Chips for 17 (discount 15%)");
}

#[test]
fn purchase_charge_uses_floor_division() {
    let market = stocked_market("Chips", 1000);
    buy_until_total(&market, 100);
    assert_eq!(market.customer(C1).unwrap().tier, LoyaltyTier::Fanatic);

    // floor(7 * 95 / 100) = floor(6.65) = 6
    let receipt = market.purchase(V1, C1, "Chips", 7).unwrap();
    assert_eq!(receipt, "Purchased 7 x Chips for 6 (discount 5%)");
}

#[test]
fn purchase_depletes_stock_exactly() {
    let market = stocked_market("Chips", 10);
    market.purchase(V1, C1, "Chips", 10).unwrap();

    let vendor = market.vendor(V1).unwrap();
    assert_eq!(vendor.inventory, vec![("Chips".to_owned(), 0)]);

    // Depleted stock is unavailable, same as never stocked.
    let result = market.purchase(V1, C1, "Chips", 1);
    assert_eq!(result, Err(MarketError::ItemUnavailable));
}

// =============================================================================
// Purchase preconditions: each fails fast with no state change
// =============================================================================

#[test]
fn purchase_unknown_vendor_rejected() {
    let market = Market::new("Test Market");
    market.register_customer(C1, "Alice").unwrap();

    let result = market.purchase(V1, C1, "Chips", 10);
    assert_eq!(result, Err(MarketError::VendorNotFound));
    assert_eq!(market.customer(C1).unwrap().total_units_purchased, 0);
}

#[test]
fn purchase_unknown_customer_rejected() {
    let market = Market::new("Test Market");
    market.register_vendor(V1, "Snacks Inc").unwrap();
    market.add_stock(V1, "Chips", 50).unwrap();

    let result = market.purchase(V1, C1, "Chips", 10);
    assert_eq!(result, Err(MarketError::CustomerNotFound));
    assert_eq!(market.vendor(V1).unwrap().inventory, vec![("Chips".to_owned(), 50)]);
}

/// Scenario: purchase with quantity zero fails and changes nothing.
#[test]
fn purchase_zero_quantity_rejected() {
    let market = stocked_market("Chips", 50);

    let result = market.purchase(V1, C1, "Chips", 0);
    assert_eq!(result, Err(MarketError::InvalidQuantity));

    assert_eq!(market.vendor(V1).unwrap().inventory, vec![("Chips".to_owned(), 50)]);
    assert_eq!(market.customer(C1).unwrap().total_units_purchased, 0);
}

/// Scenario: never-stocked item and insufficient stock both fail with
/// ItemUnavailable, leaving all state unchanged.
#[test]
fn purchase_unavailable_item_rejected() {
    let market = stocked_market("Chips", 5);

    let never_stocked = market.purchase(V1, C1, "Soda", 1);
    assert_eq!(never_stocked, Err(MarketError::ItemUnavailable));

    let insufficient = market.purchase(V1, C1, "Chips", 6);
    assert_eq!(insufficient, Err(MarketError::ItemUnavailable));

    let vendor = market.vendor(V1).unwrap();
    assert_eq!(vendor.inventory, vec![("Chips".to_owned(), 5)]);
    assert_eq!(vendor.total_units_sold, 0);

    let customer = market.customer(C1).unwrap();
    assert_eq!(customer.total_units_purchased, 0);
    assert!(customer.history.is_empty());
}

#[test]
fn precondition_order_vendor_before_customer_before_quantity() {
    let market = Market::new("Test Market");

    // Nothing registered: vendor check fires first, even with quantity 0.
    assert_eq!(
        market.purchase(V1, C1, "Chips", 0),
        Err(MarketError::VendorNotFound)
    );

    market.register_vendor(V1, "Snacks Inc").unwrap();
    // Vendor exists, customer doesn't: customer check fires before quantity.
    assert_eq!(
        market.purchase(V1, C1, "Chips", 0),
        Err(MarketError::CustomerNotFound)
    );

    market.register_customer(C1, "Alice").unwrap();
    // Both exist: quantity check fires before availability.
    assert_eq!(
        market.purchase(V1, C1, "Chips", 0),
        Err(MarketError::InvalidQuantity)
    );
    assert_eq!(
        market.purchase(V1, C1, "Chips", 1),
        Err(MarketError::ItemUnavailable)
    );
}

// =============================================================================
// Multi-entity flows
// =============================================================================

#[test]
fn purchases_across_vendors_share_one_loyalty_total() {
    let market = Market::new("Test Market");
    market.register_vendor(VendorId(1), "Snacks Inc").unwrap();
    market.register_vendor(VendorId(2), "Drinks Co").unwrap();
    market.add_stock(VendorId(1), "Chips", 100).unwrap();
    market.add_stock(VendorId(2), "Soda", 100).unwrap();
    market.register_customer(C1, "Alice").unwrap();

    market.purchase(VendorId(1), C1, "Chips", 60).unwrap();
    market.purchase(VendorId(2), C1, "Soda", 40).unwrap();

    let customer = market.customer(C1).unwrap();
    assert_eq!(customer.total_units_purchased, 100);
    assert_eq!(customer.tier, LoyaltyTier::Fanatic);
    assert_eq!(
        customer.history,
        vec!["60 x Chips".to_owned(), "40 x Soda".to_owned()]
    );

    assert_eq!(market.vendor(VendorId(1)).unwrap().total_units_sold, 60);
    assert_eq!(market.vendor(VendorId(2)).unwrap().total_units_sold, 40);
}

#[test]
fn customers_have_independent_tiers() {
    let market = Market::new("Test Market");
    market.register_vendor(V1, "Snacks Inc").unwrap();
    market.add_stock(V1, "Chips", 1000).unwrap();
    market.register_customer(CustomerId(1), "Alice").unwrap();
    market.register_customer(CustomerId(2), "Bob").unwrap();

    market.purchase(V1, CustomerId(1), "Chips", 500).unwrap();
    market.purchase(V1, CustomerId(2), "Chips", 10).unwrap();

    assert_eq!(market.customer(CustomerId(1)).unwrap().tier, LoyaltyTier::Legend);
    assert_eq!(market.customer(CustomerId(2)).unwrap().tier, LoyaltyTier::Casual);
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn customer_snapshot_serializes_to_json() {
    let market = stocked_market("Chips", 200);
    market.purchase(V1, C1, "Chips", 10).unwrap();

    let snapshot = market.customer(C1).unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    // IDs are transparent newtypes: bare numbers, not wrapped objects.
    assert_eq!(parsed["id"], 1);
    assert_eq!(parsed["name"], "Alice");
    assert_eq!(parsed["tier"], "Casual");
    assert_eq!(parsed["total_units_purchased"], 10);
    assert_eq!(parsed["history"][0], "10 x Chips");
}

#[test]
fn vendor_snapshot_serializes_to_json() {
    let market = stocked_market("Chips", 50);
    market.add_stock(V1, "Soda", 30).unwrap();
    market.purchase(V1, C1, "Chips", 10).unwrap();

    let snapshot = market.vendor(V1).unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["id"], 1);
    assert_eq!(parsed["name"], "Snacks Inc");
    assert_eq!(parsed["total_units_sold"], 10);
    // Inventory lines are sorted by item name.
    assert_eq!(parsed["inventory"][0][0], "Chips");
    assert_eq!(parsed["inventory"][0][1], 40);
    assert_eq!(parsed["inventory"][1][0], "Soda");
    assert_eq!(parsed["inventory"][1][1], 30);
}

#[test]
fn ids_round_trip_through_json() {
    let vendor_id: VendorId = serde_json::from_str("42").unwrap();
    assert_eq!(vendor_id, VendorId(42));
    assert_eq!(serde_json::to_string(&vendor_id).unwrap(), "42");

    let customer_id: CustomerId = serde_json::from_str("7").unwrap();
    assert_eq!(customer_id, CustomerId(7));
    assert_eq!(serde_json::to_string(&customer_id).unwrap(), "7");
}

#[test]
fn loyalty_tier_round_trips_through_json() {
    for tier in [LoyaltyTier::Casual, LoyaltyTier::Fanatic, LoyaltyTier::Legend] {
        let json = serde_json::to_string(&tier).unwrap();
        assert_eq!(json, format!("\"{tier}\""));

        let back: LoyaltyTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tier);
    }
}

#[test]
fn replaying_operations_yields_identical_state_and_receipts() {
    let run = || {
        let market = stocked_market("Chips", 1000);
        let mut receipts = Vec::new();
        receipts.push(market.purchase(V1, C1, "Chips", 95).unwrap());
        receipts.push(market.purchase(V1, C1, "Chips", 10).unwrap());
        receipts.push(market.purchase(V1, C1, "Chips", 10).unwrap());
        let _ = market.purchase(V1, C1, "Soda", 1); // fails, no effect
        (receipts, market.vendors(), market.customers())
    };

    assert_eq!(run(), run());
}
