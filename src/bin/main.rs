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

use clap::{Parser, ValueEnum};
use csv::{ReaderBuilder, Trim, Writer};
use market_ledger_rs::{CustomerId, LoyaltyTier, Market, VendorId};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

/// Market Ledger - Process marketplace operation CSV files
///
/// Reads operations from a CSV file, applies them to a single market, and
/// outputs the resulting vendor or customer states to stdout.
#[derive(Parser, Debug)]
#[command(name = "market-ledger-rs")]
#[command(about = "A marketplace ledger that processes operation CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: op,vendor,customer,item,qty,name
    /// Example: cargo run -- operations.csv > customers.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Which snapshot table to write to stdout
    #[arg(long, value_enum, default_value = "customers")]
    report: Report,

    /// Name for the market the operations run against
    #[arg(long, default_value = "Market")]
    market: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Report {
    Vendors,
    Customers,
}

fn main() {
    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let market = match process_operations(&args.market, BufReader::new(file)) {
        Ok(market) => market,
        Err(e) => {
            eprintln!("Error processing operations: {}", e);
            process::exit(1);
        }
    };

    let result = match args.report {
        Report::Vendors => write_vendors(&market, std::io::stdout()),
        Report::Customers => write_customers(&market, std::io::stdout()),
    };
    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, vendor, customer, item, qty, name`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    vendor: Option<u16>,
    #[serde(deserialize_with = "csv::invalid_option")]
    customer: Option<u16>,
    item: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    qty: Option<u64>,
    name: Option<String>,
}

/// One parsed marketplace operation.
#[derive(Debug)]
enum Operation {
    RegisterVendor { id: VendorId, name: String },
    RegisterCustomer { id: CustomerId, name: String },
    AddStock { vendor: VendorId, item: String, qty: u64 },
    Purchase {
        vendor: VendorId,
        customer: CustomerId,
        item: String,
        qty: u64,
    },
    DeleteVendor { id: VendorId },
    DeleteCustomer { id: CustomerId },
}

impl CsvRecord {
    /// Converts the CSV record to an [`Operation`].
    ///
    /// Returns `None` for unknown ops or missing required fields.
    fn into_operation(self) -> Option<Operation> {
        match self.op.to_lowercase().as_str() {
            "register_vendor" => Some(Operation::RegisterVendor {
                id: VendorId(self.vendor?),
                name: self.name?,
            }),
            "register_customer" => Some(Operation::RegisterCustomer {
                id: CustomerId(self.customer?),
                name: self.name?,
            }),
            "add_stock" => Some(Operation::AddStock {
                vendor: VendorId(self.vendor?),
                item: self.item.filter(|i| !i.is_empty())?,
                qty: self.qty?,
            }),
            "purchase" => Some(Operation::Purchase {
                vendor: VendorId(self.vendor?),
                customer: CustomerId(self.customer?),
                item: self.item.filter(|i| !i.is_empty())?,
                qty: self.qty?,
            }),
            "delete_vendor" => Some(Operation::DeleteVendor {
                id: VendorId(self.vendor?),
            }),
            "delete_customer" => Some(Operation::DeleteCustomer {
                id: CustomerId(self.customer?),
            }),
            _ => None,
        }
    }
}

fn apply(market: &Market, op: Operation) -> Result<(), market_ledger_rs::MarketError> {
    match op {
        Operation::RegisterVendor { id, name } => market.register_vendor(id, name),
        Operation::RegisterCustomer { id, name } => market.register_customer(id, name),
        Operation::AddStock { vendor, item, qty } => market.add_stock(vendor, &item, qty),
        Operation::Purchase {
            vendor,
            customer,
            item,
            qty,
        } => market.purchase(vendor, customer, &item, qty).map(|_| ()),
        Operation::DeleteVendor { id } => market.delete_vendor(id),
        Operation::DeleteCustomer { id } => market.delete_customer(id),
    }
}

/// Process operations from a CSV reader against a fresh market.
///
/// Parsing is streaming, so arbitrarily large operation logs never load
/// fully into memory. Malformed rows, unknown ops, and operations that fail
/// validation are skipped; processing continues with the next row.
///
/// # CSV Format
///
/// Expected columns: `op, vendor, customer, item, qty, name`
/// - `op`: register_vendor, register_customer, add_stock, purchase,
///   delete_vendor, delete_customer
/// - `vendor` / `customer`: u16 IDs (required where the op involves them)
/// - `item`: item name (add_stock, purchase)
/// - `qty`: u64 quantity (add_stock, purchase)
/// - `name`: display name (registrations)
///
/// # Example
///
/// ```csv
/// op,vendor,customer,item,qty,name
/// register_vendor,1,,,,Snacks Inc
/// add_stock,1,,Chips,50,
/// register_customer,,1,,,Alice
/// purchase,1,1,Chips,10,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
/// Individual operation errors are logged in debug mode but don't stop
/// processing.
pub fn process_operations<R: Read>(market_name: &str, reader: R) -> Result<Market, csv::Error> {
    let market = Market::new(market_name);

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " purchase "
        .flexible(true) // Allow missing trailing fields
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some(op) = record.into_operation() else {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping invalid operation record");
                    continue;
                };

                // Failed operations have no partial effect; skip and continue.
                if let Err(_e) = apply(&market, op) {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping operation: {}", _e);
                }
            }
            Err(_e) => {
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed row: {}", _e);
                continue;
            }
        }
    }

    Ok(market)
}

/// Flat vendor row for CSV output.
#[derive(Debug, Serialize)]
struct VendorRow {
    vendor: u16,
    name: String,
    items_tracked: usize,
    units_sold: u64,
}

/// Flat customer row for CSV output.
#[derive(Debug, Serialize)]
struct CustomerRow {
    customer: u16,
    name: String,
    tier: LoyaltyTier,
    units_purchased: u64,
}

/// Write vendor states to a CSV writer.
///
/// Columns: `vendor, name, items_tracked, units_sold`, one row per vendor
/// in ascending ID order.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_vendors<W: Write>(market: &Market, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for snapshot in market.vendors() {
        wtr.serialize(VendorRow {
            vendor: snapshot.id.0,
            name: snapshot.name,
            items_tracked: snapshot.inventory.len(),
            units_sold: snapshot.total_units_sold,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write customer states to a CSV writer.
///
/// Columns: `customer, name, tier, units_purchased`, one row per customer
/// in ascending ID order.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_customers<W: Write>(market: &Market, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for snapshot in market.customers() {
        wtr.serialize(CustomerRow {
            customer: snapshot.id.0,
            name: snapshot.name,
            tier: snapshot.tier,
            units_purchased: snapshot.total_units_purchased,
        })?;
    }

    wtr.flush()?;
    Ok(())
}
