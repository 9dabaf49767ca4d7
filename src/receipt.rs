//! Receipt
//!
//! Plain-text tables for the catalog, a priced selection and the order history.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::Catalog,
    orders::{OrderHistory, OrderLineItem},
    pricing::{PriceSchedule, PricingError, Quote},
};

/// Errors that can occur when rendering.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt")]
    IO,

    /// A total could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Write the pricing tiers, lowest quantity first.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if the output cannot be written.
pub fn write_tiers(out: &mut impl io::Write, schedule: &PriceSchedule) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Pieces".to_string(), "Per piece".to_string()]);

    for (tier, upper) in schedule.ranges() {
        let range = match upper {
            Some(upper) => format!("{} - {upper}", tier.min_quantity()),
            None => format!(">= {}", tier.min_quantity()),
        };

        builder.push_record([range, tier.unit_price().to_string()]);
    }

    write_table(out, builder, 1)
}

/// Write the catalog, with selected quantities when a cart is given.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if the output cannot be written.
pub fn write_catalog(
    out: &mut impl io::Write,
    catalog: &Catalog,
    cart: Option<&Cart>,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Model", "Colour", "Stock", "Qty"].map(String::from));

    for item in catalog.iter() {
        let quantity = cart.map_or(0, |cart| cart.quantity(&item.id));

        builder.push_record([
            item.id.to_string(),
            item.name.clone(),
            item.color.clone(),
            item.stock.to_string(),
            quantity.to_string(),
        ]);
    }

    write_table(out, builder, 3)?;

    writeln!(out, " Total stock: {}", catalog.total_stock()).map_err(|_err| ReceiptError::IO)
}

/// Write order lines followed by the quote for their combined quantity.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if the output cannot be written.
pub fn write_selection(
    out: &mut impl io::Write,
    lines: &[OrderLineItem],
    quote: Option<&Quote>,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Model", "Colour", "Qty"].map(String::from));

    for line in lines {
        builder.push_record([
            line.name.clone(),
            line.color.clone(),
            line.quantity.to_string(),
        ]);
    }

    write_table(out, builder, 2)?;

    let written = match quote {
        Some(quote) => writeln!(
            out,
            " Per piece: {}\n Subtotal ({} pcs): {}",
            quote.unit_price, quote.quantity, quote.subtotal
        ),
        None => writeln!(out, " Nothing selected"),
    };

    written.map_err(|_err| ReceiptError::IO)
}

/// Write every line of every order, each priced at its own tier, then the totals.
///
/// # Errors
///
/// - [`ReceiptError::IO`]: the output cannot be written.
/// - [`ReceiptError::Pricing`]: a line total overflows.
pub fn write_history(
    out: &mut impl io::Write,
    history: &OrderHistory,
    schedule: &PriceSchedule,
) -> Result<(), ReceiptError> {
    if history.is_empty() {
        return writeln!(out, " No orders found.").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Model", "Colour", "Qty", "Total"].map(String::from));

    for order in history.iter() {
        for line in &order.selected_models {
            builder.push_record([
                order.id.to_string(),
                line.name.clone(),
                line.color.clone(),
                line.quantity.to_string(),
                OrderHistory::line_total(schedule, line)?.to_string(),
            ]);
        }
    }

    write_table(out, builder, 3)?;

    writeln!(
        out,
        " Quantity: {} ({}/piece)\n Total: {}",
        history.total_quantity(),
        history.unit_price(schedule),
        history.grand_total(schedule)?
    )
    .map_err(|_err| ReceiptError::IO)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    first_numeric_column: usize,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(first_numeric_column..), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)
}
