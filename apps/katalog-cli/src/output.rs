//! Terminal output for a finished search.

use std::io::{self, Write};

use katalog_client::{ProductRecord, StoreSnapshot};

/// Writes the snapshot as pretty JSON.
pub fn render_json<W: Write>(snapshot: &StoreSnapshot, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, snapshot)?;
    writeln!(out)
}

/// Writes the status line, one numbered row per result, and the selection.
///
/// ```text
/// Showing 2 products (of 2).
///   1. Teh Botol  [Minuman]  price 5000  stock 10
///   2. Kopi  [Minuman]  price 15000  stock 3
/// ```
pub fn render_text<W: Write>(snapshot: &StoreSnapshot, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", snapshot.status_message)?;

    for (index, record) in snapshot.results.iter().enumerate() {
        writeln!(out, "{:>3}. {}", index + 1, row(record))?;
    }

    if let Some(selected) = &snapshot.selected {
        writeln!(out)?;
        writeln!(out, "Selected:")?;
        serde_json::to_writer_pretty(&mut *out, selected)?;
        writeln!(out)?;
    }

    Ok(())
}

fn row(record: &ProductRecord) -> String {
    let name = record.name_text();
    let mut line = if name.is_empty() {
        "(unnamed)".to_string()
    } else {
        name.into_owned()
    };

    let category = record.category_text();
    if !category.is_empty() {
        line.push_str(&format!("  [{}]", category));
    }

    let price = record.price_text();
    if !price.is_empty() {
        line.push_str(&format!("  price {}", price));
    }

    let stock = record.stock_text();
    if !stock.is_empty() {
        line.push_str(&format!("  stock {}", stock));
    }

    line
}
