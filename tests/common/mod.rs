#![allow(dead_code)]

use std::io::Error;
use tempfile::NamedTempFile;

pub const COMMAND_HEADER: [&str; 12] = [
    "type",
    "id",
    "user",
    "product",
    "order",
    "quantity",
    "amount",
    "method",
    "status",
    "transaction",
    "success",
    "reason",
];

/// Writes a catalog CSV from `(id, price, stock)` triples.
pub fn catalog_file(products: &[(&str, &str, u32)]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::Writer::from_path(file.path())?;
    wtr.write_record(["id", "name", "description", "price", "stock"])?;
    for &(id, price, stock) in products {
        let stock = stock.to_string();
        wtr.write_record([id, id, "", price, stock.as_str()])?;
    }
    wtr.flush()?;
    Ok(file)
}

/// A command row with every cell empty except `type`.
pub fn row(kind: &str) -> [String; 12] {
    let mut cells: [String; 12] = Default::default();
    cells[0] = kind.to_string();
    cells
}

pub fn create_order(id: &str, user: &str, product: &str, quantity: &str) -> [String; 12] {
    let mut cells = row("create_order");
    cells[1] = id.into();
    cells[2] = user.into();
    cells[3] = product.into();
    cells[5] = quantity.into();
    cells
}

pub fn update_status(id: &str, status: &str) -> [String; 12] {
    let mut cells = row("update_status");
    cells[1] = id.into();
    cells[8] = status.into();
    cells
}

pub fn cancel_order(id: &str) -> [String; 12] {
    let mut cells = row("cancel_order");
    cells[1] = id.into();
    cells
}

pub fn create_payment(id: &str, user: &str, order: &str, amount: &str, method: &str) -> [String; 12] {
    let mut cells = row("create_payment");
    cells[1] = id.into();
    cells[2] = user.into();
    cells[4] = order.into();
    cells[6] = amount.into();
    cells[7] = method.into();
    cells
}

pub fn callback(id: &str, transaction: &str, success: bool) -> [String; 12] {
    let mut cells = row("callback");
    cells[1] = id.into();
    cells[9] = transaction.into();
    cells[10] = success.to_string();
    cells
}

pub fn refund(id: &str, reason: &str) -> [String; 12] {
    let mut cells = row("refund");
    cells[1] = id.into();
    cells[11] = reason.into();
    cells
}

pub fn commands_file(rows: &[[String; 12]]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::Writer::from_path(file.path())?;
    wtr.write_record(COMMAND_HEADER)?;
    for cells in rows {
        wtr.write_record(cells)?;
    }
    wtr.flush()?;
    Ok(file)
}
