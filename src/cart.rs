use serde::{Deserialize, Serialize};

use crate::store::{Book, CatalogFormat};

/// The two purchasable formats. A catalog entry listed as `both` can be
/// added in either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseFormat {
    #[serde(rename = "PDF")]
    Pdf,
    Physical,
}

impl PurchaseFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PDF" => Some(PurchaseFormat::Pdf),
            "Physical" => Some(PurchaseFormat::Physical),
            _ => None,
        }
    }
}

/// One cart line. Identity is `(book_id, format)`; adding the same pair
/// again bumps the quantity instead of duplicating the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub book_id: String,
    pub title: String,
    pub unit_price: i64,
    pub format: PurchaseFormat,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: u64,
    pub amount: i64,
}

pub fn add_line(mut lines: Vec<CartLine>, book: &Book, format: PurchaseFormat) -> Vec<CartLine> {
    if let Some(line) = lines
        .iter_mut()
        .find(|l| l.book_id == book.id && l.format == format)
    {
        line.quantity += 1;
        return lines;
    }
    lines.push(CartLine {
        book_id: book.id.clone(),
        title: book.title.clone(),
        unit_price: book.price,
        format,
        quantity: 1,
    });
    lines
}

/// Quantity becomes `max(0, quantity + delta)`; a line that reaches zero
/// is dropped, never kept around empty.
pub fn adjust_quantity(
    lines: Vec<CartLine>,
    book_id: &str,
    format: PurchaseFormat,
    delta: i64,
) -> Vec<CartLine> {
    lines
        .into_iter()
        .filter_map(|mut l| {
            if l.book_id == book_id && l.format == format {
                let next = (i64::from(l.quantity) + delta).max(0);
                if next == 0 {
                    return None;
                }
                l.quantity = next as u32;
            }
            Some(l)
        })
        .collect()
}

pub fn remove_line(lines: Vec<CartLine>, book_id: &str, format: PurchaseFormat) -> Vec<CartLine> {
    lines
        .into_iter()
        .filter(|l| !(l.book_id == book_id && l.format == format))
        .collect()
}

pub fn totals(lines: &[CartLine]) -> CartTotals {
    let mut item_count = 0_u64;
    let mut amount = 0_i64;
    for l in lines {
        item_count += u64::from(l.quantity);
        amount += l.unit_price * i64::from(l.quantity);
    }
    CartTotals { item_count, amount }
}

/// Display form of a whole-naira amount: symbol prefix, thousands
/// grouping, no decimals (`1250 -> "₦1,250"`).
pub fn format_naira(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-₦{grouped}")
    } else {
        format!("₦{grouped}")
    }
}

/// True when the catalog format can be bought in `format`.
pub fn offers(catalog: CatalogFormat, format: PurchaseFormat) -> bool {
    match catalog {
        CatalogFormat::Both => true,
        CatalogFormat::Pdf => format == PurchaseFormat::Pdf,
        CatalogFormat::Physical => format == PurchaseFormat::Physical,
    }
}
