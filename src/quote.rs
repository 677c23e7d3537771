//! Line items, subtotals and totals for a client quotation.
//!
//! Amounts are whole cents (`u64`) so totals never drift.

use crate::error::QuoteError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product: String,
    pub quantity: u32,
    pub unit_price_cents: u64,
}

impl LineItem {
    pub fn subtotal_cents(&self) -> Result<u64, QuoteError> {
        self.unit_price_cents
            .checked_mul(u64::from(self.quantity))
            .ok_or(QuoteError::Overflow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    client: String,
    items: Vec<LineItem>,
}

impl Quote {
    pub fn new(client: &str) -> Result<Self, QuoteError> {
        let client = client.trim();
        if client.is_empty() {
            return Err(QuoteError::EmptyClient);
        }
        Ok(Self {
            client: client.to_string(),
            items: Vec::new(),
        })
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn set_client(&mut self, client: &str) -> Result<(), QuoteError> {
        let client = client.trim();
        if client.is_empty() {
            return Err(QuoteError::EmptyClient);
        }
        self.client = client.to_string();
        Ok(())
    }

    /// Product names are stored uppercase, like the autocomplete vocabulary.
    pub fn add_item(
        &mut self,
        product: &str,
        quantity: u32,
        unit_price_cents: u64,
    ) -> Result<&LineItem, QuoteError> {
        let product = product.trim().to_uppercase();
        if product.is_empty() {
            return Err(QuoteError::EmptyProduct);
        }
        if quantity == 0 {
            return Err(QuoteError::ZeroQuantity);
        }
        let item = LineItem {
            product,
            quantity,
            unit_price_cents,
        };
        item.subtotal_cents()?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, QuoteError> {
        if index >= self.items.len() {
            return Err(QuoteError::NoSuchItem(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_cents(&self) -> Result<u64, QuoteError> {
        self.items.iter().try_fold(0u64, |acc, item| {
            acc.checked_add(item.subtotal_cents()?)
                .ok_or(QuoteError::Overflow)
        })
    }

    pub fn render_table(&self, symbol: &str) -> Result<String, QuoteError> {
        let mut rows = Vec::with_capacity(self.items.len());
        for item in &self.items {
            rows.push([
                item.product.clone(),
                item.quantity.to_string(),
                format_currency(item.unit_price_cents, symbol),
                format_currency(item.subtotal_cents()?, symbol),
            ]);
        }
        let total = format_currency(self.total_cents()?, symbol);

        let header = ["PRODUCTO", "CANT.", "P. UNIT.", "SUBTOTAL"];
        let mut widths = header.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: [&str; 4]| {
            format!(
                "{:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}\n",
                cells[0],
                cells[1],
                cells[2],
                cells[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
            )
        };

        let mut out = format!("CLIENTE: {}\n", self.client);
        out.push_str(&line(header));
        for row in &rows {
            let cells = [
                row[0].as_str(),
                row[1].as_str(),
                row[2].as_str(),
                row[3].as_str(),
            ];
            out.push_str(&line(cells));
        }
        out.push_str(&line(["", "", "TOTAL", total.as_str()]));
        Ok(out)
    }
}

/// Parses "12", "12.5" or "1,234.50" into cents.
pub fn parse_price(text: &str) -> Result<u64, QuoteError> {
    let invalid = || QuoteError::InvalidPrice(text.to_string());
    let cleaned: String = text.trim().trim_start_matches('$').replace(',', "");
    let (whole, fraction) = match cleaned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let cents: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };
    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(cents))
        .ok_or(QuoteError::Overflow)
}

/// "$1,234.56" style formatting with thousands separators.
pub fn format_currency(cents: u64, symbol: &str) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}.{:02}", symbol, grouped, cents % 100)
}
