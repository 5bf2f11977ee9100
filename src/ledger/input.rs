use crate::models::subtotal;

/// Coerces the raw text of a numeric field to an integer.
///
/// Leading whitespace and an optional sign are accepted, then digits are
/// read up to the first non-digit. Empty or non-numeric text yields zero,
/// as does a value too large to represent.
pub fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    match digits.parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => 0,
    }
}

/// The single row being edited before it is committed to the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputRow {
    pub process: String,
    pub product_id: Option<i32>,
    pub unit: String,
    pub quantity: i64,
    pub material_unit_price: i64,
    pub labor_unit_price: i64,
    pub expenses_unit_price: i64,
}

impl InputRow {
    pub fn material_subtotal(&self) -> i64 {
        subtotal(self.quantity, self.material_unit_price)
    }

    pub fn labor_subtotal(&self) -> i64 {
        subtotal(self.quantity, self.labor_unit_price)
    }

    pub fn expenses_subtotal(&self) -> i64 {
        subtotal(self.quantity, self.expenses_unit_price)
    }

    /// Computed on demand from the current inputs; nothing is cached.
    pub fn row_total(&self) -> i64 {
        self.material_subtotal()
            .saturating_add(self.labor_subtotal())
            .saturating_add(self.expenses_subtotal())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
