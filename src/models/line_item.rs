use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LineItem {
    pub temp_id: i64,
    pub category_code_id: i32,
    pub process_name: String,
    pub product_name: String,
    pub unit: String,
    pub material_quantity: i64,
    pub material_unit_price: i64,
    pub labor_quantity: i64,
    pub labor_unit_price: i64,
    pub expenses_quantity: i64,
    pub expenses_unit_price: i64,
}

impl LineItem {
    pub fn row_total(&self) -> i64 {
        subtotal(self.material_quantity, self.material_unit_price)
            .saturating_add(subtotal(self.labor_quantity, self.labor_unit_price))
            .saturating_add(subtotal(self.expenses_quantity, self.expenses_unit_price))
    }
}

/// Quantity times unit price for a single cost category.
pub fn subtotal(quantity: i64, unit_price: i64) -> i64 {
    quantity.saturating_mul(unit_price)
}
