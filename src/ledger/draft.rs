use chrono::NaiveDate;

use crate::models::LineItem;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Project metadata plus the committed line items.
#[derive(Debug, Default, Clone)]
pub struct ProjectDraft {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub items: Vec<LineItem>,
}

impl ProjectDraft {
    /// `YYYY-MM-DD ~ YYYY-MM-DD`, or empty while either date is unset.
    pub fn duration(&self) -> String {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                format!("{} ~ {}", start.format(DATE_FORMAT), end.format(DATE_FORMAT))
            }
            _ => String::new(),
        }
    }

    /// Removes the item with the given id, keeping the others in order.
    pub fn remove_item(&mut self, temp_id: i64) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.temp_id == temp_id)?;
        Some(self.items.remove(index))
    }

    pub fn items_total(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, item| total.saturating_add(item.row_total()))
    }

    /// Clears what a successful save consumes. The description is kept.
    pub fn reset_after_save(&mut self) {
        self.name.clear();
        self.start_date = None;
        self.end_date = None;
        self.items.clear();
    }
}
