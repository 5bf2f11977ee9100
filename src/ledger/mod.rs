//! The line-item ledger behind the project creation form.
//!
//! All state lives in [`Ledger`] and changes only through its named
//! transitions. Network work is kept in [`remote`]; everything here is
//! synchronous.

mod catalog;
mod draft;
mod error;
mod input;
pub mod remote;
mod temp_id;

pub use catalog::Catalog;
pub use draft::ProjectDraft;
pub use error::LedgerError;
pub use input::{InputRow, coerce_int};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{CategoryOption, LineItem, SaveProjectRequest};
use temp_id::TempIdGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    Pending,
    Loaded,
    Failed,
}

/// A message for the user, produced by any transition that can fail or that
/// reports back from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice::Info(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Info(message) | Notice::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl From<LedgerError> for Notice {
    fn from(err: LedgerError) -> Self {
        Notice::Error(err.to_string())
    }
}

#[derive(Debug)]
pub struct Ledger {
    catalog: Catalog,
    catalog_state: CatalogState,
    eligible_products: Vec<CategoryOption>,
    input: InputRow,
    draft: ProjectDraft,
    ids: TempIdGenerator,
    submitting: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::default(),
            catalog_state: CatalogState::Pending,
            eligible_products: Vec::new(),
            input: InputRow::default(),
            draft: ProjectDraft::default(),
            ids: TempIdGenerator::default(),
            submitting: false,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_state(&self) -> CatalogState {
        self.catalog_state
    }

    pub fn input(&self) -> &InputRow {
        &self.input
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    pub fn items(&self) -> &[LineItem] {
        &self.draft.items
    }

    pub fn items_total(&self) -> i64 {
        self.draft.items_total()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    // Catalog

    pub(crate) fn apply_catalog(&mut self, catalog: Catalog) {
        debug!(
            processes = catalog.processes().len(),
            products = catalog.products().len(),
            "catalog loaded"
        );
        self.catalog = catalog;
        self.catalog_state = CatalogState::Loaded;
    }

    pub(crate) fn mark_catalog_failed(&mut self) {
        self.catalog = Catalog::default();
        self.catalog_state = CatalogState::Failed;
    }

    // Process/product selection

    /// Products offered for the currently selected process.
    pub fn eligible_products(&self) -> &[CategoryOption] {
        &self.eligible_products
    }

    pub fn can_pick_product(&self) -> bool {
        !self.input.process.is_empty()
    }

    pub fn select_process(&mut self, process: impl Into<String>) {
        let process = process.into();
        self.eligible_products = self.catalog.products_for(&process);
        debug!(%process, eligible = self.eligible_products.len(), "process selected");
        self.input.process = process;
        self.input.product_id = None;
        self.input.unit.clear();
    }

    /// Sets the product and takes over its unit. An id missing from the
    /// catalog is still recorded but leaves the unit untouched.
    pub fn select_product(&mut self, product_id: i32) {
        if !self.can_pick_product() {
            debug!(product_id, "product ignored, no process selected");
            return;
        }

        match self.catalog.product(product_id) {
            Some(product) if product.step1 != self.input.process => {
                warn!(
                    product_id,
                    process = %self.input.process,
                    "product belongs to another process"
                );
            }
            Some(product) => {
                self.input.unit = product.unit.clone().unwrap_or_default();
                self.input.product_id = Some(product_id);
            }
            None => {
                self.input.product_id = Some(product_id);
            }
        }
    }

    // Quantity and prices

    pub fn set_quantity(&mut self, raw: &str) {
        self.input.quantity = coerce_int(raw);
    }

    pub fn set_material_price(&mut self, raw: &str) {
        self.input.material_unit_price = coerce_int(raw);
    }

    pub fn set_labor_price(&mut self, raw: &str) {
        self.input.labor_unit_price = coerce_int(raw);
    }

    pub fn set_expenses_price(&mut self, raw: &str) {
        self.input.expenses_unit_price = coerce_int(raw);
    }

    // Line items

    /// Appends the input row as a new line item and clears the row.
    pub fn commit_item(&mut self) -> Result<&LineItem, LedgerError> {
        let product_id = match self.input.product_id {
            Some(id) if !self.input.process.is_empty() => id,
            _ => return Err(LedgerError::MissingSelection),
        };

        let product_name = match self.catalog.product(product_id) {
            Some(product) => product.name.clone(),
            None => {
                warn!(product_id, "committing product missing from catalog");
                String::new()
            }
        };

        let input = &self.input;
        let item = LineItem {
            temp_id: self.ids.next_id(),
            category_code_id: product_id,
            process_name: input.process.clone(),
            product_name,
            unit: input.unit.clone(),
            material_quantity: input.quantity,
            material_unit_price: input.material_unit_price,
            labor_quantity: input.quantity,
            labor_unit_price: input.labor_unit_price,
            expenses_quantity: input.quantity,
            expenses_unit_price: input.expenses_unit_price,
        };
        debug!(temp_id = item.temp_id, total = item.row_total(), "item committed");

        self.draft.items.push(item);
        self.input.clear();
        self.eligible_products.clear();

        Ok(&self.draft.items[self.draft.items.len() - 1])
    }

    /// Removes the item with `temp_id`; returns whether one was removed.
    pub fn remove_item(&mut self, temp_id: i64) -> bool {
        let removed = self.draft.remove_item(temp_id).is_some();
        debug!(temp_id, removed, "remove item");
        removed
    }

    // Project metadata

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.draft.start_date = date;
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.draft.end_date = date;
    }

    // Submission

    /// Validates the draft and marks a save as in flight.
    pub fn prepare_submission(&mut self) -> Result<SaveProjectRequest, LedgerError> {
        if self.submitting {
            return Err(LedgerError::SubmissionInFlight);
        }

        let duration = self.draft.duration();
        if self.draft.name.is_empty() || duration.is_empty() || self.draft.items.is_empty() {
            return Err(LedgerError::IncompleteProject);
        }

        self.submitting = true;
        Ok(SaveProjectRequest {
            project_name: self.draft.name.clone(),
            project_duration: duration,
            project_description: self.draft.description.clone(),
            materials: self.draft.items.clone(),
        })
    }

    /// Ends the in-flight save. Only a successful save resets the draft.
    pub fn finish_submission(&mut self, saved: bool) {
        self.submitting = false;
        if saved {
            self.draft.reset_after_save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn option(id: i32, name: &str, step1: &str, unit: Option<&str>) -> CategoryOption {
        CategoryOption {
            id,
            name: name.to_string(),
            step1: step1.to_string(),
            unit: unit.map(str::to_string),
        }
    }

    fn loaded_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.apply_catalog(Catalog::new(
            vec![option(1, "도장", "도장", None), option(2, "방수", "방수", None)],
            vec![
                option(3, "퍼티", "도장", Some("m2")),
                option(4, "우레탄", "방수", Some("m2")),
                option(5, "프라이머", "도장", None),
            ],
        ));
        ledger
    }

    fn fill_row(ledger: &mut Ledger) {
        ledger.select_process("도장");
        ledger.select_product(3);
        ledger.set_quantity("10");
        ledger.set_material_price("1000");
        ledger.set_labor_price("2000");
        ledger.set_expenses_price("500");
    }

    fn ready_for_submission(ledger: &mut Ledger) {
        fill_row(ledger);
        ledger.commit_item().unwrap();
        ledger.set_project_name("Lobby");
        ledger.set_start_date(NaiveDate::from_ymd_opt(2024, 1, 1));
        ledger.set_end_date(NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn selecting_product_sets_unit() {
        let mut ledger = loaded_ledger();
        ledger.select_process("도장");
        let eligible: Vec<i32> = ledger.eligible_products().iter().map(|p| p.id).collect();
        assert_eq!(eligible, vec![3, 5]);

        ledger.select_product(3);
        assert_eq!(ledger.input().product_id, Some(3));
        assert_eq!(ledger.input().unit, "m2");
    }

    #[test]
    fn product_without_unit_clears_unit() {
        let mut ledger = loaded_ledger();
        ledger.select_process("도장");
        ledger.select_product(3);
        ledger.select_product(5);
        assert_eq!(ledger.input().product_id, Some(5));
        assert_eq!(ledger.input().unit, "");
    }

    #[test]
    fn changing_process_clears_product_and_unit() {
        let mut ledger = loaded_ledger();
        ledger.select_process("도장");
        ledger.select_product(3);

        ledger.select_process("방수");
        assert_eq!(ledger.input().process, "방수");
        assert_eq!(ledger.input().product_id, None);
        assert_eq!(ledger.input().unit, "");
        assert_eq!(ledger.eligible_products().len(), 1);
    }

    #[test]
    fn unknown_product_keeps_unit() {
        let mut ledger = loaded_ledger();
        ledger.select_process("도장");
        ledger.select_product(3);

        ledger.select_product(42);
        assert_eq!(ledger.input().product_id, Some(42));
        assert_eq!(ledger.input().unit, "m2");
    }

    #[test]
    fn product_needs_a_process() {
        let mut ledger = loaded_ledger();
        assert!(!ledger.can_pick_product());
        ledger.select_product(3);
        assert_eq!(ledger.input().product_id, None);
    }

    #[test]
    fn product_from_another_process_is_ignored() {
        let mut ledger = loaded_ledger();
        ledger.select_process("방수");
        ledger.select_product(3);
        assert_eq!(ledger.input().product_id, None);
        assert_eq!(ledger.input().unit, "");
    }

    #[test]
    fn numeric_fields_coerce_bad_input_to_zero() {
        let mut ledger = loaded_ledger();
        ledger.set_quantity("abc");
        ledger.set_material_price("");
        ledger.set_labor_price("12x");
        assert_eq!(ledger.input().quantity, 0);
        assert_eq!(ledger.input().material_unit_price, 0);
        assert_eq!(ledger.input().labor_unit_price, 12);
    }

    #[test]
    fn commit_without_selection_is_rejected() {
        let mut ledger = loaded_ledger();
        ledger.set_quantity("4");
        assert_eq!(ledger.commit_item().unwrap_err(), LedgerError::MissingSelection);

        ledger.select_process("도장");
        assert_eq!(ledger.commit_item().unwrap_err(), LedgerError::MissingSelection);

        assert!(ledger.items().is_empty());
        assert_eq!(ledger.input().quantity, 4);
        assert_eq!(ledger.input().process, "도장");
    }

    #[test]
    fn commit_builds_item_and_resets_row() {
        let mut ledger = loaded_ledger();
        fill_row(&mut ledger);

        let item = ledger.commit_item().unwrap().clone();
        assert_eq!(item.category_code_id, 3);
        assert_eq!(item.process_name, "도장");
        assert_eq!(item.product_name, "퍼티");
        assert_eq!(item.unit, "m2");
        assert_eq!(
            (item.material_quantity, item.labor_quantity, item.expenses_quantity),
            (10, 10, 10)
        );
        assert_eq!(item.row_total(), 35_000);

        assert_eq!(ledger.items(), &[item]);
        assert_eq!(ledger.input(), &InputRow::default());
        assert!(ledger.eligible_products().is_empty());
    }

    #[test]
    fn committed_items_keep_order_and_unique_ids() {
        let mut ledger = loaded_ledger();
        for _ in 0..5 {
            fill_row(&mut ledger);
            ledger.commit_item().unwrap();
        }

        let ids: Vec<i64> = ledger.items().iter().map(|item| item.temp_id).collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
        assert_eq!(ledger.items_total(), 5 * 35_000);
    }

    #[test]
    fn remove_item_by_id() {
        let mut ledger = loaded_ledger();
        for _ in 0..3 {
            fill_row(&mut ledger);
            ledger.commit_item().unwrap();
        }
        let ids: Vec<i64> = ledger.items().iter().map(|item| item.temp_id).collect();

        assert!(ledger.remove_item(ids[1]));
        let remaining: Vec<i64> = ledger.items().iter().map(|item| item.temp_id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);

        assert!(!ledger.remove_item(ids[1]));
        assert_eq!(ledger.items().len(), 2);
    }

    #[test]
    fn submission_requires_name_duration_and_items() {
        let mut ledger = loaded_ledger();
        assert_eq!(
            ledger.prepare_submission().unwrap_err(),
            LedgerError::IncompleteProject
        );

        ready_for_submission(&mut ledger);
        ledger.set_end_date(None);
        assert_eq!(
            ledger.prepare_submission().unwrap_err(),
            LedgerError::IncompleteProject
        );
        assert!(!ledger.is_submitting());
    }

    #[test]
    fn submission_payload_and_in_flight_guard() {
        let mut ledger = loaded_ledger();
        ready_for_submission(&mut ledger);
        ledger.set_description("2nd floor");

        let request = ledger.prepare_submission().unwrap();
        assert_eq!(request.project_name, "Lobby");
        assert_eq!(request.project_duration, "2024-01-01 ~ 2024-01-31");
        assert_eq!(request.project_description, "2nd floor");
        assert_eq!(request.materials, ledger.items().to_vec());

        assert_eq!(
            ledger.prepare_submission().unwrap_err(),
            LedgerError::SubmissionInFlight
        );
    }

    #[test]
    fn failed_save_keeps_draft() {
        let mut ledger = loaded_ledger();
        ready_for_submission(&mut ledger);
        ledger.prepare_submission().unwrap();

        ledger.finish_submission(false);
        assert!(!ledger.is_submitting());
        assert_eq!(ledger.draft().name, "Lobby");
        assert_eq!(ledger.items().len(), 1);
    }

    #[test]
    fn successful_save_resets_draft() {
        let mut ledger = loaded_ledger();
        ready_for_submission(&mut ledger);
        ledger.set_description("2nd floor");
        ledger.prepare_submission().unwrap();

        ledger.finish_submission(true);
        assert!(ledger.draft().name.is_empty());
        assert_eq!(ledger.draft().duration(), "");
        assert!(ledger.items().is_empty());
        assert_eq!(ledger.draft().description, "2nd floor");
        assert_eq!(ledger.catalog().processes().len(), 2);
    }
}
