pub mod components;
pub mod format;
pub mod ledger_form;
