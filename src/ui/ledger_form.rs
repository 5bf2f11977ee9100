use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode};
use tracing::debug;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::ledger::{Ledger, Notice};
use crate::ui::components::centered_rect;
use crate::ui::components::date_input::DateInputState;
use crate::ui::components::picker::{PickerState, render_picker};
use crate::ui::format;

pub enum LedgerFormAction {
    Quit,
    Save,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormField {
    ProjectName,
    StartDate,
    EndDate,
    Description,
    Process,
    Product,
    Quantity,
    MaterialPrice,
    LaborPrice,
    ExpensesPrice,
    Items,
}

const FIELD_ORDER: [FormField; 11] = [
    FormField::ProjectName,
    FormField::StartDate,
    FormField::EndDate,
    FormField::Description,
    FormField::Process,
    FormField::Product,
    FormField::Quantity,
    FormField::MaterialPrice,
    FormField::LaborPrice,
    FormField::ExpensesPrice,
    FormField::Items,
];

impl FormField {
    fn is_numeric(self) -> bool {
        matches!(
            self,
            FormField::Quantity
                | FormField::MaterialPrice
                | FormField::LaborPrice
                | FormField::ExpensesPrice
        )
    }
}

enum OpenPicker {
    Process(PickerState<String>),
    Product(PickerState<i32>),
}

pub struct LedgerFormState {
    ledger: Ledger,
    current_field: FormField,
    editing: bool,
    active_input: String,
    start_date_state: DateInputState,
    end_date_state: DateInputState,
    picker: Option<OpenPicker>,
    items_state: TableState,
    notice: Option<Notice>,
}

impl LedgerFormState {
    pub fn new(ledger: Ledger) -> Self {
        let start_date_state = DateInputState::new(ledger.draft().start_date);
        let mut end_date_state = DateInputState::new(ledger.draft().end_date);
        end_date_state.set_min_date(ledger.draft().start_date);

        Self {
            ledger,
            current_field: FormField::ProjectName,
            editing: false,
            active_input: String::new(),
            start_date_state,
            end_date_state,
            picker: None,
            items_state: TableState::default(),
            notice: None,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Re-syncs the form with the ledger after a save attempt.
    pub fn after_submission(&mut self, notice: Notice) {
        let draft = self.ledger.draft();
        self.start_date_state = DateInputState::new(draft.start_date);
        self.end_date_state = DateInputState::new(draft.end_date);
        self.end_date_state.set_min_date(draft.start_date);
        if self.ledger.items().is_empty() {
            self.items_state.select(None);
        }
        self.notice = Some(notice);
    }

    fn field_index(&self) -> usize {
        FIELD_ORDER
            .iter()
            .position(|field| *field == self.current_field)
            .unwrap_or(0)
    }

    pub fn next_field(&mut self) {
        self.current_field = FIELD_ORDER[(self.field_index() + 1) % FIELD_ORDER.len()];
    }

    pub fn previous_field(&mut self) {
        let len = FIELD_ORDER.len();
        self.current_field = FIELD_ORDER[(self.field_index() + len - 1) % len];
    }

    fn numeric_value(&self, field: FormField) -> i64 {
        let input = self.ledger.input();
        match field {
            FormField::Quantity => input.quantity,
            FormField::MaterialPrice => input.material_unit_price,
            FormField::LaborPrice => input.labor_unit_price,
            FormField::ExpensesPrice => input.expenses_unit_price,
            _ => 0,
        }
    }

    pub fn begin_edit(&mut self) {
        let today = Local::now().date_naive();
        match self.current_field {
            FormField::ProjectName => {
                self.active_input = self.ledger.draft().name.clone();
                self.editing = true;
            }
            FormField::Description => {
                self.active_input = self.ledger.draft().description.clone();
                self.editing = true;
            }
            FormField::StartDate => {
                self.start_date_state.begin_edit(today);
                self.editing = true;
            }
            FormField::EndDate => {
                let start = self.ledger.draft().start_date;
                self.end_date_state.set_min_date(start);
                self.end_date_state.begin_edit(start.unwrap_or(today));
                self.editing = true;
            }
            FormField::Process => self.open_process_picker(),
            FormField::Product => self.open_product_picker(),
            FormField::Items => {
                self.editing = true;
                if self.items_state.selected().is_none() && !self.ledger.items().is_empty() {
                    self.items_state.select(Some(0));
                }
            }
            field if field.is_numeric() => {
                self.active_input = self.numeric_value(field).to_string();
                self.editing = true;
            }
            _ => {}
        }
    }

    pub fn end_edit(&mut self) {
        self.editing = false;
        self.active_input.clear();
        self.start_date_state.end_edit();
        self.end_date_state.end_edit();
    }

    fn open_process_picker(&mut self) {
        let options = self
            .ledger
            .catalog()
            .processes()
            .iter()
            .map(|process| (process.step1.clone(), process.name.clone()))
            .collect();
        let current = self.ledger.input().process.clone();
        self.picker = Some(OpenPicker::Process(PickerState::new(
            "Process",
            options,
            Some(&current),
        )));
    }

    fn open_product_picker(&mut self) {
        if !self.ledger.can_pick_product() {
            debug!("product picker unavailable without a process");
            return;
        }

        let options = self
            .ledger
            .eligible_products()
            .iter()
            .map(|product| (product.id, product.name.clone()))
            .collect();
        let current = self.ledger.input().product_id;
        self.picker = Some(OpenPicker::Product(PickerState::new(
            "Product",
            options,
            current.as_ref(),
        )));
    }

    fn confirm_picker(&mut self) {
        match self.picker.take() {
            Some(OpenPicker::Process(picker)) => {
                if let Some(process) = picker.selected() {
                    self.ledger.select_process(process);
                }
            }
            Some(OpenPicker::Product(picker)) => {
                if let Some(product_id) = picker.selected() {
                    self.ledger.select_product(product_id);
                }
            }
            None => {}
        }
    }

    fn move_picker(&mut self, forward: bool) {
        match &mut self.picker {
            Some(OpenPicker::Process(picker)) if forward => picker.next(),
            Some(OpenPicker::Process(picker)) => picker.previous(),
            Some(OpenPicker::Product(picker)) if forward => picker.next(),
            Some(OpenPicker::Product(picker)) => picker.previous(),
            None => {}
        }
    }

    fn sync_dates(&mut self) {
        self.ledger.set_start_date(self.start_date_state.date);
        self.end_date_state.set_min_date(self.start_date_state.date);
        self.ledger.set_end_date(self.end_date_state.date);
    }

    fn apply_active_input(&mut self) {
        let raw = self.active_input.clone();
        match self.current_field {
            FormField::ProjectName => self.ledger.set_project_name(raw),
            FormField::Description => self.ledger.set_description(raw),
            FormField::Quantity => self.ledger.set_quantity(&raw),
            FormField::MaterialPrice => self.ledger.set_material_price(&raw),
            FormField::LaborPrice => self.ledger.set_labor_price(&raw),
            FormField::ExpensesPrice => self.ledger.set_expenses_price(&raw),
            _ => {}
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            FormField::StartDate => {
                if self.start_date_state.handle_input(key) {
                    self.sync_dates();
                }
            }
            FormField::EndDate => {
                if self.end_date_state.handle_input(key) {
                    self.sync_dates();
                }
            }
            FormField::ProjectName | FormField::Description => match key {
                KeyCode::Char(c) => {
                    self.active_input.push(c);
                    self.apply_active_input();
                }
                KeyCode::Backspace => {
                    self.active_input.pop();
                    self.apply_active_input();
                }
                _ => {}
            },
            field if field.is_numeric() => match key {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    self.active_input.push(c);
                    self.apply_active_input();
                }
                KeyCode::Backspace => {
                    self.active_input.pop();
                    self.apply_active_input();
                }
                _ => {}
            },
            _ => {}
        }
    }

    pub fn add_item(&mut self) {
        let committed = self.ledger.commit_item().map(|_| ());
        match committed {
            Ok(()) => {
                let last = self.ledger.items().len() - 1;
                self.items_state.select(Some(last));
            }
            Err(err) => self.notice = Some(err.into()),
        }
    }

    pub fn delete_selected_item(&mut self) {
        let Some(selected) = self.items_state.selected() else {
            return;
        };
        let Some(temp_id) = self.ledger.items().get(selected).map(|item| item.temp_id) else {
            return;
        };

        self.ledger.remove_item(temp_id);

        let len = self.ledger.items().len();
        if len == 0 {
            self.items_state.select(None);
        } else if selected >= len {
            self.items_state.select(Some(len - 1));
        }
    }

    fn move_item_selection(&mut self, forward: bool) {
        let len = self.ledger.items().len();
        if len == 0 {
            return;
        }

        let i = match (self.items_state.selected(), forward) {
            (Some(i), true) if i + 1 < len => i + 1,
            (Some(_), true) | (None, _) => 0,
            (Some(0), false) => len - 1,
            (Some(i), false) => i - 1,
        };
        self.items_state.select(Some(i));
    }
}

pub fn render_ledger_form<B: Backend>(f: &mut Frame<B>, state: &mut LedgerFormState) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Length(5),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let title = Paragraph::new("Project Creation")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_project_info(f, state, chunks[1]);
    render_input_row(f, state, chunks[2]);
    render_items(f, state, chunks[3]);

    let help = Paragraph::new(help_text(state))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[4]);

    match &mut state.picker {
        Some(OpenPicker::Process(picker)) => render_picker(f, size, picker),
        Some(OpenPicker::Product(picker)) => render_picker(f, size, picker),
        None => {}
    }

    if let Some(notice) = state.notice() {
        render_notice(f, size, notice);
    }
}

fn help_text(state: &LedgerFormState) -> &'static str {
    if state.picker.is_some() {
        return "Up/Down - Choose | Enter - Select | Esc - Close";
    }

    match (state.editing, state.current_field) {
        (false, _) => {
            "Enter - Edit | Up/Down - Navigate | A - Add item | S - Save project | Esc - Quit"
        }
        (true, FormField::StartDate | FormField::EndDate) => {
            "Digits - Type | Left/Right - Date part | X - Clear | Enter - Done"
        }
        (true, FormField::Items) => "Up/Down - Select | D - Delete item | Enter/Esc - Done",
        (true, _) => "Type to edit | Enter/Esc - Done",
    }
}

fn field_style(state: &LedgerFormState, field: FormField) -> Style {
    if state.current_field != field {
        Style::default()
    } else if state.editing {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

fn text_value(state: &LedgerFormState, field: FormField, value: &str) -> String {
    if state.editing && state.current_field == field {
        format!("{}|", state.active_input)
    } else {
        value.to_string()
    }
}

fn render_project_info<B: Backend>(f: &mut Frame<B>, state: &LedgerFormState, area: Rect) {
    let draft = state.ledger.draft();

    let lines = vec![
        Spans::from(vec![
            Span::styled("Project Name: ", field_style(state, FormField::ProjectName)),
            Span::raw(text_value(state, FormField::ProjectName, &draft.name)),
        ]),
        Spans::from(vec![
            Span::styled("Start: ", field_style(state, FormField::StartDate)),
            Span::raw(state.start_date_state.get_display_string()),
            Span::raw("  ~  "),
            Span::styled("End: ", field_style(state, FormField::EndDate)),
            Span::raw(state.end_date_state.get_display_string()),
        ]),
        Spans::from(vec![
            Span::styled("Duration: ", Style::default().fg(Color::Gray)),
            Span::raw(draft.duration()),
        ]),
        Spans::from(vec![
            Span::styled("Description: ", field_style(state, FormField::Description)),
            Span::raw(text_value(state, FormField::Description, &draft.description)),
        ]),
    ];

    let info = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Project Details"));
    f.render_widget(info, area);
}

fn render_input_row<B: Backend>(f: &mut Frame<B>, state: &LedgerFormState, area: Rect) {
    let ledger = &state.ledger;
    let input = ledger.input();

    let process_label = ledger
        .catalog()
        .processes()
        .iter()
        .find(|process| process.step1 == input.process)
        .map(|process| process.name.clone())
        .unwrap_or_else(|| input.process.clone());
    let process_label = if ledger.catalog().is_empty() {
        "(no categories)".to_string()
    } else {
        process_label
    };

    let product_label = if !ledger.can_pick_product() {
        "-".to_string()
    } else {
        input
            .product_id
            .and_then(|id| ledger.catalog().product(id))
            .map(|product| product.name.clone())
            .unwrap_or_default()
    };

    let numeric = |field: FormField| -> String {
        if state.editing && state.current_field == field {
            format!("{}|", state.active_input)
        } else {
            format::amount(state.numeric_value(field))
        }
    };

    let product_style = if ledger.can_pick_product() {
        field_style(state, FormField::Product)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let header = Row::new(vec![
        "Process", "Product", "Unit", "Qty", "Material", "Subtotal", "Labor", "Subtotal",
        "Expenses", "Subtotal", "Total",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let row = Row::new(vec![
        Cell::from(process_label).style(field_style(state, FormField::Process)),
        Cell::from(product_label).style(product_style),
        Cell::from(input.unit.clone()),
        Cell::from(numeric(FormField::Quantity)).style(field_style(state, FormField::Quantity)),
        Cell::from(numeric(FormField::MaterialPrice))
            .style(field_style(state, FormField::MaterialPrice)),
        Cell::from(format::amount(input.material_subtotal())),
        Cell::from(numeric(FormField::LaborPrice)).style(field_style(state, FormField::LaborPrice)),
        Cell::from(format::amount(input.labor_subtotal())),
        Cell::from(numeric(FormField::ExpensesPrice))
            .style(field_style(state, FormField::ExpensesPrice)),
        Cell::from(format::amount(input.expenses_subtotal())),
        Cell::from(format::amount(input.row_total())),
    ]);

    let widths = [
        Constraint::Percentage(11),
        Constraint::Percentage(13),
        Constraint::Percentage(5),
        Constraint::Percentage(6),
        Constraint::Percentage(9),
        Constraint::Percentage(9),
        Constraint::Percentage(9),
        Constraint::Percentage(9),
        Constraint::Percentage(9),
        Constraint::Percentage(9),
        Constraint::Percentage(11),
    ];

    let table = Table::new(vec![row])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Select Material"))
        .widths(&widths)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_items<B: Backend>(f: &mut Frame<B>, state: &mut LedgerFormState, area: Rect) {
    let items = state.ledger.items();
    let title = format!(
        "Added Materials ({}) | Total {}",
        items.len(),
        format::won(state.ledger.items_total())
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(field_style(state, FormField::Items));

    if items.is_empty() {
        let empty = Paragraph::new("No materials added yet").block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        "Process",
        "Product",
        "Material (unit)",
        "Labor (unit)",
        "Expenses (unit)",
        "Row Total",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            Row::new(vec![
                item.process_name.clone(),
                item.product_name.clone(),
                format::won(item.material_unit_price),
                format::won(item.labor_unit_price),
                format::won(item.expenses_unit_price),
                format::won(item.row_total()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(14),
        Constraint::Percentage(22),
        Constraint::Percentage(16),
        Constraint::Percentage(16),
        Constraint::Percentage(16),
        Constraint::Percentage(16),
    ];

    let table = Table::new(rows)
        .header(header)
        .block(block)
        .widths(&widths)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    let show_selection = state.editing && state.current_field == FormField::Items;
    if show_selection {
        f.render_stateful_widget(table, area, &mut state.items_state);
    } else {
        f.render_widget(table, area);
    }
}

fn render_notice<B: Backend>(f: &mut Frame<B>, size: Rect, notice: &Notice) {
    let popup_area = centered_rect(60, 20, size);

    let (title, color) = if notice.is_error() {
        ("Error", Color::Red)
    } else {
        ("Notice", Color::Green)
    };

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(notice.message()),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .block(Block::default().title(title).borders(Borders::ALL))
    .style(Style::default().fg(color).bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

/// Applies one key press to the form.
pub fn handle_key(state: &mut LedgerFormState, key: KeyCode) -> Option<LedgerFormAction> {
    if state.notice.take().is_some() {
        return None;
    }

    if state.picker.is_some() {
        match key {
            KeyCode::Esc => state.picker = None,
            KeyCode::Enter => state.confirm_picker(),
            KeyCode::Up => state.move_picker(false),
            KeyCode::Down => state.move_picker(true),
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Esc => {
            if state.editing {
                state.end_edit();
            } else {
                return Some(LedgerFormAction::Quit);
            }
        }
        KeyCode::Enter => {
            if state.editing {
                state.end_edit();
            } else {
                state.begin_edit();
            }
        }
        KeyCode::Tab => {
            state.end_edit();
            state.next_field();
        }
        KeyCode::BackTab => {
            state.end_edit();
            state.previous_field();
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Up if state.current_field == FormField::Items => state.move_item_selection(false),
        KeyCode::Down if state.current_field == FormField::Items => state.move_item_selection(true),
        KeyCode::Char('d') | KeyCode::Delete
            if state.editing && state.current_field == FormField::Items =>
        {
            state.delete_selected_item();
        }
        KeyCode::Char('a') if !state.editing => state.add_item(),
        KeyCode::Char('s') if !state.editing && !state.ledger.is_submitting() => {
            return Some(LedgerFormAction::Save);
        }
        KeyCode::Char('q') if !state.editing => return Some(LedgerFormAction::Quit),
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }

    None
}

pub fn handle_input(state: &mut LedgerFormState) -> Result<Option<LedgerFormAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }

    Ok(None)
}
