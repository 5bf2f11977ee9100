use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

/// Editor for a date that may be unset.
///
/// Digits are typed into the highlighted part (4 for the year, 2 for month
/// and day) and applied once complete. `Delete` or `x` clears the date.
/// While an unset date is edited, the fallback is only shown; `date` stays
/// `None` until a part is applied.
pub struct DateInputState {
    pub date: Option<NaiveDate>,
    pub editing: bool,
    pub date_part: DatePart,
    buffer: String,
    preview: Option<NaiveDate>,
    min_date: Option<NaiveDate>,
}

impl DateInputState {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            buffer: String::new(),
            preview: None,
            min_date: None,
        }
    }

    /// Starts editing. An unset date is previewed from `fallback`.
    pub fn begin_edit(&mut self, fallback: NaiveDate) {
        self.editing = true;
        self.date_part = DatePart::Year;
        self.buffer.clear();
        self.preview = match self.date {
            Some(_) => None,
            None => Some(self.clamp(fallback)),
        };
    }

    pub fn end_edit(&mut self) {
        self.editing = false;
        self.buffer.clear();
        self.preview = None;
    }

    /// Earliest date an edit can produce. A date already set is kept.
    pub fn set_min_date(&mut self, min: Option<NaiveDate>) {
        self.min_date = min;
    }

    pub fn clear(&mut self) {
        if self.editing {
            self.preview = self.preview.or(self.date);
        }
        self.date = None;
        self.buffer.clear();
    }

    fn clamp(&self, date: NaiveDate) -> NaiveDate {
        match self.min_date {
            Some(min) if date < min => min,
            _ => date,
        }
    }

    fn shown(&self) -> Option<NaiveDate> {
        self.date.or(self.preview)
    }

    fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.buffer.clear();
    }

    fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.buffer.clear();
    }

    /// Applies a key while editing. Returns true when the date changed.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        if !self.editing {
            return false;
        }

        let before = self.date;
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => self.push_digit(c),
            KeyCode::Delete | KeyCode::Char('x') => self.clear(),
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
        self.date != before
    }

    fn push_digit(&mut self, c: char) {
        let Some(date) = self.shown() else {
            return;
        };

        self.buffer.push(c);
        let width = match self.date_part {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        };
        if self.buffer.len() < width {
            return;
        }

        let value: u32 = self.buffer.parse().unwrap_or(0);
        self.buffer.clear();

        let candidate = match self.date_part {
            DatePart::Year if (1900..=2100).contains(&value) => {
                NaiveDate::from_ymd_opt(value as i32, date.month(), date.day())
            }
            DatePart::Month => NaiveDate::from_ymd_opt(date.year(), value, date.day()),
            DatePart::Day => NaiveDate::from_ymd_opt(date.year(), date.month(), value),
            _ => None,
        };

        if let Some(new_date) = candidate {
            self.date = Some(self.clamp(new_date));
            self.preview = None;
        }
    }

    pub fn get_display_string(&self) -> String {
        let Some(date) = self.shown() else {
            return "Not set".to_string();
        };

        let date_str = date.format("%Y-%m-%d").to_string();
        if !self.editing {
            return date_str;
        }

        let current_input = if self.buffer.is_empty() {
            match self.date_part {
                DatePart::Year => "[YYYY]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Day => "[DD]".to_string(),
            }
        } else {
            format!("[{}]", self.buffer)
        };

        let (year, month, day) = (&date_str[0..4], &date_str[5..7], &date_str[8..10]);
        match self.date_part {
            DatePart::Year => format!("{}{}-{}-{}", year, current_input, month, day),
            DatePart::Month => format!("{}-{}{}-{}", year, month, current_input, day),
            DatePart::Day => format!("{}-{}-{}{}", year, month, day, current_input),
        }
    }
}
