use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use super::centered_rect;

/// A dropdown of labelled values shown as a popup over the form.
pub struct PickerState<T> {
    title: &'static str,
    options: Vec<(T, String)>,
    list_state: ListState,
}

impl<T: Clone> PickerState<T> {
    /// Opens with `current` highlighted when it is among the options.
    pub fn new(title: &'static str, options: Vec<(T, String)>, current: Option<&T>) -> Self
    where
        T: PartialEq,
    {
        let mut list_state = ListState::default();
        if !options.is_empty() {
            let index = current
                .and_then(|value| options.iter().position(|(v, _)| v == value))
                .unwrap_or(0);
            list_state.select(Some(index));
        }

        Self {
            title,
            options,
            list_state,
        }
    }

    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.options.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.options.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.options.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected(&self) -> Option<T> {
        self.list_state
            .selected()
            .and_then(|i| self.options.get(i))
            .map(|(value, _)| value.clone())
    }
}

pub fn render_picker<B: Backend, T: Clone>(frame: &mut Frame<B>, size: Rect, state: &mut PickerState<T>) {
    let area = centered_rect(40, 50, size);

    let items: Vec<ListItem> = if state.options.is_empty() {
        vec![ListItem::new("(none)")]
    } else {
        state
            .options
            .iter()
            .map(|(_, label)| ListItem::new(label.as_str()))
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().title(state.title).borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state.list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker(current: Option<&i32>) -> PickerState<i32> {
        PickerState::new(
            "Product",
            vec![(3, "퍼티".to_string()), (5, "프라이머".to_string())],
            current,
        )
    }

    #[test]
    fn highlights_current_value() {
        assert_eq!(picker(Some(&5)).selected(), Some(5));
        assert_eq!(picker(Some(&42)).selected(), Some(3));
        assert_eq!(picker(None).selected(), Some(3));
    }

    #[test]
    fn navigation_wraps() {
        let mut state = picker(None);
        state.previous();
        assert_eq!(state.selected(), Some(5));
        state.next();
        assert_eq!(state.selected(), Some(3));
    }

    #[test]
    fn empty_picker_selects_nothing() {
        let mut state: PickerState<i32> = PickerState::new("Product", Vec::new(), None);
        state.next();
        assert_eq!(state.selected(), None);
    }
}
