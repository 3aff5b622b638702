//! Table widget for displaying data in rows and columns.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::theme::Theme;

/// A column definition for the table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: Constraint,
}

impl TableColumn {
    /// Fixed-width column.
    pub fn new(header: impl Into<String>, width: u16) -> Self {
        Self {
            header: header.into(),
            width: Constraint::Length(width),
        }
    }

    /// Column that takes the remaining space.
    pub fn flex(header: impl Into<String>, min_width: u16) -> Self {
        Self {
            header: header.into(),
            width: Constraint::Min(min_width),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableCell {
    pub content: String,
    pub style: Option<Style>,
}

impl TableCell {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.style = Some(Style::default().fg(color));
        self
    }

    pub fn muted(content: impl Into<String>) -> Self {
        Self::new(content).color(Color::DarkGray)
    }

    /// For ids and other values the eye should land on.
    pub fn cyan(content: impl Into<String>) -> Self {
        Self::new(content).color(Color::Cyan)
    }
}

#[derive(Debug, Clone)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

/// Bordered table with a single highlighted row.
#[derive(Debug)]
pub struct DataTable<'a> {
    title: Option<String>,
    columns: &'a [TableColumn],
    rows: &'a [TableRow],
    selected: Option<usize>,
    /// Shown instead of the table when there are no rows.
    empty_message: &'a str,
    focused: bool,
    theme: Theme,
}

impl<'a> DataTable<'a> {
    pub fn new(columns: &'a [TableColumn], rows: &'a [TableRow]) -> Self {
        Self {
            title: None,
            columns,
            rows,
            selected: None,
            empty_message: "Nothing to show.",
            focused: true,
            theme: Theme::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!(" {} rows ", self.rows.len()));
        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        if self.rows.is_empty() {
            let empty = Paragraph::new(self.empty_message)
                .style(self.theme.muted_style())
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            self.columns
                .iter()
                .map(|c| Cell::from(c.header.clone()))
                .collect::<Vec<_>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| {
                Row::new(row.cells.iter().map(|cell| {
                    let c = Cell::from(cell.content.clone());
                    match cell.style {
                        Some(style) => c.style(style),
                        None => c,
                    }
                }))
            })
            .collect();

        let widths: Vec<Constraint> = self.columns.iter().map(|c| c.width).collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(self.theme.selected_row());

        let mut state = TableState::default();
        state.select(self.selected.map(|i| i.min(self.rows.len() - 1)));

        frame.render_stateful_widget(table, area, &mut state);
    }
}
