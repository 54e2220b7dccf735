use chrono::{Datelike, NaiveDate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};

use crate::dates::{format_date_key, format_display_date, format_month_header, month_bounds};
use crate::store::types::AvailabilityStatus;
use crate::tui::app::{App, InputMode};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 10 || area.width < 42 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Calendar(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Fill(1),   // Calendar grid
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_calendar(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Help => render_help_popup(frame, app),
        InputMode::BestDays => render_best_days_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let month = format_month_header(app.month);
    let identity = format!("as {}", app.config.display_name(&app.me));

    let left = vec![
        Span::styled("Tablemate", Style::default().fg(colors.title_color).bold()),
        Span::raw("  "),
        Span::styled(month, Style::default().bold()),
    ];
    let left_len: usize = left.iter().map(|span| span.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(left_len + identity.chars().count());

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(identity, Style::default().fg(colors.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Layout the month as leading-blank-padded weeks, Sunday first.
fn month_cells(month: NaiveDate) -> Vec<Option<NaiveDate>> {
    let (first, last) = match month_bounds(month.year(), month.month()) {
        Ok(bounds) => bounds,
        Err(_) => return Vec::new(),
    };
    let offset = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; offset];
    cells.extend(crate::dates::days_in_range(first, last).into_iter().map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }
    cells
}

fn day_cell<'a>(app: &App, date: NaiveDate, today: NaiveDate) -> Cell<'a> {
    let colors = &app.colors;
    let status = app.state.status_of(&app.me, date);

    let number_style = if date == today {
        colors.today
    } else {
        Style::default()
    };
    let status_line = Line::from(Span::styled(
        format!("{} {}", status.symbol(), short_status(status)),
        Style::default().fg(colors.status_color(status)),
    ));

    let text = Text::from(vec![
        Line::from(Span::styled(format!("{:>2}", date.day()), number_style)),
        status_line,
    ]);

    let cell = Cell::from(text);
    if date == app.selected {
        cell.style(colors.selected)
    } else {
        cell
    }
}

fn short_status(status: AvailabilityStatus) -> &'static str {
    match status {
        AvailabilityStatus::Unknown => "",
        AvailabilityStatus::Available => "avail",
        AvailabilityStatus::Maybe => "maybe",
        AvailabilityStatus::Unavailable => "unav",
    }
}

fn render_calendar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let today = chrono::Local::now().date_naive();

    let cells = month_cells(app.month);
    let rows: Vec<Row> = cells
        .chunks(7)
        .map(|week| {
            let row_cells: Vec<Cell> = week
                .iter()
                .map(|slot| match slot {
                    Some(date) => day_cell(app, *date, today),
                    None => Cell::from(""),
                })
                .collect();
            Row::new(row_cells).height(2).bottom_margin(1)
        })
        .collect();

    let widths = [Constraint::Fill(1); 7];
    let header = Row::new(
        WEEKDAYS
            .iter()
            .map(|day| Cell::from(*day).style(colors.weekday_header)),
    )
    .bottom_margin(1);

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default());

    frame.render_widget(table, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.contains("failed") {
            colors.flash_error
        } else {
            colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let status = app.selected_status();
        let mut spans = vec![
            Span::styled(
                format!("{} ", format_date_key(app.selected)),
                Style::default().fg(colors.muted),
            ),
            Span::styled(
                format!("{} ", status.label()),
                Style::default().fg(colors.status_color(status)),
            ),
            Span::raw(" "),
        ];

        let hints = [
            ("hjkl", ":move "),
            ("Space", ":toggle "),
            ("[", "/"),
            ("]", ":month "),
            ("t", ":today "),
            ("b", ":best "),
            ("z", ":undo "),
            ("?", ":help "),
            ("q", ":quit"),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(
                key,
                Style::default().fg(colors.status_key_color),
            ));
            spans.push(Span::raw(label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the best-days overlay for the displayed month
fn render_best_days_popup(frame: &mut Frame, app: &App) {
    let colors = &app.colors;
    let height = (app.best_days.len() as u16 + 4).max(5);
    let popup_area = centered_rect_fixed(44, height, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Best days this month ")
        .title_style(colors.popup_title)
        .border_style(Style::default().fg(colors.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let mut lines: Vec<Line> = if app.best_days.is_empty() {
        vec![Line::from("No days to rank")]
    } else {
        app.best_days
            .iter()
            .enumerate()
            .map(|(idx, day)| {
                Line::from(vec![
                    Span::styled(
                        format!("{}. ", idx + 1),
                        Style::default().fg(colors.muted),
                    ),
                    Span::styled(format!("{:>3}  ", day.score), Style::default().bold()),
                    Span::raw(format!("{:<10} ", format_display_date(day.date))),
                    Span::styled(format!("✓{} ", day.available), Style::default().fg(colors.available)),
                    Span::styled(format!("?{} ", day.maybe), Style::default().fg(colors.maybe)),
                    Span::styled(
                        format!("✗{}", day.unavailable),
                        Style::default().fg(colors.unavailable),
                    ),
                ])
            })
            .collect()
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc or b to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let colors = &app.colors;
    let popup_area = centered_rect_fixed(48, 15, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .title_style(colors.popup_title)
        .border_style(Style::default().fg(colors.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let help_lines = vec![
        Line::from(vec![
            Span::styled("h j k l / arrows  ", key_style),
            Span::raw("Move between days"),
        ]),
        Line::from(vec![
            Span::styled("Space / Enter     ", key_style),
            Span::raw("Cycle day status"),
        ]),
        Line::from(vec![
            Span::styled("[ / ]             ", key_style),
            Span::raw("Previous / next month"),
        ]),
        Line::from(vec![
            Span::styled("t                 ", key_style),
            Span::raw("Jump to today"),
        ]),
        Line::from(vec![
            Span::styled("b                 ", key_style),
            Span::raw("Best days this month"),
        ]),
        Line::from(vec![
            Span::styled("z                 ", key_style),
            Span::raw("Undo last change"),
        ]),
        Line::from(vec![
            Span::styled("?                 ", key_style),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![
            Span::styled("q / Ctrl-c        ", key_style),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(colors.muted),
        )),
    ];

    frame.render_widget(Paragraph::new(help_lines), inner);
}
