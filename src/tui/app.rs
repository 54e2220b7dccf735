use chrono::{Datelike, NaiveDate};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::dates::month_bounds;
use crate::report;
use crate::scoring::DayScore;
use crate::store::types::{AvailabilityStatus, ScheduleState};
use crate::tui::theme::ThemeColors;

const MAX_UNDO: usize = 50;
const BEST_DAYS_SHOWN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    BestDays,
}

/// A reversible status change: the date and what it was before.
#[derive(Debug, Clone)]
pub struct UndoAction {
    pub date: NaiveDate,
    pub previous: AvailabilityStatus,
}

pub struct App {
    pub state: ScheduleState,
    pub store_path: PathBuf,
    pub config: Config,
    /// Participant id whose availability this calendar edits.
    pub me: String,
    /// First day of the displayed month. Always explicit state, passed
    /// into every render and query.
    pub month: NaiveDate,
    pub selected: NaiveDate,
    pub input_mode: InputMode,
    /// Computed for the displayed month when the overlay opens.
    pub best_days: Vec<DayScore>,
    pub flash_message: Option<(String, Instant)>,
    pub undo_stack: VecDeque<UndoAction>,
    pub should_quit: bool,
    pub colors: ThemeColors,
}

impl App {
    pub fn new(
        state: ScheduleState,
        store_path: PathBuf,
        config: Config,
        me: String,
        today: NaiveDate,
        colors: ThemeColors,
    ) -> Self {
        Self {
            state,
            store_path,
            config,
            me,
            month: today.with_day(1).unwrap_or(today),
            selected: today,
            input_mode: InputMode::Normal,
            best_days: Vec::new(),
            flash_message: None,
            undo_stack: VecDeque::new(),
            should_quit: false,
            colors,
        }
    }

    /// Last day of the displayed month.
    fn month_end(&self) -> NaiveDate {
        month_bounds(self.month.year(), self.month.month())
            .map(|(_, last)| last)
            .unwrap_or(self.month)
    }

    /// Move the selection by a signed number of days. The displayed month
    /// follows the selection.
    pub fn move_selection(&mut self, days: i64) {
        if let Some(date) = self
            .selected
            .checked_add_signed(chrono::Duration::days(days))
        {
            self.selected = date;
            self.month = date.with_day(1).unwrap_or(date);
        }
    }

    fn shift_month(&mut self, months: i32) {
        let total = self.month.year() * 12 + self.month.month() as i32 - 1 + months;
        let (year, month) = (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32);
        if let Ok((first, last)) = month_bounds(year, month) {
            self.month = first;
            // Keep the same day-of-month where it exists
            self.selected = NaiveDate::from_ymd_opt(year, month, self.selected.day())
                .unwrap_or(last);
        }
    }

    pub fn next_month(&mut self) {
        self.shift_month(1);
    }

    pub fn previous_month(&mut self) {
        self.shift_month(-1);
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        self.selected = date;
        self.month = date.with_day(1).unwrap_or(date);
    }

    pub fn selected_status(&self) -> AvailabilityStatus {
        self.state.status_of(&self.me, self.selected)
    }

    /// Cycle the selected day's status and persist immediately.
    pub fn toggle_selected(&mut self) {
        let previous = self.selected_status();
        let next = previous.cycle();
        self.state.set_status(&self.me, self.selected, next);

        if let Err(e) = crate::store::save_state(&self.store_path, &self.state) {
            // Roll back so the screen never shows unsaved state
            self.state.set_status(&self.me, self.selected, previous);
            self.show_flash(format!("Failed to save: {}", e));
            return;
        }

        self.push_undo(UndoAction {
            date: self.selected,
            previous,
        });
        self.show_flash(format!(
            "{}: {} (z to undo)",
            crate::dates::format_date_key(self.selected),
            next.label()
        ));
    }

    /// Undo the most recent status change.
    pub fn undo_last(&mut self) {
        let action = match self.undo_stack.pop_front() {
            Some(action) => action,
            None => {
                self.show_flash("Nothing to undo".to_string());
                return;
            }
        };

        let current = self.state.status_of(&self.me, action.date);
        self.state.set_status(&self.me, action.date, action.previous);

        if let Err(e) = crate::store::save_state(&self.store_path, &self.state) {
            self.state.set_status(&self.me, action.date, current);
            self.undo_stack.push_front(action);
            self.show_flash(format!("Failed to save: {}", e));
            return;
        }

        self.jump_to(action.date);
        self.show_flash(format!(
            "Undid {}: back to {}",
            crate::dates::format_date_key(action.date),
            action.previous.label()
        ));
    }

    fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push_front(action);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.pop_back();
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Open the best-days overlay for the displayed month.
    pub fn show_best_days(&mut self) {
        match report::best_days_report(
            &self.state,
            &self.config,
            None,
            self.month,
            self.month_end(),
        ) {
            Ok(mut days) => {
                days.truncate(BEST_DAYS_SHOWN);
                self.best_days = days;
                self.input_mode = InputMode::BestDays;
            }
            Err(e) => self.show_flash(format!("Best days failed: {}", e)),
        }
    }

    pub fn dismiss_best_days(&mut self) {
        self.input_mode = InputMode::Normal;
        self.best_days.clear();
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}
