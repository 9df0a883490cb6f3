use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, DurationRound, NaiveDate, TimeDelta, TimeZone};

use crate::calendar::{self, MonthGrid, YearGrid};
use crate::grouping::summarize_day;
use crate::models::{DaySummary, Entry, FoodMatch, MealType, resolve_wall_clock};
use crate::store::EntryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// UI state for one run of the app: the entry store plus view mode,
/// selected day, displayed month and theme. Only the store is persisted.
pub struct Session {
    store: EntryStore,
    view: View,
    selected_date: NaiveDate,
    displayed_month: NaiveDate,
    highlighted_day: Option<NaiveDate>,
    theme: Theme,
}

impl Session {
    #[must_use]
    pub fn new(store: EntryStore, today: NaiveDate) -> Self {
        Self {
            store,
            view: View::List,
            selected_date: today,
            displayed_month: today.with_day(1).unwrap_or(today),
            highlighted_day: None,
            theme: Theme::default(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    #[must_use]
    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// First day of the month shown in the calendar view.
    #[must_use]
    pub fn displayed_month(&self) -> NaiveDate {
        self.displayed_month
    }

    #[must_use]
    pub fn highlighted_day(&self) -> Option<NaiveDate> {
        self.highlighted_day
    }

    pub fn previous_month(&mut self) -> Result<()> {
        self.displayed_month = calendar::shift_month(self.displayed_month, -1)?;
        self.highlighted_day = None;
        Ok(())
    }

    pub fn next_month(&mut self) -> Result<()> {
        self.displayed_month = calendar::shift_month(self.displayed_month, 1)?;
        self.highlighted_day = None;
        Ok(())
    }

    pub fn go_to_today(&mut self, today: NaiveDate) -> Result<()> {
        self.displayed_month = calendar::shift_month(today, 0)?;
        self.highlighted_day = None;
        Ok(())
    }

    pub fn show_month(&mut self, year: i32, month: u32) -> Result<()> {
        self.displayed_month = calendar::first_of_month(year, month)?;
        self.highlighted_day = None;
        Ok(())
    }

    /// Show the list view for `date`.
    pub fn select_day(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.view = View::List;
    }

    /// Toggle the calendar highlight on a day of the displayed month. Days of
    /// neighbouring months are not selectable; returns whether the click took.
    pub fn toggle_highlight(&mut self, date: NaiveDate) -> bool {
        if !calendar::same_month(date, self.displayed_month) {
            return false;
        }
        self.highlighted_day = if self.highlighted_day == Some(date) {
            None
        } else {
            Some(date)
        };
        true
    }

    /// Log `food` for the selected day at the current time of day in `now`'s
    /// timezone. The time is cut to milliseconds, the precision entries are
    /// stored with; a time inside a DST gap moves past the gap.
    pub fn add_food<Tz: TimeZone>(
        &mut self,
        food: &FoodMatch,
        meal_type: MealType,
        now: &DateTime<Tz>,
    ) -> Result<Entry> {
        let wall_clock = self
            .selected_date
            .and_time(now.time())
            .duration_trunc(TimeDelta::milliseconds(1))
            .context("Failed to truncate entry time")?;
        let date = resolve_wall_clock(&now.timezone(), wall_clock)
            .with_context(|| format!("No valid time of day on {}", self.selected_date))?
            .fixed_offset();
        let entry = Entry::from_match(self.store.next_id(now), food, meal_type, date);
        self.store.add(entry.clone())?;
        Ok(entry)
    }

    pub fn delete_entry(&mut self, id: &str) -> Result<bool> {
        self.store.remove(id)
    }

    #[must_use]
    pub fn day_summary(&self) -> DaySummary {
        summarize_day(self.store.entries(), self.selected_date)
    }

    pub fn month_grid(&self) -> Result<MonthGrid> {
        calendar::month_grid(
            self.store.entries(),
            self.displayed_month.year(),
            self.displayed_month.month(),
        )
    }

    #[must_use]
    pub fn year_grid(&self, today: NaiveDate) -> YearGrid {
        calendar::year_grid(self.store.entries(), today)
    }
}
