//! Header: today's date, weekday, and how many todos are left.

use crate::config::Locale;
use crate::context::TodoProvider;
use crate::types::TodoState;
use chrono::{Datelike, FixedOffset, Local, NaiveDate, Weekday};
use todolist_core::environment::Clock;
use todolist_runtime::StateReader;

/// The header view
///
/// The date is read from the clock on every render and never stored.
pub struct TodoHead<'a> {
    state: StateReader<'a, TodoState>,
    clock: &'a dyn Clock,
    locale: Locale,
    utc_offset: Option<FixedOffset>,
}

/// A rendered header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadView {
    /// `2026년 10월 18일`
    pub date: String,
    /// `일요일`
    pub day: String,
    /// `할 일 2 개 남음`
    pub tasks_left: String,
}

impl std::fmt::Display for HeadView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.date)?;
        writeln!(f, "{}", self.day)?;
        write!(f, "{}", self.tasks_left)
    }
}

impl<'a> TodoHead<'a> {
    /// Header bound to a session
    #[must_use]
    pub fn new(provider: &'a TodoProvider) -> Self {
        Self {
            state: provider.state(),
            clock: provider.clock(),
            locale: provider.config().locale,
            utc_offset: provider.config().utc_offset,
        }
    }

    /// Number of todos not yet done
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.state.select(TodoState::remaining_count)
    }

    /// Today's date in the configured time zone
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        let now = self.clock.now();
        match self.utc_offset {
            Some(offset) => now.with_timezone(&offset).date_naive(),
            None => now.with_timezone(&Local).date_naive(),
        }
    }

    /// Render the header from the current snapshot and clock
    #[must_use]
    pub fn render(&self) -> HeadView {
        let today = self.today();
        HeadView {
            date: format_date(today, self.locale),
            day: format_weekday(today.weekday(), self.locale),
            tasks_left: format_tasks_left(self.remaining(), self.locale),
        }
    }
}

/// Long-form date
#[must_use]
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::Ko => format!("{}년 {}월 {}일", date.year(), date.month(), date.day()),
        Locale::En => date.format("%B %-d, %Y").to_string(),
    }
}

/// Weekday name
#[must_use]
pub fn format_weekday(weekday: Weekday, locale: Locale) -> String {
    let name = match locale {
        Locale::Ko => match weekday {
            Weekday::Mon => "월요일",
            Weekday::Tue => "화요일",
            Weekday::Wed => "수요일",
            Weekday::Thu => "목요일",
            Weekday::Fri => "금요일",
            Weekday::Sat => "토요일",
            Weekday::Sun => "일요일",
        },
        Locale::En => match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        },
    };
    name.to_string()
}

/// The "tasks left" line
#[must_use]
pub fn format_tasks_left(remaining: usize, locale: Locale) -> String {
    match (locale, remaining) {
        (Locale::Ko, n) => format!("할 일 {n} 개 남음"),
        (Locale::En, 1) => "1 task left".to_string(),
        (Locale::En, n) => format!("{n} tasks left"),
    }
}
