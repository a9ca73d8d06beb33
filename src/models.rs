use std::collections::BTreeSet;

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;

use crate::display::{self, EventKind};

/// One calendar entry. Everything beyond the stored fields is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub summary: String,
    pub location: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub info: String,
    pub concert: String,
    /// Empty means the event applies to every group.
    pub groups: BTreeSet<String>,
    pub call_time: Option<DateTime<Tz>>,
}

impl Event {
    /// e.g. "2019-20" for events between July 1, 2019 and June 30, 2020
    pub fn season(&self) -> String {
        let fall_year = if self.start.month() >= 7 {
            self.start.year()
        } else {
            self.start.year() - 1
        };
        format!("{}-{:02}", fall_year, (fall_year + 1).rem_euclid(100))
    }

    /// e.g. "Thursday, September 6, 2018"
    pub fn date_pretty(&self) -> String {
        self.start.format("%A, %B %-d, %Y").to_string()
    }

    /// e.g. "8-10pm; call time 6:30pm"
    pub fn time_pretty(&self) -> String {
        let omit_first = display::same_meridiem(&self.start, &self.end);
        let mut out = format!(
            "{}-{}",
            display::short_time(&self.start, omit_first),
            display::short_time(&self.end, false)
        );
        if let Some(call_time) = &self.call_time {
            out.push_str("; call time ");
            out.push_str(&display::short_time(call_time, false));
        }
        out
    }

    pub fn kind(&self) -> EventKind {
        EventKind::classify(&self.summary)
    }

    pub fn row_class(&self) -> &'static str {
        self.kind().row_class()
    }

    pub fn bg_color(&self) -> &'static str {
        self.kind().bg_color()
    }

    pub fn bold(&self) -> bool {
        display::is_bold(&self.summary)
    }

    pub fn style(&self) -> &'static str {
        if self.bold() {
            "font-weight: bold"
        } else {
            ""
        }
    }

    pub fn applies_to_all_groups(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn with_location(&self, location: String) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }

    pub fn with_call_time(&self, call_time: DateTime<Tz>) -> Self {
        Self {
            call_time: Some(call_time),
            ..self.clone()
        }
    }
}
