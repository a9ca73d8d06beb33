use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use serde::Serialize;

/// e.g. "7pm" or "10:30am"; the am/pm suffix is dropped when `omit_meridiem` is set.
pub fn short_time(t: &DateTime<Tz>, omit_meridiem: bool) -> String {
    let mut fmt = String::from("%-I");
    if t.minute() > 0 {
        fmt.push_str(":%M");
    }
    if !omit_meridiem {
        fmt.push_str("%p");
    }
    t.format(&fmt).to_string().to_lowercase()
}

pub fn same_meridiem(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    (a.hour() < 12) == (b.hour() < 12)
}

/// Visual category of an event, derived from its summary alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DressRehearsal,
    Headline,
    Gathering,
    Benefit,
    Dress,
    Performance,
    Rehearsal,
    Other,
}

impl EventKind {
    pub fn classify(summary: &str) -> Self {
        let lower = summary.to_lowercase();
        if summary == "Dress Rehearsal" {
            EventKind::DressRehearsal
        } else if summary.contains("Concert") || summary.contains("Recording") {
            EventKind::Headline
        } else if summary.contains("Retreat") || summary.contains("Singers Meeting") {
            EventKind::Gathering
        } else if summary.contains("Benefit") {
            EventKind::Benefit
        } else if lower.contains("dress") || lower.contains("sitzprobe") {
            EventKind::Dress
        } else if lower.contains("performance") {
            EventKind::Performance
        } else if lower.contains("rehearsal") {
            EventKind::Rehearsal
        } else {
            EventKind::Other
        }
    }

    pub fn row_class(self) -> &'static str {
        match self {
            EventKind::DressRehearsal => "table-info",
            EventKind::Headline => "table-primary",
            EventKind::Gathering => "table-warning",
            EventKind::Benefit => "table-danger",
            EventKind::Dress => "table-secondary",
            EventKind::Performance => "table-success",
            EventKind::Rehearsal => "table-light",
            EventKind::Other => "table-active",
        }
    }

    pub fn bg_color(self) -> &'static str {
        match self {
            EventKind::DressRehearsal => "88c2e6", // light blue
            EventKind::Headline => "4ea4d8",       // blue
            EventKind::Gathering => "fbca99",      // orange
            EventKind::Benefit => "d96a75",        // red
            EventKind::Dress => "bfafcf",          // light purple
            EventKind::Performance => "9f88b7",    // purple
            EventKind::Rehearsal => "ffffff",      // white
            EventKind::Other => "bfbfbf",          // grey
        }
    }
}

pub fn is_bold(summary: &str) -> bool {
    summary.contains("Concert")
        || summary.contains("Recording")
        || summary.contains("Benefit")
        || summary.to_lowercase().contains("performance")
}
