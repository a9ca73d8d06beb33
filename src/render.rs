use std::fmt;

use serde::Serialize;

use crate::calendar::ChorusCalendar;
use crate::display::EventKind;
use crate::models::Event;

/// Everything a template needs to draw one event row.
#[derive(Debug, Serialize)]
pub struct EventView {
    pub summary: String,
    pub location: String,
    pub start: String,
    pub end: String,
    pub season: String,
    pub date_pretty: String,
    pub time_pretty: String,
    pub info: String,
    pub concert: String,
    pub groups: Vec<String>,
    pub call_time: Option<String>,
    pub kind: EventKind,
    pub row_class: &'static str,
    pub bg_color: &'static str,
    pub bold: bool,
    pub style: &'static str,
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        Self {
            summary: event.summary.clone(),
            location: event.location.clone(),
            start: event.start.to_rfc3339(),
            end: event.end.to_rfc3339(),
            season: event.season(),
            date_pretty: event.date_pretty(),
            time_pretty: event.time_pretty(),
            info: event.info.clone(),
            concert: event.concert.clone(),
            groups: event.groups.iter().cloned().collect(),
            call_time: event.call_time.map(|t| t.to_rfc3339()),
            kind: event.kind(),
            row_class: event.row_class(),
            bg_color: event.bg_color(),
            bold: event.bold(),
            style: event.style(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GlossaryEntry {
    pub alias: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct CalendarView {
    pub title: String,
    pub as_of: String,
    pub time_zone: String,
    pub seasons_pretty: String,
    pub events: Vec<EventView>,
    pub glossary: Vec<GlossaryEntry>,
}

impl From<&ChorusCalendar> for CalendarView {
    fn from(calendar: &ChorusCalendar) -> Self {
        Self {
            title: calendar.title().to_string(),
            as_of: calendar.as_of().to_rfc3339(),
            time_zone: calendar.tz().name().to_string(),
            seasons_pretty: calendar.seasons_pretty(),
            events: calendar.events().iter().map(EventView::from).collect(),
            glossary: calendar
                .address_book()
                .glossary()
                .map(|(alias, address)| GlossaryEntry {
                    alias: alias.to_string(),
                    address: address.to_string(),
                })
                .collect(),
        }
    }
}

pub fn to_json(calendar: &ChorusCalendar) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&CalendarView::from(calendar))
}

/// Plain-text rendering used by the command line.
pub struct TextReport<'a>(pub &'a ChorusCalendar);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let calendar = self.0;
        writeln!(f, "{}", calendar.title())?;
        writeln!(
            f,
            "As of {}",
            calendar.as_of().format("%A, %B %-d, %Y at %-I:%M%P")
        )?;
        if !calendar.events().is_empty() {
            writeln!(f, "Seasons: {}", calendar.seasons_pretty())?;
        }
        writeln!(f)?;

        if calendar.events().is_empty() {
            writeln!(f, "No events.")?;
        }
        for event in calendar.events() {
            let marker = if event.bold() { "*" } else { " " };
            write!(
                f,
                "{marker} {} | {} | {}",
                event.date_pretty(),
                event.time_pretty(),
                event.summary
            )?;
            if !event.location.is_empty() {
                write!(f, " | {}", event.location)?;
            }
            writeln!(f)?;
            if !event.concert.is_empty() {
                writeln!(f, "    Concert: {}", event.concert)?;
            }
            if !event.info.is_empty() {
                writeln!(f, "    Info: {}", event.info)?;
            }
        }

        let address_book = calendar.address_book();
        if !address_book.is_empty() {
            writeln!(f)?;
            writeln!(f, "Locations")?;
            for (alias, address) in address_book.glossary() {
                writeln!(f, "    {alias}: {address}")?;
            }
        }
        Ok(())
    }
}

pub fn to_text(calendar: &ChorusCalendar) -> String {
    TextReport(calendar).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_book::AddressBook;
    use crate::models::tests::{local, sample_event};
    use chrono_tz::America::New_York;

    fn rendered_calendar() -> ChorusCalendar {
        let mut concert = sample_event("Concert", local(2018, 12, 7, 20, 0), local(2018, 12, 7, 22, 0));
        concert.location = "Interchurch Center, 475 Riverside Dr".to_string();
        concert.concert = "Winter Concert".to_string();
        let mut call =
            sample_event("Call for Concert", local(2018, 12, 7, 18, 30), local(2018, 12, 7, 19, 0));
        call.location = concert.location.clone();
        let rehearsal = sample_event("Rehearsal", local(2018, 12, 3, 19, 0), local(2018, 12, 3, 22, 0));

        ChorusCalendar::new(
            "Test Chorus".to_string(),
            local(2018, 12, 1, 10, 0),
            New_York,
            vec![call, concert, rehearsal],
            AddressBook::new(),
        )
        .collapse_call_times()
        .shorten_locations()
    }

    #[test]
    fn text_report_lists_events_and_glossary() {
        let text = to_text(&rendered_calendar());
        let expected = "\
Test Chorus
As of Saturday, December 1, 2018 at 10:00am
Seasons: 2018-19

  Monday, December 3, 2018 | 7-10pm | Rehearsal
* Friday, December 7, 2018 | 8-10pm; call time 6:30pm | Concert | Interchurch
    Concert: Winter Concert

Locations
    Interchurch: 475 Riverside Dr
";
        assert_eq!(text, expected);
    }

    #[test]
    fn json_view_carries_derived_properties() {
        let json = to_json(&rendered_calendar()).expect("serialize view");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["title"], "Test Chorus");
        assert_eq!(value["time_zone"], "America/New_York");
        let concert = &value["events"][1];
        assert_eq!(concert["time_pretty"], "8-10pm; call time 6:30pm");
        assert_eq!(concert["row_class"], "table-primary");
        assert_eq!(concert["kind"], "headline");
        assert_eq!(concert["bold"], true);
        assert_eq!(concert["call_time"], "2018-12-07T18:30:00-05:00");
        assert_eq!(value["glossary"][0]["alias"], "Interchurch");
        assert_eq!(value["glossary"][0]["address"], "475 Riverside Dr");
    }

    #[test]
    fn empty_calendar_says_so() {
        let empty = ChorusCalendar::new(
            "Empty".to_string(),
            local(2018, 12, 1, 10, 0),
            New_York,
            Vec::new(),
            AddressBook::new(),
        );
        assert!(to_text(&empty).contains("No events."));
    }
}
