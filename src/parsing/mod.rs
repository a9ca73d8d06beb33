pub mod base;
pub mod description;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarComponent, Component, Property};
use log::{debug, info};

use crate::address_book::AddressBook;
use crate::calendar::ChorusCalendar;
use crate::error::{CalendarError, Result};
use crate::models::Event;

use base::{normalize_datetime, unescape_text};
use description::Description;

pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::America::New_York;

const TITLE_KEYS: [&str; 2] = ["X-WR-CALNAME", "NAME"];

/// `icalendar` unescapes every TEXT property it knows about, which leaves `NAME` raw.
fn title_text(prop: &Property) -> String {
    if prop.key() == "NAME" {
        unescape_text(prop.value())
    } else {
        prop.value().to_string()
    }
}

/// Turns raw iCalendar text into a [`ChorusCalendar`]. Dates and floating times are read
/// in `tz`; zoned timestamps keep their own zone.
#[derive(Debug, Clone, Copy)]
pub struct IcalParser {
    tz: Tz,
}

impl Default for IcalParser {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_ZONE)
    }
}

impl IcalParser {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn parse(&self, ical_txt: &str) -> Result<ChorusCalendar> {
        if !ical_txt.trim_start().starts_with("BEGIN:VCALENDAR") {
            return Err(CalendarError::Parse(
                "feed does not start with BEGIN:VCALENDAR".to_string(),
            ));
        }
        let calendar: Calendar = ical_txt
            .parse()
            .map_err(|err| CalendarError::Parse(format!("{err}")))?;

        let title = TITLE_KEYS
            .iter()
            .find_map(|key| calendar.properties.iter().find(|prop| prop.key() == *key))
            .map(title_text)
            .unwrap_or_default();

        let vevents: Vec<&icalendar::Event> = calendar
            .components
            .iter()
            .filter_map(|component| match component {
                CalendarComponent::Event(vevent) => Some(vevent),
                _ => None,
            })
            .collect();

        let as_of = self.as_of(&calendar, &vevents)?;
        let events = vevents
            .iter()
            .map(|vevent| self.parse_vevent(vevent))
            .collect::<Result<Vec<_>>>()?;

        info!("parsed {} events from '{}'", events.len(), title);
        Ok(ChorusCalendar::new(
            title,
            as_of,
            self.tz,
            events,
            AddressBook::new(),
        ))
    }

    /// DTSTAMP of the first event, else of the calendar itself, else now.
    fn as_of(&self, calendar: &Calendar, vevents: &[&icalendar::Event]) -> Result<DateTime<Tz>> {
        let stamp = vevents
            .first()
            .and_then(|vevent| vevent.properties().get("DTSTAMP"))
            .or_else(|| calendar.properties.iter().find(|prop| prop.key() == "DTSTAMP"));
        match stamp {
            Some(stamp) => Ok(normalize_datetime(stamp, self.tz)?.with_timezone(&self.tz)),
            None => {
                debug!("feed carries no DTSTAMP, stamping with the current time");
                Ok(Utc::now().with_timezone(&self.tz))
            }
        }
    }

    fn parse_vevent(&self, vevent: &icalendar::Event) -> Result<Event> {
        let properties = vevent.properties();
        let text = |key: &str| {
            properties
                .get(key)
                .map(|prop| prop.value().to_string())
                .unwrap_or_default()
        };

        let description = properties
            .get("DESCRIPTION")
            .map(|prop| Description::parse(prop.value()))
            .unwrap_or_default();
        let summary = text("SUMMARY");
        let start = self.required_datetime(vevent, "DTSTART", &summary)?;
        let end = self.required_datetime(vevent, "DTEND", &summary)?;
        if end < start {
            return Err(CalendarError::Parse(format!(
                "event '{summary}' ends before it starts"
            )));
        }

        Ok(Event {
            location: text("LOCATION"),
            summary,
            start,
            end,
            info: description.info,
            concert: description.concert,
            groups: description.groups,
            call_time: None,
        })
    }

    fn required_datetime(
        &self,
        vevent: &icalendar::Event,
        key: &str,
        summary: &str,
    ) -> Result<DateTime<Tz>> {
        let prop = vevent
            .properties()
            .get(key)
            .ok_or_else(|| CalendarError::Parse(format!("event '{summary}' has no {key}")))?;
        normalize_datetime(prop, self.tz)
    }
}
