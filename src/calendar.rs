use std::collections::BTreeSet;

use chrono::DateTime;
use chrono_tz::Tz;
use log::debug;

use crate::address_book::AddressBook;
use crate::models::Event;

const CALL_PREFIX: &str = "Call for ";

/// Immutable view of a Chorus Connection calendar.
///
/// Every transform returns a new calendar and leaves `self` untouched, so the usual
/// flow is a chain: `filter_seasons` -> `filter_groups` -> `collapse_call_times`
/// -> `shorten_locations`. Events are kept ordered by start time.
#[derive(Debug, Clone, PartialEq)]
pub struct ChorusCalendar {
    title: String,
    as_of: DateTime<Tz>,
    tz: Tz,
    events: Vec<Event>,
    address_book: AddressBook,
}

impl ChorusCalendar {
    pub fn new(
        title: String,
        as_of: DateTime<Tz>,
        tz: Tz,
        mut events: Vec<Event>,
        address_book: AddressBook,
    ) -> Self {
        events.sort_by_key(|event| event.start);
        Self {
            title,
            as_of,
            tz,
            events,
            address_book,
        }
    }

    /// Title found in the feed; normally the ensemble name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// When the feed was last stamped.
    pub fn as_of(&self) -> DateTime<Tz> {
        self.as_of
    }

    /// Zone events are rendered in.
    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn address_book(&self) -> &AddressBook {
        &self.address_book
    }

    fn with_events(&self, events: Vec<Event>, address_book: AddressBook) -> Self {
        Self {
            title: self.title.clone(),
            as_of: self.as_of,
            tz: self.tz,
            events,
            address_book,
        }
    }

    pub fn filter_seasons<S: AsRef<str>>(&self, seasons: &[S]) -> Self {
        let events: Vec<Event> = self
            .events
            .iter()
            .filter(|event| {
                let season = event.season();
                seasons.iter().any(|wanted| wanted.as_ref() == season)
            })
            .cloned()
            .collect();
        debug!(
            "season filter kept {} of {} events",
            events.len(),
            self.events.len()
        );
        self.with_events(events, self.address_book.clone())
    }

    /// Keep events meant for every group plus those for any of `groups`.
    pub fn filter_groups<S: AsRef<str>>(&self, groups: &[S]) -> Self {
        let events: Vec<Event> = self
            .events
            .iter()
            .filter(|event| {
                event.applies_to_all_groups()
                    || groups
                        .iter()
                        .any(|wanted| event.groups.contains(wanted.as_ref()))
            })
            .cloned()
            .collect();
        debug!(
            "group filter kept {} of {} events",
            events.len(),
            self.events.len()
        );
        self.with_events(events, self.address_book.clone())
    }

    /// Fold each "Call for X" entry into the "X" event right after it.
    pub fn collapse_call_times(&self) -> Self {
        let events = collapse_call_times(&self.events);
        debug!(
            "collapsed call times: {} -> {} events",
            self.events.len(),
            events.len()
        );
        self.with_events(events, self.address_book.clone())
    }

    /// Replace each location with its alias, collecting full addresses in the
    /// returned calendar's address book.
    pub fn shorten_locations(&self) -> Self {
        let mut address_book = self.address_book.clone();
        let events = self
            .events
            .iter()
            .map(|event| event.with_location(address_book.shorten_location(&event.location)))
            .collect();
        self.with_events(events, address_book)
    }

    /// The standard pipeline applied before rendering.
    pub fn customize<S: AsRef<str>, G: AsRef<str>>(&self, seasons: &[S], groups: &[G]) -> Self {
        self.filter_seasons(seasons)
            .filter_groups(groups)
            .collapse_call_times()
            .shorten_locations()
    }

    pub fn seasons(&self) -> BTreeSet<String> {
        self.events.iter().map(Event::season).collect()
    }

    pub fn seasons_pretty(&self) -> String {
        self.seasons().into_iter().collect::<Vec<_>>().join(", ")
    }

    pub fn groups(&self) -> BTreeSet<String> {
        self.events
            .iter()
            .flat_map(|event| event.groups.iter().cloned())
            .collect()
    }
}

struct PendingCall {
    summary: String,
    start: DateTime<Tz>,
}

fn collapse_call_times(events: &[Event]) -> Vec<Event> {
    let mut pending: Option<PendingCall> = None;
    let mut out = Vec::with_capacity(events.len());

    for event in events {
        if let Some(target) = event.summary.strip_prefix(CALL_PREFIX) {
            pending = Some(PendingCall {
                summary: target.to_string(),
                start: event.start,
            });
            continue;
        }

        match pending.take() {
            Some(call) if call.summary == event.summary => {
                out.push(event.with_call_time(call.start))
            }
            _ => out.push(event.clone()),
        }
    }

    out
}
