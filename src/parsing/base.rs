use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::Property;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CalendarError, Result};

static DATE_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{8})(?:T(\d{6})(Z)?)?$").expect("valid date value regex")
});

/// Shapes a DTSTART/DTEND/DTSTAMP value can take on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Date(NaiveDate),
    Utc(NaiveDateTime),
    Local(NaiveDateTime),
}

pub fn parse_date_value(raw: &str) -> Result<DateValue> {
    let raw = raw.trim();
    let caps = DATE_VALUE_RE
        .captures(raw)
        .ok_or_else(|| CalendarError::Parse(format!("unexpected date value: {raw}")))?;

    let date = NaiveDate::parse_from_str(&caps[1], "%Y%m%d")
        .map_err(|err| CalendarError::Parse(format!("invalid date {raw}: {err}")))?;
    let Some(time) = caps.get(2) else {
        return Ok(DateValue::Date(date));
    };
    let date_time = NaiveDateTime::parse_from_str(
        &format!("{}{}", &caps[1], time.as_str()),
        "%Y%m%d%H%M%S",
    )
    .map_err(|err| CalendarError::Parse(format!("invalid date-time {raw}: {err}")))?;

    if caps.get(3).is_some() {
        Ok(DateValue::Utc(date_time))
    } else {
        Ok(DateValue::Local(date_time))
    }
}

/// Resolve a date or date-time property into an instant. Plain dates and floating times
/// are placed in `tz`. Full timestamps keep their own zone: UTC stays UTC and a TZID
/// value stays in the named zone.
pub fn normalize_datetime(property: &Property, tz: Tz) -> Result<DateTime<Tz>> {
    let key = property.key();
    let value_type = property.params().get("VALUE").map(|param| param.value());
    match value_type {
        None | Some("DATE") | Some("DATE-TIME") => {}
        Some(other) => {
            return Err(CalendarError::Parse(format!(
                "unexpected date type {other} for {key}"
            )))
        }
    }

    match (parse_date_value(property.value())?, value_type) {
        (DateValue::Date(date), None | Some("DATE")) => {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| CalendarError::Parse(format!("invalid date for {key}")))?;
            to_timezone_datetime(midnight, tz)
                .ok_or_else(|| CalendarError::Parse(format!("no midnight on {date} in {tz}")))
        }
        (DateValue::Utc(naive), None | Some("DATE-TIME")) => {
            Ok(Utc.from_utc_datetime(&naive).with_timezone(&Tz::UTC))
        }
        (DateValue::Local(naive), None | Some("DATE-TIME")) => {
            let zone = match property.params().get("TZID") {
                Some(param) => parse_tzid(param.value())?,
                None => tz,
            };
            to_timezone_datetime(naive, zone)
                .ok_or_else(|| {
                    CalendarError::Parse(format!("{naive} does not exist in {zone} for {key}"))
                })
        }
        (_, Some(declared)) => Err(CalendarError::Parse(format!(
            "{key} value {} does not match declared type {declared}",
            property.value()
        ))),
    }
}

fn parse_tzid(raw: &str) -> Result<Tz> {
    let name = raw.trim().trim_matches('"');
    name.parse::<Tz>()
        .map_err(|_| CalendarError::Parse(format!("unknown TZID: {name}")))
}

pub fn to_timezone_datetime(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => None,
    }
}

/// Undo iCalendar TEXT escaping (`\n`, `\,`, `\;`, `\\`). Only for properties that
/// `icalendar` hands back raw, such as `NAME`; SUMMARY, LOCATION, DESCRIPTION and
/// `X-` properties arrive already unescaped.
pub fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped @ (',' | ';' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out.trim_end_matches('\r').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::America::{Los_Angeles, New_York};

    #[test]
    fn classifies_date_values() {
        assert!(matches!(
            parse_date_value("20190915").expect("date"),
            DateValue::Date(_)
        ));
        assert!(matches!(
            parse_date_value("20190915T190000Z").expect("utc"),
            DateValue::Utc(_)
        ));
        assert!(matches!(
            parse_date_value("20190915T190000").expect("local"),
            DateValue::Local(_)
        ));
        assert!(parse_date_value("2019-09-15").is_err());
        assert!(parse_date_value("20191345").is_err());
    }

    #[test]
    fn date_only_becomes_local_midnight() {
        let prop = Property::new("DTSTART", "20190915");
        let dt = normalize_datetime(&prop, New_York).expect("normalize date");
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
        assert_eq!(dt.timezone(), New_York);
    }

    #[test]
    fn utc_values_stay_utc() {
        let prop = Property::new("DTSTART", "20181208T010000Z");
        let dt = normalize_datetime(&prop, New_York).expect("normalize utc");
        assert_eq!(dt.timezone(), Tz::UTC);
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2018-12-08 01:00");
        assert_eq!(
            dt.with_timezone(&New_York).format("%Y-%m-%d %H:%M").to_string(),
            "2018-12-07 20:00"
        );
    }

    #[test]
    fn floating_values_use_the_given_zone() {
        let prop = Property::new("DTSTART", "20181207T190000");
        let dt = normalize_datetime(&prop, New_York).expect("normalize floating");
        assert_eq!(dt.timezone(), New_York);
        assert_eq!(dt.hour(), 19);
    }

    #[test]
    fn tzid_values_keep_their_own_zone() {
        let mut prop = Property::new("DTSTART", "20181207T170000");
        prop.add_parameter("TZID", "America/Los_Angeles");
        let dt = normalize_datetime(&prop, New_York).expect("normalize tzid");
        assert_eq!(dt.timezone(), Los_Angeles);
        assert_eq!(dt.hour(), 17);
        assert_eq!(
            dt,
            Los_Angeles
                .with_ymd_and_hms(2018, 12, 7, 17, 0, 0)
                .single()
                .expect("valid sample datetime")
        );
    }

    #[test]
    fn unexpected_date_types_fail() {
        let mut period = Property::new("DTSTART", "20181207T170000/PT1H");
        period.add_parameter("VALUE", "PERIOD");
        assert!(matches!(
            normalize_datetime(&period, New_York),
            Err(CalendarError::Parse(_))
        ));

        let garbage = Property::new("DTSTART", "tomorrow");
        assert!(normalize_datetime(&garbage, New_York).is_err());

        let mut mismatched = Property::new("DTSTART", "20181207T170000");
        mismatched.add_parameter("VALUE", "DATE");
        assert!(normalize_datetime(&mismatched, New_York).is_err());

        let mut unknown_zone = Property::new("DTSTART", "20181207T170000");
        unknown_zone.add_parameter("TZID", "Mars/Olympus_Mons");
        assert!(normalize_datetime(&unknown_zone, New_York).is_err());
    }

    #[test]
    fn nonexistent_local_time_fails() {
        let prop = Property::new("DTSTART", "20190310T023000");
        assert!(normalize_datetime(&prop, New_York).is_err());
    }

    #[test]
    fn unescapes_text_values() {
        assert_eq!(
            unescape_text(r"Interchurch Center\, 475 Riverside Dr"),
            "Interchurch Center, 475 Riverside Dr"
        );
        assert_eq!(unescape_text(r"Info: a\n\nGroup: b"), "Info: a\n\nGroup: b");
        assert_eq!(unescape_text(r"semi\;colon back\\slash"), "semi;colon back\\slash");
        assert_eq!(unescape_text("plain text"), "plain text");
    }
}
