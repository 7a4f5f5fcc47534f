//! Google Calendar export for events
//!
//! Manual events store their start time in front of the location
//! (`"5:00 PM • Hall A"`). A parseable `h:mm AM/PM` time gives a two-hour
//! slot; anything else becomes an all-day entry.

use crate::types::Event;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use reqwest::Url;
use std::sync::OnceLock;

const GCAL_RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Separator `add_event` writes between time and location
pub const TIME_SEPARATOR: &str = " • ";

const SLOT_HOURS: i64 = 2;

/// Split a stored location into its time prefix and the place
pub fn split_location(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(TIME_SEPARATOR) {
        Some((time, place)) => (Some(time.trim()), place),
        None => (None, raw),
    }
}

/// First `h:mm AM/PM` in the text as a 24-hour time
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    static CLOCK: OnceLock<Option<Regex>> = OnceLock::new();
    let re = CLOCK
        .get_or_init(|| Regex::new(r"(?i)(\d+):(\d+)\s*(AM|PM)").ok())
        .as_ref()?;

    let caps = re.captures(text)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let pm = caps[3].eq_ignore_ascii_case("pm");
    if pm && hour != 12 {
        hour += 12;
    }
    if !pm && hour == 12 {
        hour = 0;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// The `dates` parameter: a timed slot or an all-day range
fn date_range(date: NaiveDate, time: Option<&str>) -> String {
    match time.and_then(parse_clock) {
        Some(start) => {
            let start = NaiveDateTime::new(date, start);
            let end = start + Duration::hours(SLOT_HOURS);
            format!(
                "{}/{}",
                start.format("%Y%m%dT%H%M%S"),
                end.format("%Y%m%dT%H%M%S")
            )
        }
        None => format!(
            "{}/{}",
            date.format("%Y%m%d"),
            (date + Duration::days(1)).format("%Y%m%d")
        ),
    }
}

/// "Add to Google Calendar" link for a dated event. Undated events have none.
pub fn gcal_url(event: &Event) -> Option<String> {
    let date = event.date?;
    let (time, place) = split_location(event.location.as_deref().unwrap_or_default());

    let details: Vec<String> = [
        event.host.as_ref().map(|h| format!("Host: {}", h)),
        event.source_url.as_ref().map(|u| format!("RSVP: {}", u)),
    ]
    .into_iter()
    .flatten()
    .collect();

    let title = if event.name.is_empty() { "Event" } else { event.name.as_str() };
    let dates = date_range(date, time);
    let details = details.join("\n");
    let url = Url::parse_with_params(
        GCAL_RENDER_URL,
        &[
            ("action", "TEMPLATE"),
            ("text", title),
            ("dates", dates.as_str()),
            ("location", place),
            ("details", details.as_str()),
        ],
    )
    .ok()?;
    Some(url.to_string())
}
