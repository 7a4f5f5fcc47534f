//! Typed pipeline operations over a [`RecordStore`]
//!
//! Events, contacts and intel notes with the normalisation rules the forms
//! apply: trimmed strings, blanks stored as null, sensible status defaults.

use crate::store::{Filter, Order, RecordStore, Table};
use crate::types::*;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Location used when only a time is given
const DEFAULT_LOCATION: &str = "San Francisco, CA";

/// Form input for a manually added event
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub host: Option<String>,
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
    pub goal: Option<String>,
    pub notes: Option<String>,
    pub source_url: Option<String>,
}

/// A quick note about someone met at an event
#[derive(Debug, Clone, Default)]
pub struct FieldNote {
    pub name: Option<String>,
    pub fund: Option<String>,
    pub title: Option<String>,
    pub insight: Option<String>,
    pub follow_up: Option<String>,
    pub notes: Option<String>,
}

/// Headline numbers for the events calendar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    pub upcoming: usize,
    pub going: usize,
    pub this_week: usize,
}

/// Headline numbers for the contact pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactStats {
    pub total: usize,
    pub active_conversations: usize,
    pub meetings: usize,
    /// Replied or meeting, as a percentage of everyone contacted
    pub response_rate: u32,
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Serialize a record for the store, leaving the id to the store
fn to_record<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    let mut record = serde_json::to_value(value)?;
    if let Some(fields) = record.as_object_mut() {
        fields.remove("id");
    }
    Ok(record)
}

fn decode<T: serde::de::DeserializeOwned>(records: Vec<serde_json::Value>) -> Result<Vec<T>> {
    records
        .into_iter()
        .map(|r| serde_json::from_value(r).context("Malformed record"))
        .collect()
}

// ============================================================================
// Events
// ============================================================================

/// Add an event from the form. Returns the stored event.
pub fn add_event(store: &impl RecordStore, input: NewEvent) -> Result<Event> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(anyhow::anyhow!("Event name is required"));
    }

    let location = match clean(input.time.as_deref()) {
        Some(time) => Some(format!(
            "{} • {}",
            time,
            clean(input.location.as_deref()).unwrap_or_else(|| DEFAULT_LOCATION.to_string())
        )),
        None => clean(input.location.as_deref()),
    };

    let event = Event {
        id: String::new(),
        name: name.to_string(),
        date: input.date,
        location,
        host: clean(input.host.as_deref()),
        event_type: input.event_type,
        status: input.status.unwrap_or_default(),
        goal: clean(input.goal.as_deref()),
        notes: clean(input.notes.as_deref()),
        source_url: clean(input.source_url.as_deref()),
        source: Some("manual".to_string()),
    };

    insert_event(store, event)
}

fn insert_event(store: &impl RecordStore, mut event: Event) -> Result<Event> {
    event.id = store.insert(Table::Events, to_record(&event)?)?;
    Ok(event)
}

/// Insert a scraped event unless one with the same name and date exists.
/// Returns true when inserted.
pub fn upsert_event(store: &impl RecordStore, event: Event) -> Result<bool> {
    let filter = Filter::new()
        .eq("name", event.name.as_str())
        .eq("date", serde_json::to_value(event.date)?);

    if !store.query(Table::Events, &filter, None)?.is_empty() {
        tracing::debug!("Skipping known event {:?}", event.name);
        return Ok(false);
    }

    let event = insert_event(store, event)?;
    tracing::info!("Added: {} on {:?}", event.name, event.date);
    Ok(true)
}

/// All events, soonest first; undated events last
pub fn list_events(store: &impl RecordStore) -> Result<Vec<Event>> {
    decode(store.query(Table::Events, &Filter::new(), Some(&Order::asc("date")))?)
}

pub fn get_event(store: &impl RecordStore, id: &str) -> Result<Option<Event>> {
    let mut found: Vec<Event> = decode(store.query(Table::Events, &Filter::new().eq("id", id), None)?)?;
    Ok(found.pop())
}

pub fn set_event_status(store: &impl RecordStore, id: &str, status: EventStatus) -> Result<()> {
    store.update(Table::Events, id, json!({ "status": status }))
}

pub fn set_event_goal(store: &impl RecordStore, id: &str, goal: &str) -> Result<()> {
    store.update(Table::Events, id, json!({ "goal": clean(Some(goal)) }))
}

pub fn set_event_notes(store: &impl RecordStore, id: &str, notes: &str) -> Result<()> {
    store.update(Table::Events, id, json!({ "notes": clean(Some(notes)) }))
}

/// Calendar view filter: everything, one RSVP status, or one event type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    Status(EventStatus),
    Type(EventType),
}

impl EventFilter {
    /// "all", a status name, or an event type name
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(EventFilter::All);
        }
        EventStatus::parse(s)
            .map(EventFilter::Status)
            .or_else(|| EventType::parse(s).map(EventFilter::Type))
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Status(status) => event.status == *status,
            EventFilter::Type(kind) => event.event_type == Some(*kind),
        }
    }
}

/// Apply a filter, keeping the input order
pub fn filter_events(events: &[Event], filter: EventFilter) -> Vec<Event> {
    events.iter().filter(|e| filter.matches(e)).cloned().collect()
}

/// Split into (upcoming, past). Undated events count as upcoming.
pub fn split_by_date(events: Vec<Event>, today: NaiveDate) -> (Vec<Event>, Vec<Event>) {
    events
        .into_iter()
        .partition(|e| e.date.map_or(true, |d| d >= today))
}

/// Upcoming, going and this-week counts relative to `today`
pub fn event_stats(events: &[Event], today: NaiveDate) -> EventStats {
    let next_week = today + Duration::days(7);
    let mut stats = EventStats::default();

    for event in events {
        let Some(date) = event.date else { continue };

        let open = matches!(event.status, EventStatus::Going | EventStatus::Maybe);
        if open && date >= today {
            stats.upcoming += 1;
        }
        if event.status == EventStatus::Going {
            stats.going += 1;
        }
        if date >= today && date <= next_week {
            stats.this_week += 1;
        }
    }

    stats
}

// ============================================================================
// Contacts
// ============================================================================

/// Add a contact. The name is required; blanks become null.
pub fn add_contact(store: &impl RecordStore, mut contact: Contact) -> Result<Contact> {
    contact.name = contact.name.trim().to_string();
    if contact.name.is_empty() {
        return Err(anyhow::anyhow!("Contact name is required"));
    }
    normalise_contact(&mut contact);
    contact.id = store.insert(Table::Contacts, to_record(&contact)?)?;
    Ok(contact)
}

fn normalise_contact(contact: &mut Contact) {
    contact.title = clean(contact.title.as_deref());
    contact.fund = clean(contact.fund.as_deref());
    contact.stage = clean(contact.stage.as_deref());
    contact.how_met = clean(contact.how_met.as_deref());
    contact.last_contact = clean(contact.last_contact.as_deref());
    contact.notes = clean(contact.notes.as_deref());
}

pub fn get_contact(store: &impl RecordStore, id: &str) -> Result<Option<Contact>> {
    let mut found: Vec<Contact> = decode(store.query(Table::Contacts, &Filter::new().eq("id", id), None)?)?;
    Ok(found.pop())
}

/// Save an edited contact over the stored one. Same rules as `add_contact`.
pub fn update_contact(store: &impl RecordStore, mut contact: Contact) -> Result<Contact> {
    contact.name = contact.name.trim().to_string();
    if contact.name.is_empty() {
        return Err(anyhow::anyhow!("Contact name is required"));
    }
    normalise_contact(&mut contact);
    store.update(Table::Contacts, &contact.id, to_record(&contact)?)?;
    Ok(contact)
}

pub fn set_contact_status(store: &impl RecordStore, id: &str, status: ContactStatus) -> Result<()> {
    store.update(Table::Contacts, id, json!({ "status": status }))
}

pub fn delete_contact(store: &impl RecordStore, id: &str) -> Result<()> {
    store.delete(Table::Contacts, id)
}

/// Turn a field note from an event into a contact to reach
pub fn add_field_note(store: &impl RecordStore, event: &Event, note: FieldNote) -> Result<Contact> {
    let met_on = event
        .date
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "unknown date".to_string());

    let mut parts = vec![
        format!("Met at {} on {}.", event.name, met_on),
        format!("Insight: {}.", clean(note.insight.as_deref()).unwrap_or_else(|| "—".to_string())),
        format!("Follow-up: {}.", clean(note.follow_up.as_deref()).unwrap_or_else(|| "—".to_string())),
    ];
    if let Some(notes) = clean(note.notes.as_deref()) {
        parts.push(format!("Notes: {}", notes));
    }

    let contact = Contact {
        id: String::new(),
        name: clean(note.name.as_deref()).unwrap_or_else(|| "Unknown".to_string()),
        title: clean(note.title.as_deref()),
        fund: clean(note.fund.as_deref()),
        contact_type: ContactType::MetAtEvent,
        stage: None,
        how_met: Some(event.name.clone()),
        last_contact: None,
        status: ContactStatus::ToReach,
        priority: Priority::default(),
        notes: Some(parts.join(" ")),
    };

    add_contact(store, contact)
}

/// Contacts, newest first
pub fn list_contacts(store: &impl RecordStore) -> Result<Vec<Contact>> {
    decode(store.query(Table::Contacts, &Filter::new(), Some(&Order::desc("created_at")))?)
}

pub fn contact_stats(contacts: &[Contact]) -> ContactStats {
    let count = |pred: &dyn Fn(&ContactStatus) -> bool| {
        contacts.iter().filter(|c| pred(&c.status)).count()
    };

    let active = count(&|s| matches!(s, ContactStatus::Replied | ContactStatus::Meeting));
    let contacted = count(&|s| {
        matches!(
            s,
            ContactStatus::ReachedOut
                | ContactStatus::Replied
                | ContactStatus::Meeting
                | ContactStatus::FollowingUp
        )
    });

    let response_rate = if contacted == 0 {
        0
    } else {
        ((active as f64 / contacted as f64) * 100.0).round() as u32
    };

    ContactStats {
        total: contacts.len(),
        active_conversations: active,
        meetings: count(&|s| *s == ContactStatus::Meeting),
        response_rate,
    }
}

// ============================================================================
// Intel
// ============================================================================

pub fn add_intel(store: &impl RecordStore, mut note: IntelNote) -> Result<IntelNote> {
    note.title = note.title.trim().to_string();
    if note.title.is_empty() {
        return Err(anyhow::anyhow!("Intel title is required"));
    }
    note.id = store.insert(Table::Intel, to_record(&note)?)?;
    Ok(note)
}

/// Intel notes, newest first
pub fn list_intel(store: &impl RecordStore) -> Result<Vec<IntelNote>> {
    decode(store.query(Table::Intel, &Filter::new(), Some(&Order::desc("created_at")))?)
}

pub fn get_intel(store: &impl RecordStore, id: &str) -> Result<Option<IntelNote>> {
    let mut found: Vec<IntelNote> = decode(store.query(Table::Intel, &Filter::new().eq("id", id), None)?)?;
    Ok(found.pop())
}

/// Save an edited note over the stored one
pub fn update_intel(store: &impl RecordStore, mut note: IntelNote) -> Result<IntelNote> {
    note.title = note.title.trim().to_string();
    if note.title.is_empty() {
        return Err(anyhow::anyhow!("Intel title is required"));
    }
    store.update(Table::Intel, &note.id, to_record(&note)?)?;
    Ok(note)
}

pub fn delete_intel(store: &impl RecordStore, id: &str) -> Result<()> {
    store.delete(Table::Intel, id)
}

/// Notes in `category` (all when `None`) whose title or summary contains
/// `search`, case-insensitively
pub fn search_intel(notes: &[IntelNote], category: Option<IntelCategory>, search: &str) -> Vec<IntelNote> {
    let needle = search.trim().to_lowercase();
    notes
        .iter()
        .filter(|n| category.map_or(true, |c| n.category == c))
        .filter(|n| {
            needle.is_empty()
                || n.title.to_lowercase().contains(&needle)
                || n.summary.as_deref().unwrap_or_default().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Note count per category, in display order, zeros included
pub fn intel_counts(notes: &[IntelNote]) -> Vec<(IntelCategory, usize)> {
    IntelCategory::ALL
        .into_iter()
        .map(|c| (c, notes.iter().filter(|n| n.category == c).count()))
        .collect()
}
