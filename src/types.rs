//! Core types for Terrain
//!
//! Two families live here:
//! - Live signal payloads from the Precognition backend (themes, inflections)
//! - Pipeline records kept in the local store (contacts, events, intel notes)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A cluster of founders independently building in a detected area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default = "default_sector", deserialize_with = "sector_or_other")]
    pub sector: String,
    #[serde(default, deserialize_with = "whole_count")]
    pub builder_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emergence_score: f64,
}

fn default_sector() -> String {
    OTHER_SECTOR.to_string()
}

/// Sector bucket excluded from sector heat
pub const OTHER_SECTOR: &str = "Other";

/// A single founder crossing a momentum threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflectionEvent {
    #[serde(default)]
    pub founder_name: Option<String>,
    #[serde(default)]
    pub founder_handle: Option<String>,
    #[serde(default)]
    pub signal: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_type: String,
}

// Live payloads are loosely typed: null stands in for a missing field.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn sector_or_other<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_sector))
}

/// Any JSON number, floored and clamped into `u32`
fn whole_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    if value.is_nan() || value <= 0.0 {
        return Ok(0);
    }
    // `as` saturates at u32::MAX
    Ok(value.floor() as u32)
}

/// Body of `/api/emergence`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergenceFeed {
    #[serde(default, deserialize_with = "null_as_default")]
    pub inflection_founders: Vec<InflectionEvent>,
    #[serde(default)]
    pub new_themes: Option<Vec<serde_json::Value>>,
}

/// Aggregated sector activity derived from themes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorHeat {
    pub sector: String,
    pub founders: u32,
    pub clusters: u32,
}

/// Ordered talking points for one event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    pub event_name: String,
    pub host: Option<String>,
    pub points: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Brief {
    pub fn new(event_name: &str, host: Option<&str>, points: Vec<String>) -> Self {
        Self {
            event_name: event_name.to_string(),
            host: host.map(|h| h.to_string()),
            points,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Pipeline records
// ============================================================================

/// Where a contact sits in the outreach pipeline
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContactStatus {
    #[default]
    #[serde(rename = "To reach")]
    ToReach,
    #[serde(rename = "Reached out")]
    ReachedOut,
    Replied,
    Meeting,
    #[serde(rename = "Following up")]
    FollowingUp,
    Pass,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 6] = [
        ContactStatus::ToReach,
        ContactStatus::ReachedOut,
        ContactStatus::Replied,
        ContactStatus::Meeting,
        ContactStatus::FollowingUp,
        ContactStatus::Pass,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContactStatus::ToReach => "To reach",
            ContactStatus::ReachedOut => "Reached out",
            ContactStatus::Replied => "Replied",
            ContactStatus::Meeting => "Meeting",
            ContactStatus::FollowingUp => "Following up",
            ContactStatus::Pass => "Pass",
        }
    }

    /// Accepts display names and dashed forms ("reached-out")
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().replace('-', " ").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.name().to_lowercase() == wanted)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContactType {
    #[default]
    Investor,
    Founder,
    Operator,
    #[serde(rename = "Met at event")]
    MetAtEvent,
    Intro,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Med,
    Low,
}

/// A person in the network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fund: Option<String>,
    #[serde(rename = "type", default)]
    pub contact_type: ContactType,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub how_met: Option<String>,
    #[serde(default)]
    pub last_contact: Option<String>,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: Option<String>,
}

/// RSVP state of an event
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventStatus {
    Going,
    #[default]
    Maybe,
    Pass,
}

impl EventStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "going" => Some(EventStatus::Going),
            "maybe" => Some(EventStatus::Maybe),
            "pass" => Some(EventStatus::Pass),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventStatus::Going => "Going",
            EventStatus::Maybe => "Maybe",
            EventStatus::Pass => "Pass",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    #[default]
    Conference,
    Dinner,
    #[serde(rename = "Demo Day")]
    DemoDay,
    Community,
    #[serde(rename = "Happy Hour")]
    HappyHour,
    Other,
}

impl EventType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "conference" => Some(EventType::Conference),
            "dinner" => Some(EventType::Dinner),
            "demo day" | "demo-day" => Some(EventType::DemoDay),
            "community" => Some(EventType::Community),
            "happy hour" | "happy-hour" => Some(EventType::HappyHour),
            "other" => Some(EventType::Other),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventType::Conference => "Conference",
            EventType::Dinner => "Dinner",
            EventType::DemoDay => "Demo Day",
            EventType::Community => "Community",
            EventType::HappyHour => "Happy Hour",
            EventType::Other => "Other",
        }
    }
}

/// An event on the terrain calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntelCategory {
    #[serde(rename = "AI Infra")]
    AiInfra,
    Consumer,
    Fintech,
    #[serde(rename = "VC Mechanics")]
    VcMechanics,
    Product,
    #[default]
    General,
}

impl IntelCategory {
    pub const ALL: [IntelCategory; 6] = [
        IntelCategory::AiInfra,
        IntelCategory::Consumer,
        IntelCategory::Fintech,
        IntelCategory::VcMechanics,
        IntelCategory::Product,
        IntelCategory::General,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IntelCategory::AiInfra => "AI Infra",
            IntelCategory::Consumer => "Consumer",
            IntelCategory::Fintech => "Fintech",
            IntelCategory::VcMechanics => "VC Mechanics",
            IntelCategory::Product => "Product",
            IntelCategory::General => "General",
        }
    }

    /// Accepts display names and dashed forms ("ai-infra")
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().replace('-', " ").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.name().to_lowercase() == wanted)
    }
}

/// A saved piece of market intelligence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntelNote {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: IntelCategory,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}
