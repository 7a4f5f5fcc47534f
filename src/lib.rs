//! Terrain - event intelligence for venture scouting
//!
//! Tracks contacts, events and intel notes, and turns "I'm going to this event"
//! into a short brief of what to say and ask there.
//!
//! The brief fuses two sources:
//!
//! - **Host knowledge base**: curated intel on the funds and communities that
//!   convene events (angle, hook, ice breaker, questions, posture)
//! - **Precognition signal**: live founder clusters and momentum breaks fetched
//!   from the analytics backend
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use terrain_brief::{BriefConfig, BriefEngine, HttpSignalSource};
//!
//! let config = BriefConfig::from_env();
//! let engine = BriefEngine::new(HttpSignalSource::new(&config.api_url), config);
//!
//! for point in engine.generate_brief("Pre-seed mixer", Some("Hustle Fund")).await {
//!     println!("{point}");
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐  name + host  ┌─────────────────┐
//! │ TerrainSession │──────────────►│   BriefEngine   │
//! │ (brief cache)  │               │  join! 3 feeds  │
//! └───────┬────────┘               └───┬─────────┬───┘
//!         │ insert/update/query        │         │
//!         ▼                            ▼         ▼
//! ┌────────────────┐            ┌──────────┐ ┌──────────────┐
//! │  SqliteStore   │            │ hosts KB │ │ Precognition │
//! └────────────────┘            └──────────┘ └──────────────┘
//! ```

pub mod brief;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod hosts;
pub mod pipeline;
pub mod session;
pub mod signals;
pub mod store;
pub mod types;

// Core types
pub use types::*;

// Brief generation
pub use brief::{BriefEngine, BriefReport, BriefSignals, DATA_UNAVAILABLE};
pub use config::{BriefConfig, FetchPolicy};
pub use domain::{classify, Domain};
pub use hosts::{resolve_host, HostProfile, DEFAULT_POSTURE, DEFAULT_QUESTIONS};
pub use signals::{HttpSignalSource, SignalSource};

// Pipeline storage
pub use calendar::gcal_url;
pub use pipeline::EventFilter;
pub use session::TerrainSession;
pub use store::{init_db, Filter, Order, RecordStore, SqliteStore, Table};
