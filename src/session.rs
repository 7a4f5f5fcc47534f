//! Terrain session: the event view with its in-memory brief cache
//!
//! Briefs are generated when an event is marked Going (or on request) and
//! kept only for the life of the session. Nothing is persisted.
//!
//! ```rust,ignore
//! let session = TerrainSession::new(store, BriefEngine::new(source, config));
//! if let Some(points) = session.set_event_status(&id, EventStatus::Going).await? {
//!     for point in points { println!("{point}"); }
//! }
//! ```

use crate::brief::BriefEngine;
use crate::pipeline;
use crate::signals::SignalSource;
use crate::store::RecordStore;
use crate::types::{Event, EventStatus};
use anyhow::Result;
use std::collections::HashMap;

pub struct TerrainSession<'a, S, R> {
    store: R,
    engine: BriefEngine<'a, S>,
    briefs: HashMap<String, Vec<String>>,
}

impl<'a, S: SignalSource, R: RecordStore> TerrainSession<'a, S, R> {
    pub fn new(store: R, engine: BriefEngine<'a, S>) -> Self {
        Self {
            store,
            engine,
            briefs: HashMap::new(),
        }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn engine(&self) -> &BriefEngine<'a, S> {
        &self.engine
    }

    /// Cached brief for an event, if one was generated this session
    pub fn cached_brief(&self, event_id: &str) -> Option<&[String]> {
        self.briefs.get(event_id).map(Vec::as_slice)
    }

    /// Update an event's status. Going triggers a brief when none is cached.
    /// Returns the event's cached brief, if any.
    pub async fn set_event_status(
        &mut self,
        event_id: &str,
        status: EventStatus,
    ) -> Result<Option<Vec<String>>> {
        pipeline::set_event_status(&self.store, event_id, status)?;

        if status == EventStatus::Going && !self.briefs.contains_key(event_id) {
            let event = self.require_event(event_id)?;
            self.generate_and_cache(&event).await;
        }

        Ok(self.briefs.get(event_id).cloned())
    }

    /// Explicit brief request. Reuses a cached brief.
    pub async fn brief_for(&mut self, event_id: &str) -> Result<Vec<String>> {
        if let Some(points) = self.briefs.get(event_id) {
            return Ok(points.clone());
        }
        let event = self.require_event(event_id)?;
        Ok(self.generate_and_cache(&event).await)
    }

    /// Drop a cached brief so the next request regenerates it
    pub fn forget_brief(&mut self, event_id: &str) {
        self.briefs.remove(event_id);
    }

    fn require_event(&self, event_id: &str) -> Result<Event> {
        pipeline::get_event(&self.store, event_id)?
            .ok_or_else(|| anyhow::anyhow!("No event with id {}", event_id))
    }

    async fn generate_and_cache(&mut self, event: &Event) -> Vec<String> {
        let points = self
            .engine
            .generate_brief(&event.name, event.host.as_deref())
            .await;
        self.briefs.insert(event.id.clone(), points.clone());
        points
    }
}
