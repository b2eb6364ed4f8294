use crate::error::{SessionError, StoreError, SvgError};
use crate::model::{LayerMap, ProgressRecord, RegionId, SvgImage};
use crate::store::ProgressStore;
use crate::svg::apply::apply;
use crate::svg::identify::identify;
use std::time::{Duration, Instant};

/// Color selected before the user touches any palette.
pub const DEFAULT_COLOR: &str = "#90EE90";

/// Cadence of the periodic progress flush.
pub const FLUSH_INTERVAL: Duration = Duration::from_secs(3);

/// In-memory coordinator for one user's coloring session.
///
/// Two states: no image selected, or an image loaded together with its
/// identified markup, the user's progress record, and the undo stack.
/// Persistence goes through the [`ProgressStore`] seam; every store
/// failure degrades to local-only state rather than blocking interaction.
pub struct EditSession {
    user_id: String,
    current_color: String,
    store: Box<dyn ProgressStore>,
    flush_interval: Duration,
    last_flush: Option<Instant>,
    state: State,
}

enum State {
    NoImage,
    Loaded(Loaded),
}

struct Loaded {
    image: SvgImage,
    /// identify() output, computed once per selection and reused by every
    /// re-render.
    identified: String,
    record: ProgressRecord,
    /// Region ids in fill order, most recent last. Not persisted.
    undo_stack: Vec<RegionId>,
}

impl EditSession {
    pub fn new(user_id: impl Into<String>, store: Box<dyn ProgressStore>) -> Self {
        EditSession {
            user_id: user_id.into(),
            current_color: DEFAULT_COLOR.to_string(),
            store,
            flush_interval: FLUSH_INTERVAL,
            last_flush: None,
            state: State::NoImage,
        }
    }

    /// Override the flush cadence (tests use tiny intervals).
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    pub fn current_color(&self) -> &str {
        &self.current_color
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.current_color = color.into();
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded(_))
    }

    pub fn image(&self) -> Option<&SvgImage> {
        match &self.state {
            State::Loaded(l) => Some(&l.image),
            State::NoImage => None,
        }
    }

    pub fn layers(&self) -> Option<&LayerMap> {
        match &self.state {
            State::Loaded(l) => Some(&l.record.layers),
            State::NoImage => None,
        }
    }

    pub fn record_id(&self) -> Option<&str> {
        match &self.state {
            State::Loaded(l) => l.record.id.as_deref(),
            State::NoImage => None,
        }
    }

    pub fn undo_depth(&self) -> usize {
        match &self.state {
            State::Loaded(l) => l.undo_stack.len(),
            State::NoImage => 0,
        }
    }

    /// Switch to `image`: identify its regions, then pull the user's saved
    /// progress. A missing record or an unreachable store both fall back to
    /// a fresh empty record; only malformed markup is an error, and it
    /// leaves the previous state untouched so the caller keeps the raw
    /// image text.
    pub fn select_image(&mut self, image: SvgImage) -> Result<(), SvgError> {
        let identified = identify(&image.svg_content)?;
        let record = match self.store.fetch(&self.user_id, &image.id) {
            Ok(record) => record,
            Err(StoreError::NotFound) => ProgressRecord::empty(&self.user_id, &image.id),
            Err(err) => {
                log::warn!("progress fetch failed for image {}: {err}", image.id);
                ProgressRecord::empty(&self.user_id, &image.id)
            }
        };
        self.state = State::Loaded(Loaded {
            image,
            identified,
            record,
            undo_stack: Vec::new(),
        });
        Ok(())
    }

    /// Fill one region with an explicit color. Last write wins; the region
    /// id is pushed onto the undo stack even when it overwrites.
    pub fn fill_region(
        &mut self,
        region: impl Into<RegionId>,
        color: impl Into<String>,
    ) -> Result<(), SessionError> {
        let loaded = self.loaded_mut()?;
        let region = region.into();
        loaded.record.layers.insert(region.clone(), color.into());
        loaded.undo_stack.push(region);
        Ok(())
    }

    /// Click-to-fill with the currently selected color.
    pub fn fill(&mut self, region: impl Into<RegionId>) -> Result<(), SessionError> {
        let color = self.current_color.clone();
        self.fill_region(region, color)
    }

    /// Revert the most recent fill by removing its key outright. This is
    /// remove-not-revert: undoing a re-colored region exposes the blank
    /// state, not the earlier color. Returns the region that was cleared,
    /// or `None` when the stack is empty.
    pub fn undo(&mut self) -> Result<Option<RegionId>, SessionError> {
        let loaded = self.loaded_mut()?;
        let Some(region) = loaded.undo_stack.pop() else {
            return Ok(None);
        };
        loaded.record.layers.remove(&region);
        Ok(Some(region))
    }

    /// Wipe every fill, locally first and then best-effort in the store.
    /// The local reset always holds; deletion failures are logged and the
    /// stale records simply outlive this session.
    pub fn clear_all(&mut self) -> Result<(), SessionError> {
        let user_id = self.user_id.clone();
        let loaded = self.loaded_mut()?;
        let svg_id = loaded.record.svg_id.clone();
        loaded.record = ProgressRecord::empty(&user_id, &svg_id);
        loaded.undo_stack.clear();
        match self.store.list(&user_id, Some(&svg_id)) {
            Ok(records) => {
                for record in records {
                    if let Some(id) = record.id.as_deref() {
                        if let Err(err) = self.store.delete(id) {
                            log::warn!("failed to delete progress record {id}: {err}");
                        }
                    }
                }
            }
            Err(err) => log::warn!("failed to list progress for clear-all: {err}"),
        }
        Ok(())
    }

    /// Upsert the current layer map: create when no record id exists yet
    /// (remembering the assigned id), otherwise update in place. A no-op
    /// when there is nothing to persist (empty map, no record). Store
    /// failures are logged and retried on the next tick, never surfaced.
    /// Returns whether a write reached the store.
    pub fn flush(&mut self) -> Result<bool, SessionError> {
        let loaded = match &mut self.state {
            State::Loaded(l) => l,
            State::NoImage => return Err(SessionError::NoImage),
        };
        if loaded.record.layers.is_empty() && loaded.record.id.is_none() {
            return Ok(false);
        }
        let snapshot = loaded.record.clone();
        match snapshot.id {
            None => match self.store.create(&snapshot) {
                Ok(id) => {
                    log::debug!("progress created as {id}");
                    loaded.record.id = Some(id);
                    Ok(true)
                }
                Err(err) => {
                    log::warn!("progress create failed: {err}");
                    Ok(false)
                }
            },
            Some(_) => match self.store.update(&snapshot) {
                Ok(()) => Ok(true),
                Err(err) => {
                    log::warn!("progress update failed: {err}");
                    Ok(false)
                }
            },
        }
    }

    /// Interval gate for the periodic flush: flushes when the configured
    /// interval has elapsed since the last attempt. Failed attempts also
    /// arm the timer, so retries wait for the next tick instead of spinning.
    pub fn maybe_flush(&mut self, now: Instant) -> Result<bool, SessionError> {
        if !self.is_loaded() {
            return Ok(false);
        }
        let due = self
            .last_flush
            .map_or(true, |at| now.duration_since(at) >= self.flush_interval);
        if !due {
            return Ok(false);
        }
        self.last_flush = Some(now);
        self.flush()
    }

    /// The identified image with all current fills applied.
    pub fn rendered_svg(&self) -> Result<String, SessionError> {
        let loaded = self.loaded()?;
        Ok(apply(&loaded.identified, &loaded.record.layers)?)
    }

    /// Replace the whole layer map (host-driven restore). Resets the undo
    /// stack: restored fills have no session-local ordering to revert.
    pub fn set_layers(&mut self, layers: LayerMap) -> Result<(), SessionError> {
        let loaded = self.loaded_mut()?;
        loaded.record.layers = layers;
        loaded.undo_stack.clear();
        Ok(())
    }

    fn loaded(&self) -> Result<&Loaded, SessionError> {
        match &self.state {
            State::Loaded(l) => Ok(l),
            State::NoImage => Err(SessionError::NoImage),
        }
    }

    fn loaded_mut(&mut self) -> Result<&mut Loaded, SessionError> {
        match &mut self.state {
            State::Loaded(l) => Ok(l),
            State::NoImage => Err(SessionError::NoImage),
        }
    }
}
