use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    game::{
        error::Result,
        events::PuzzleEvent,
        matcher::WordMatcher,
        parser::LevelParser,
        reveal::RevealPacing,
    },
    models::{Level, PlacedWord},
};

/// Knobs a session is built with.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub strict_directions: bool,
    pub pacing: RevealPacing,
    pub event_capacity: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            strict_directions: true,
            pacing: RevealPacing::Yield,
            event_capacity: 256,
        }
    }
}

/// A session that has not loaded its level yet. Subscribe here to catch `GridReady`.
pub struct SessionBuilder {
    settings: SessionSettings,
    events: broadcast::Sender<PuzzleEvent>,
}

impl SessionBuilder {
    pub fn new(settings: SessionSettings) -> Self {
        let (events, _) = broadcast::channel(settings.event_capacity.max(1));
        Self { settings, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PuzzleEvent> {
        self.events.subscribe()
    }

    /// Parse the level and announce it. Consumes the builder, so `GridReady` fires once.
    pub fn load(self, text: &str) -> Result<PuzzleSession> {
        let level = Arc::new(LevelParser::new(self.settings.strict_directions).parse(text)?);
        let id = Uuid::new_v4();
        tracing::info!(
            "Session {} loaded a level with {} words",
            id,
            level.words().len()
        );

        let _ = self.events.send(PuzzleEvent::GridReady {
            level: level.snapshot(),
        });

        let matcher = WordMatcher::new(
            Arc::clone(&level),
            self.events.clone(),
            self.settings.pacing,
        );
        Ok(PuzzleSession {
            id,
            level,
            events: self.events,
            matcher,
        })
    }
}

/// One player's run through one level.
///
/// Dropping the session aborts any reveals still in flight.
pub struct PuzzleSession {
    id: Uuid,
    level: Arc<Level>,
    events: broadcast::Sender<PuzzleEvent>,
    matcher: WordMatcher,
}

impl PuzzleSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Shared handle to the level, for consumers that outlive a borrow of the session.
    pub fn level_handle(&self) -> Arc<Level> {
        Arc::clone(&self.level)
    }

    /// Late subscribers miss `GridReady`; read `level().snapshot()` instead.
    pub fn subscribe(&self) -> broadcast::Receiver<PuzzleEvent> {
        self.events.subscribe()
    }

    pub fn try_match(&mut self, candidate: &str) -> Option<PlacedWord> {
        self.matcher.try_match(candidate)
    }

    pub fn reveals_in_flight(&mut self) -> usize {
        self.matcher.in_flight()
    }

    pub async fn wait_idle(&mut self) {
        self.matcher.wait_idle().await;
    }

    /// Count of placed words whose cells are all revealed.
    pub fn revealed_word_count(&self) -> usize {
        self.level
            .words()
            .iter()
            .filter(|placed| self.level.is_word_revealed(placed))
            .count()
    }

    /// End the session, abandoning any reveal still running.
    pub fn end(mut self) {
        let in_flight = self.matcher.in_flight();
        self.matcher.cancel_all();
        tracing::info!(
            "Session {} ended ({} of {} words revealed, {} reveals abandoned)",
            self.id,
            self.revealed_word_count(),
            self.level.words().len(),
            in_flight
        );
    }
}
