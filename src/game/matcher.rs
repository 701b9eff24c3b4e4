use std::sync::Arc;

use tokio::{sync::broadcast, task::JoinSet};

use crate::{
    game::{
        events::PuzzleEvent,
        parser::normalize_word,
        reveal::{RevealPacing, RevealSequence},
    },
    models::{Level, PlacedWord},
};

/// Matches player submissions against a level's placed words and starts their reveals.
pub struct WordMatcher {
    level: Arc<Level>,
    events: broadcast::Sender<PuzzleEvent>,
    pacing: RevealPacing,
    reveals: JoinSet<()>,
    next_reveal_id: u64,
}

impl WordMatcher {
    pub fn new(
        level: Arc<Level>,
        events: broadcast::Sender<PuzzleEvent>,
        pacing: RevealPacing,
    ) -> Self {
        Self {
            level,
            events,
            pacing,
            reveals: JoinSet::new(),
            next_reveal_id: 1,
        }
    }

    /// First placed word, in file order, equal to the normalized candidate.
    pub fn find(&self, candidate: &str) -> Option<&PlacedWord> {
        let candidate = normalize_word(candidate);
        self.level.words().iter().find(|placed| placed.word == candidate)
    }

    /// Look the candidate up and, on a hit, start revealing it in the background.
    ///
    /// Returns as soon as the reveal is scheduled. Must be called inside a tokio runtime.
    /// Already matched words are accepted again; their cells simply stay revealed.
    pub fn try_match(&mut self, candidate: &str) -> Option<PlacedWord> {
        let Some(placed) = self.find(candidate).cloned() else {
            tracing::debug!("No placed word matches `{}`", candidate);
            return None;
        };

        let reveal_id = self.next_reveal_id;
        self.next_reveal_id += 1;
        tracing::info!(
            "Matched `{}` at {} going {:?}, starting reveal {}",
            placed.word,
            placed.anchor,
            placed.direction,
            reveal_id
        );

        let sequence = RevealSequence::new(reveal_id, placed.clone());
        let level = Arc::clone(&self.level);
        let events = self.events.clone();
        let mut ticker = self.pacing.ticker();
        self.reveals.spawn(async move {
            sequence.run(&level, ticker.as_mut(), &events).await;
        });

        Some(placed)
    }

    /// Number of reveal sequences still running.
    pub fn in_flight(&mut self) -> usize {
        while self.reveals.try_join_next().is_some() {}
        self.reveals.len()
    }

    /// Wait until every started reveal has finished.
    pub async fn wait_idle(&mut self) {
        while let Some(result) = self.reveals.join_next().await {
            if let Err(e) = result {
                tracing::error!("Reveal task failed: {}", e);
            }
        }
    }

    /// Abort all running reveals. Cells they already flipped stay revealed.
    pub fn cancel_all(&mut self) {
        self.reveals.abort_all();
    }
}
