//! Session engine: rounds, click attribution, and session completion.
use crate::catalog::{Catalog, Item};
use crate::config::{ConfigError, SessionConfig};
use crate::results::Aggregates;
use crate::sampler::{Round, SampleError, sample, seeded_rng};
use crate::state::SessionState;
use crate::storage::BlobStore;
use crate::tally::{SnapshotOrigin, TallyError, TallyStore};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

/// Rendering side of the engine. Receives plain data only.
pub trait Presenter {
    /// A new round is ready to show. The engine then waits for a click.
    fn on_items_presented(&mut self, items: &[Item]);

    /// The session cycle finished; render the results.
    fn on_session_completed(&mut self, aggregates: &Aggregates);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn on_items_presented(&mut self, items: &[Item]) {
        (**self).on_items_presented(items);
    }

    fn on_session_completed(&mut self, aggregates: &Aggregates) {
        (**self).on_session_completed(aggregates);
    }
}

/// Presenter that renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn on_items_presented(&mut self, _items: &[Item]) {}

    fn on_session_completed(&mut self, _aggregates: &Aggregates) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingBootstrap,
    RoundActive,
    Completed,
}

/// Result of feeding one click event into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The target is not part of the active round, or the session is over.
    Ignored,
    /// The click was attributed and a new round is on screen.
    NextRound { remaining: u32 },
    /// The click was attributed and ended the session cycle.
    Completed(Aggregates),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid session config: {0}")]
    Config(#[from] ConfigError),
    #[error("round draw failed: {0}")]
    Sample(#[from] SampleError),
    #[error("tally update failed: {0}")]
    Tally(#[from] TallyError),
}

/// Owns the tally store, sampler stream and presenter for one session.
#[derive(Debug)]
pub struct SessionEngine<S, P> {
    config: SessionConfig,
    presentation_size: usize,
    tally: TallyStore<S>,
    presenter: P,
    rng: ChaCha20Rng,
    phase: SessionPhase,
    round: Round,
    rounds_completed: u32,
    origin: SnapshotOrigin,
    write_error: Option<TallyError>,
}

impl<S: BlobStore, P: Presenter> SessionEngine<S, P> {
    /// Hydrate from storage (or seed the stock catalog) and present the first round.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the fallback catalog is too
    /// small. Failed writes do not fail the bootstrap; the first one is kept
    /// for [`SessionEngine::take_write_error`] and voting continues in memory.
    pub fn bootstrap(
        config: SessionConfig,
        storage: S,
        presenter: P,
        seed: u64,
    ) -> Result<Self, EngineError> {
        Self::bootstrap_with_catalog(config, storage, presenter, seed, Catalog::default_products)
    }

    /// Like [`SessionEngine::bootstrap`] with a custom catalog for first runs.
    ///
    /// # Errors
    ///
    /// See [`SessionEngine::bootstrap`].
    pub fn bootstrap_with_catalog(
        config: SessionConfig,
        storage: S,
        presenter: P,
        seed: u64,
        fallback: impl FnOnce() -> Catalog,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let (tally, origin) = TallyStore::hydrate(storage, config.storage_key.clone(), fallback);
        let presentation_size = config.effective_presentation_size(tally.state().items.len())?;
        log::info!(
            "bootstrapped {} items ({origin:?}), {} per round, resuming at {}/{} clicks",
            tally.state().items.len(),
            presentation_size,
            tally.state().total_clicks,
            config.max_clicks
        );

        let mut engine = Self {
            config,
            presentation_size,
            tally,
            presenter,
            rng: seeded_rng(seed),
            phase: SessionPhase::AwaitingBootstrap,
            round: Round::new(),
            rounds_completed: 0,
            origin,
            write_error: None,
        };

        let mut pending = None;
        if engine.tally.state().total_clicks >= engine.config.max_clicks {
            log::info!("stored click counter already at the limit; starting a new cycle");
            keep_first(&mut pending, engine.tally.reset_session_counter());
        }
        engine.start_round(&mut pending)?;
        if let Some(err) = &pending {
            log::warn!("snapshot writes are failing; continuing in memory: {err}");
        }
        engine.write_error = pending;
        Ok(engine)
    }

    /// Feed a click on the element identified by `target` into the engine.
    ///
    /// Clicks on anything outside the active round are ignored. When a write
    /// fails the transition still completes in memory and the error is
    /// returned; the next successful write carries the full state.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails or a new round cannot be drawn.
    /// A failed draw keeps the current round on screen; a write error that
    /// occurred alongside it is kept for [`SessionEngine::take_write_error`].
    pub fn handle_click(&mut self, target: &str) -> Result<ClickOutcome, EngineError> {
        if self.phase != SessionPhase::RoundActive {
            log::debug!("click on '{target}' ignored: session is {:?}", self.phase);
            return Ok(ClickOutcome::Ignored);
        }
        let Some(index) = self
            .round
            .iter()
            .copied()
            .find(|idx| self.tally.state().items.get(*idx).is_some_and(|item| item.id() == target))
        else {
            log::debug!("click on '{target}' ignored: not in the current round");
            return Ok(ClickOutcome::Ignored);
        };

        let mut pending = None;
        keep_first(&mut pending, self.tally.record_click_at(index));
        self.rounds_completed = self.rounds_completed.saturating_add(1);

        let outcome = if self.tally.state().total_clicks < self.config.max_clicks {
            if let Err(err) = self.start_round(&mut pending) {
                self.write_error = self.write_error.take().or(pending);
                return Err(err);
            }
            ClickOutcome::NextRound {
                remaining: self.clicks_remaining(),
            }
        } else {
            ClickOutcome::Completed(self.complete(&mut pending))
        };
        pending.map_or(Ok(outcome), |err| Err(err.into()))
    }

    /// Begin a new session cycle after completion without reloading.
    /// Returns `false` when the session is still running.
    ///
    /// # Errors
    ///
    /// Returns an error if the first round cannot be drawn or persisted.
    pub fn restart(&mut self) -> Result<bool, EngineError> {
        if self.phase != SessionPhase::Completed {
            return Ok(false);
        }
        self.round.clear();
        self.rounds_completed = 0;
        let mut pending = None;
        self.start_round(&mut pending)?;
        pending.map_or(Ok(true), |err| Err(err.into()))
    }

    fn start_round(&mut self, pending: &mut Option<TallyError>) -> Result<(), EngineError> {
        let round = sample(
            &mut self.rng,
            self.presentation_size,
            self.tally.state().items.len(),
            &self.round,
        )?;
        for &index in &round {
            keep_first(pending, self.tally.record_shown_at(index));
        }
        log::debug!("round {} presents {:?}", self.rounds_completed + 1, round.as_slice());
        self.round = round;
        self.phase = SessionPhase::RoundActive;
        let items: Vec<Item> = self.current_round().into_iter().cloned().collect();
        self.presenter.on_items_presented(&items);
        Ok(())
    }

    fn complete(&mut self, pending: &mut Option<TallyError>) -> Aggregates {
        self.phase = SessionPhase::Completed;
        self.round.clear();
        let aggregates = Aggregates::from_state(self.tally.state());
        log::info!(
            "session complete after {} rounds ({} items tallied)",
            self.rounds_completed,
            aggregates.len()
        );
        self.presenter.on_session_completed(&aggregates);
        keep_first(pending, self.tally.reset_session_counter());
        aggregates
    }
}

impl<S, P> SessionEngine<S, P> {
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Items of the active round in presentation order; empty once completed.
    #[must_use]
    pub fn current_round(&self) -> Vec<&Item> {
        self.round
            .iter()
            .filter_map(|idx| self.tally.state().items.get(*idx))
            .collect()
    }

    #[must_use]
    pub fn current_indices(&self) -> &[usize] {
        &self.round
    }

    #[must_use]
    pub const fn presentation_size(&self) -> usize {
        self.presentation_size
    }

    #[must_use]
    pub const fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    #[must_use]
    pub const fn total_clicks(&self) -> u32 {
        self.tally.state().total_clicks
    }

    /// Attributed clicks still needed to finish the cycle.
    #[must_use]
    pub const fn clicks_remaining(&self) -> u32 {
        match self.phase {
            SessionPhase::Completed => 0,
            _ => self.config.max_clicks.saturating_sub(self.total_clicks()),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> SnapshotOrigin {
        self.origin
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        self.tally.state()
    }

    #[must_use]
    pub const fn tally(&self) -> &TallyStore<S> {
        &self.tally
    }

    /// Aggregates of the live snapshot (lifetime counters).
    #[must_use]
    pub fn aggregates(&self) -> Aggregates {
        Aggregates::from_state(self.tally.state())
    }

    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    pub const fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Write error that could not be returned to the caller, such as one
    /// raised while bootstrapping. Cleared by the call.
    pub fn take_write_error(&mut self) -> Option<TallyError> {
        self.write_error.take()
    }
}

fn keep_first(pending: &mut Option<TallyError>, result: Result<(), TallyError>) {
    if let Err(err) = result {
        log::warn!("tally write failed: {err}");
        pending.get_or_insert(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[derive(Debug, Default)]
    struct Recorder {
        rounds: Vec<Vec<String>>,
        completed: Vec<Aggregates>,
    }

    impl Presenter for Recorder {
        fn on_items_presented(&mut self, items: &[Item]) {
            self.rounds
                .push(items.iter().map(|item| item.name.clone()).collect());
        }

        fn on_session_completed(&mut self, aggregates: &Aggregates) {
            self.completed.push(aggregates.clone());
        }
    }

    fn engine(max_clicks: u32) -> SessionEngine<MemoryStore, Recorder> {
        let config = SessionConfig {
            max_clicks,
            ..SessionConfig::default()
        };
        SessionEngine::bootstrap(config, MemoryStore::new(), Recorder::default(), 99).unwrap()
    }

    fn first_shown(engine: &SessionEngine<MemoryStore, Recorder>) -> String {
        engine.current_round()[0].name.clone()
    }

    #[test]
    fn bootstrap_presents_first_round() {
        let engine = engine(25);
        assert_eq!(engine.phase(), SessionPhase::RoundActive);
        assert_eq!(engine.origin(), SnapshotOrigin::Seeded);
        assert_eq!(engine.presentation_size(), 4);
        assert_eq!(engine.presenter().rounds.len(), 1);
        assert_eq!(engine.presenter().rounds[0].len(), 4);
        assert_eq!(engine.state().total_item_views(), 4);
        assert_eq!(engine.clicks_remaining(), 25);
    }

    #[test]
    fn consecutive_rounds_are_disjoint() {
        let mut engine = engine(200);
        let mut previous: Vec<usize> = engine.current_indices().to_vec();
        for _ in 0..150 {
            let target = first_shown(&engine);
            engine.handle_click(&target).unwrap();
            let current = engine.current_indices().to_vec();
            assert!(current.iter().all(|idx| !previous.contains(idx)));
            previous = current;
        }
    }

    #[test]
    fn completes_exactly_at_max_clicks() {
        let mut engine = engine(3);
        for expected_remaining in [2, 1] {
            let target = first_shown(&engine);
            assert_eq!(
                engine.handle_click(&target).unwrap(),
                ClickOutcome::NextRound {
                    remaining: expected_remaining
                }
            );
        }
        let target = first_shown(&engine);
        let ClickOutcome::Completed(aggregates) = engine.handle_click(&target).unwrap() else {
            panic!("third click should complete the session");
        };
        assert_eq!(aggregates.clicks.iter().sum::<u32>(), 3);
        assert_eq!(engine.phase(), SessionPhase::Completed);
        assert_eq!(engine.total_clicks(), 0);
        assert_eq!(engine.clicks_remaining(), 0);
        assert!(engine.current_round().is_empty());
        assert_eq!(engine.presenter().completed.len(), 1);

        let before = engine.state().clone();
        assert_eq!(engine.handle_click(&target).unwrap(), ClickOutcome::Ignored);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn stale_or_unknown_targets_are_ignored() {
        let mut engine = engine(25);
        let stale = first_shown(&engine);
        engine.handle_click(&stale).unwrap();
        let before = engine.state().clone();
        assert_eq!(engine.handle_click(&stale).unwrap(), ClickOutcome::Ignored);
        assert_eq!(engine.handle_click("not-a-product").unwrap(), ClickOutcome::Ignored);
        assert_eq!(engine.handle_click("").unwrap(), ClickOutcome::Ignored);
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.rounds_completed(), 1);
    }

    #[test]
    fn click_only_increments_the_target() {
        let mut engine = engine(25);
        let shown: Vec<String> = engine.current_round().iter().map(|i| i.name.clone()).collect();
        let target = shown[1].clone();
        engine.handle_click(&target).unwrap();
        for name in &shown {
            let expected = u32::from(*name == target);
            assert_eq!(engine.state().item(name).unwrap().clicks, expected);
        }
    }

    #[test]
    fn restart_starts_a_fresh_cycle() {
        let mut engine = engine(1);
        assert!(!engine.restart().unwrap());
        let target = first_shown(&engine);
        assert!(matches!(
            engine.handle_click(&target).unwrap(),
            ClickOutcome::Completed(_)
        ));
        assert!(engine.restart().unwrap());
        assert_eq!(engine.phase(), SessionPhase::RoundActive);
        assert_eq!(engine.rounds_completed(), 0);
        assert_eq!(engine.clicks_remaining(), 1);
        assert_eq!(engine.state().total_item_clicks(), 1);
    }

    #[test]
    fn stored_counter_at_limit_starts_new_cycle() {
        let storage = MemoryStore::new();
        let mut state = SessionState::default();
        state.total_clicks = 30;
        storage
            .set(crate::config::DEFAULT_STORAGE_KEY, &state.to_json().unwrap())
            .unwrap();
        let engine =
            SessionEngine::bootstrap(SessionConfig::default(), storage, NullPresenter, 1).unwrap();
        assert_eq!(engine.origin(), SnapshotOrigin::Restored);
        assert_eq!(engine.total_clicks(), 0);
        assert_eq!(engine.clicks_remaining(), 25);
    }

    #[test]
    fn tiny_catalog_is_rejected_at_bootstrap() {
        let result = SessionEngine::bootstrap_with_catalog(
            SessionConfig::default(),
            MemoryStore::new(),
            NullPresenter,
            1,
            || Catalog::new(vec![Item::new("solo", "solo.jpg").unwrap()]).unwrap(),
        );
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::CatalogTooSmall { len: 1 }))
        ));
    }

    #[test]
    fn failed_draw_keeps_the_current_round() {
        let mut engine = engine(25);
        engine.presentation_size = 16;
        let shown = engine.current_indices().to_vec();
        let target = first_shown(&engine);

        let err = engine.handle_click(&target).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Sample(SampleError::Exhausted { requested: 16, available: 15, .. })
        ));
        assert_eq!(engine.phase(), SessionPhase::RoundActive);
        assert_eq!(engine.current_indices(), shown.as_slice());
        assert_eq!(engine.total_clicks(), 1);
        assert!(engine.take_write_error().is_none());

        engine.presentation_size = 4;
        let other = engine.current_round()[1].name.clone();
        assert!(matches!(
            engine.handle_click(&other).unwrap(),
            ClickOutcome::NextRound { remaining: 23 }
        ));
    }

    #[test]
    fn presenter_and_tally_are_reachable_between_rounds() {
        let mut engine = engine(25);
        assert_eq!(engine.tally().key(), crate::config::DEFAULT_STORAGE_KEY);
        assert_eq!(engine.tally().fingerprint(), engine.state().fingerprint());

        engine.presenter_mut().rounds.clear();
        let target = first_shown(&engine);
        engine.handle_click(&target).unwrap();
        assert_eq!(engine.presenter().rounds.len(), 1);
        let stored = engine
            .tally()
            .storage()
            .get(engine.tally().key())
            .unwrap()
            .unwrap();
        assert_eq!(SessionState::from_json(&stored).unwrap(), *engine.state());
    }
}
