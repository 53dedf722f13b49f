use crate::app::presenter::YewPresenter;
use pickpoll_core::{Aggregates, BlobStore, Item, SessionEngine, SessionPhase};
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

/// Engine as wired in the browser: any blob store, yew-backed presenter.
pub type WebEngine = SessionEngine<Box<dyn BlobStore>, YewPresenter>;

/// Counters shown above the vote board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundProgress {
    pub round: u32,
    pub remaining: u32,
    pub max_clicks: u32,
    pub completed: bool,
}

impl RoundProgress {
    #[must_use]
    pub fn from_engine<S, P>(engine: &SessionEngine<S, P>) -> Self {
        Self {
            round: engine.rounds_completed() + 1,
            remaining: engine.clicks_remaining(),
            max_clicks: engine.config().max_clicks,
            completed: engine.phase() == SessionPhase::Completed,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    /// Lives outside yew state so clicks mutate in place; never borrowed during render.
    pub engine: Rc<RefCell<Option<WebEngine>>>,
    pub round: UseStateHandle<Vec<Item>>,
    pub progress: UseStateHandle<RoundProgress>,
    pub results: UseStateHandle<Option<Aggregates>>,
    pub lifetime: UseStateHandle<Aggregates>,
    pub boot_ready: UseStateHandle<bool>,
    pub boot_error: UseStateHandle<Option<String>>,
}

#[hook]
pub fn use_app_state() -> AppState {
    AppState {
        engine: use_mut_ref(|| None::<WebEngine>),
        round: use_state(Vec::<Item>::new),
        progress: use_state(RoundProgress::default),
        results: use_state(|| None::<Aggregates>),
        lifetime: use_state(Aggregates::default),
        boot_ready: use_state(|| false),
        boot_error: use_state(|| None::<String>),
    }
}

impl AppState {
    /// Copy engine-derived counters into render state.
    pub fn sync_from(&self, engine: &WebEngine) {
        self.progress.set(RoundProgress::from_engine(engine));
        self.lifetime.set(engine.aggregates());
    }
}
