use pickpoll_core::{Aggregates, Item, Presenter};
use yew::Callback;

/// Forwards engine notifications into yew state setters.
#[derive(Clone, PartialEq)]
pub struct YewPresenter {
    on_round: Callback<Vec<Item>>,
    on_complete: Callback<Aggregates>,
}

impl YewPresenter {
    #[must_use]
    pub const fn new(on_round: Callback<Vec<Item>>, on_complete: Callback<Aggregates>) -> Self {
        Self {
            on_round,
            on_complete,
        }
    }
}

impl Presenter for YewPresenter {
    fn on_items_presented(&mut self, items: &[Item]) {
        self.on_round.emit(items.to_vec());
    }

    fn on_session_completed(&mut self, aggregates: &Aggregates) {
        self.on_round.emit(Vec::new());
        self.on_complete.emit(aggregates.clone());
    }
}
