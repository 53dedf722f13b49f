use crate::app::state::AppState;
use crate::router::Route;
use yew::prelude::*;
use yew_router::prelude::Navigator;

#[derive(Clone)]
pub struct AppHandlers {
    pub pick: Callback<String>,
    pub restart: Callback<()>,
    pub view_results: Callback<()>,
    pub go_home: Callback<()>,
}

impl AppHandlers {
    #[must_use]
    pub fn new(state: &AppState, navigator: Option<Navigator>) -> Self {
        Self {
            pick: build_pick(state),
            restart: build_restart(state, navigator.clone()),
            view_results: build_navigate(navigator.clone(), Route::Results),
            go_home: build_navigate(navigator, Route::Vote),
        }
    }
}

/// Route a picked image name into the engine.
pub fn build_pick(state: &AppState) -> Callback<String> {
    let state = state.clone();
    Callback::from(move |target: String| {
        let mut slot = state.engine.borrow_mut();
        let Some(engine) = slot.as_mut() else {
            return;
        };
        if let Err(err) = engine.handle_click(&target) {
            let message = format!("vote for '{target}' not saved: {err}");
            log::error!("{message}");
            #[cfg(target_arch = "wasm32")]
            crate::dom::console_error(&message);
        }
        state.sync_from(engine);
    })
}

/// Begin a new session cycle and return to the board.
pub fn build_restart(state: &AppState, navigator: Option<Navigator>) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        {
            let mut slot = state.engine.borrow_mut();
            let Some(engine) = slot.as_mut() else {
                return;
            };
            match engine.restart() {
                Ok(true) => state.results.set(None),
                Ok(false) => {}
                Err(err) => {
                    log::error!("restart not saved: {err}");
                    state.results.set(None);
                }
            }
            state.sync_from(engine);
        }
        if let Some(nav) = navigator.as_ref() {
            nav.push(&Route::Vote);
        }
    })
}

fn build_navigate(navigator: Option<Navigator>, route: Route) -> Callback<()> {
    Callback::from(move |()| {
        if let Some(nav) = navigator.as_ref() {
            nav.push(&route);
        }
    })
}
