#[cfg(target_arch = "wasm32")]
use crate::router::Route;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

pub mod bootstrap;
pub mod presenter;
pub mod state;
pub mod view;

pub use presenter::YewPresenter;
pub use state::{AppState, RoundProgress, WebEngine};

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let app_state = state::use_app_state();
    bootstrap::use_bootstrap(&app_state);

    let navigator = use_navigator();
    let route = use_route::<Route>();

    view::render_app(&app_state, route.as_ref(), navigator)
}

#[cfg(test)]
mod tests {
    use super::state::use_app_state;
    use super::view::{build_pick, build_restart, render_app};
    use crate::router::Route;
    use futures::executor::block_on;
    use pickpoll_core::{MemoryStore, SessionPhase};
    use yew::LocalServerRenderer;
    use yew::prelude::*;

    /// Drives one full session through the click and restart handlers.
    #[function_component(SessionHarness)]
    fn session_harness() -> Html {
        let app_state = use_app_state();
        let initialized = use_state(|| false);
        if !*initialized {
            initialized.set(true);
            super::bootstrap::bootstrap_engine(&app_state, Box::new(MemoryStore::new()), 99);

            let pick = build_pick(&app_state);
            loop {
                let target = {
                    let engine = app_state.engine.borrow();
                    let engine = engine.as_ref().expect("engine booted");
                    if engine.phase() == SessionPhase::Completed {
                        break;
                    }
                    engine.current_round()[0].name.clone()
                };
                pick.emit(target);
            }
            // Clicks after completion are dropped.
            pick.emit("bag".to_string());
            {
                let engine = app_state.engine.borrow();
                let engine = engine.as_ref().expect("engine booted");
                assert_eq!(engine.state().total_item_clicks(), 25);
                assert_eq!(engine.total_clicks(), 0);
            }

            build_restart(&app_state, None).emit(());
            let engine = app_state.engine.borrow();
            let engine = engine.as_ref().expect("engine booted");
            assert_eq!(engine.phase(), SessionPhase::RoundActive);
            assert_eq!(engine.clicks_remaining(), 25);
        }
        Html::default()
    }

    #[test]
    fn handlers_drive_a_full_session_and_restart() {
        let _ = block_on(LocalServerRenderer::<SessionHarness>::new().render());
    }

    #[function_component(NotFoundHarness)]
    fn not_found_harness() -> Html {
        let app_state = use_app_state();
        render_app(&app_state, Some(&Route::NotFound), None)
    }

    #[test]
    fn unknown_routes_render_not_found() {
        let html = block_on(LocalServerRenderer::<NotFoundHarness>::new().render());
        assert!(html.contains("Page not found"));
        assert!(html.contains("Pickpoll"));
    }
}
