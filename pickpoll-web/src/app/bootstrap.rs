use crate::app::presenter::YewPresenter;
use crate::app::state::AppState;
use crate::config::{FIRST_RUN_CATALOG, SESSION_CONFIG};
use pickpoll_core::{BlobStore, SessionEngine};
use yew::prelude::*;

fn presenter_for(app_state: &AppState) -> YewPresenter {
    let round = app_state.round.clone();
    let results = app_state.results.clone();
    YewPresenter::new(
        Callback::from(move |items| round.set(items)),
        Callback::from(move |aggregates| results.set(Some(aggregates))),
    )
}

/// Build the engine over `storage` and park it in `app_state`.
///
/// Failures are surfaced through `boot_error`; the board stays empty. A store
/// that rejects writes only costs persistence: voting continues in memory.
pub fn bootstrap_engine(app_state: &AppState, storage: Box<dyn BlobStore>, seed: u64) {
    let presenter = presenter_for(app_state);
    match SessionEngine::bootstrap_with_catalog(
        SESSION_CONFIG.clone(),
        storage,
        presenter,
        seed,
        || FIRST_RUN_CATALOG.clone(),
    ) {
        Ok(mut engine) => {
            if let Some(err) = engine.take_write_error() {
                let message = format!("votes will not be saved: {err}");
                log::warn!("{message}");
                #[cfg(target_arch = "wasm32")]
                crate::dom::console_error(&message);
            }
            log::info!(
                "session ready: {:?} snapshot, {} clicks left",
                engine.origin(),
                engine.clicks_remaining()
            );
            app_state.sync_from(&engine);
            *app_state.engine.borrow_mut() = Some(engine);
            app_state.boot_ready.set(true);
        }
        Err(err) => {
            let message = format!("session bootstrap failed: {err}");
            log::error!("{message}");
            #[cfg(target_arch = "wasm32")]
            crate::dom::console_error(&message);
            app_state.boot_error.set(Some(err.to_string()));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_bootstrap(app_state: &AppState) {
    let app_state = app_state.clone();

    use_effect_with((), move |()| {
        wasm_bindgen_futures::spawn_local(async move {
            bootstrap_engine(
                &app_state,
                Box::new(crate::storage::LocalStorageStore),
                crate::dom::entropy_seed(),
            );
        });
        || {}
    });
}
