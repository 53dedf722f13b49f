#![cfg(target_arch = "wasm32")]

use pickpoll_core::{BlobStore, SessionConfig, SessionEngine, SessionPhase, NullPresenter};
use pickpoll_web::storage::LocalStorageStore;
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

const KEY: &str = "pickpoll.test";

#[wasm_bindgen_test]
fn local_storage_round_trips_and_removes() {
    let store = LocalStorageStore;
    store.remove(KEY).expect("clear");
    assert_eq!(store.get(KEY).expect("read"), None);
    store.set(KEY, "{}").expect("write");
    assert_eq!(store.get(KEY).expect("read").as_deref(), Some("{}"));
    store.remove(KEY).expect("remove");
    assert_eq!(store.get(KEY).expect("read"), None);
}

#[wasm_bindgen_test]
fn session_resumes_from_local_storage() {
    let config = SessionConfig {
        storage_key: KEY.to_string(),
        ..SessionConfig::default()
    };
    LocalStorageStore.remove(KEY).expect("clear");

    let mut engine =
        SessionEngine::bootstrap(config.clone(), LocalStorageStore, NullPresenter, 1).expect("boot");
    for _ in 0..3 {
        let target = engine.current_round()[0].name.clone();
        engine.handle_click(&target).expect("click");
    }
    drop(engine);

    let resumed = SessionEngine::bootstrap(config, LocalStorageStore, NullPresenter, 2).expect("boot");
    assert_eq!(resumed.total_clicks(), 3);
    assert_eq!(resumed.phase(), SessionPhase::RoundActive);
    LocalStorageStore.remove(KEY).expect("clear");
}
