mod handlers;

pub use handlers::{AppHandlers, build_pick, build_restart};

use crate::app::state::AppState;
use crate::pages::not_found::NotFound;
use crate::pages::results::ResultsPage;
use crate::pages::vote::VotePage;
use crate::router::Route;
use yew::prelude::*;
use yew_router::prelude::Navigator;

pub fn render_app(state: &AppState, route: Option<&Route>, navigator: Option<Navigator>) -> Html {
    let handlers = AppHandlers::new(state, navigator);

    let page = match route.unwrap_or(&Route::Vote) {
        Route::Vote => html! {
            <VotePage
                items={(*state.round).clone()}
                progress={*state.progress}
                ready={*state.boot_ready}
                boot_error={(*state.boot_error).clone()}
                on_pick={handlers.pick.clone()}
                on_view_results={handlers.view_results.clone()}
            />
        },
        Route::Results => {
            // Fall back to lifetime totals when the page is opened directly.
            let aggregates = (*state.results)
                .clone()
                .unwrap_or_else(|| (*state.lifetime).clone());
            html! {
                <ResultsPage {aggregates} on_vote_again={handlers.restart.clone()} />
            }
        }
        Route::NotFound => html! { <NotFound on_go_home={handlers.go_home.clone()} /> },
    };

    html! {
        <>
            <header class="app-header">
                <h1>{ "Pickpoll" }</h1>
                <p class="muted">{ "Pick the product you would most like to buy." }</p>
            </header>
            <main id="main" role="main">
                { page }
            </main>
        </>
    }
}
