use crate::app::RoundProgress;
use crate::components::VoteBoard;
use pickpoll_core::Item;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct VotePageProps {
    pub items: Vec<Item>,
    pub progress: RoundProgress,
    pub ready: bool,
    #[prop_or_default]
    pub boot_error: Option<String>,
    pub on_pick: Callback<String>,
    pub on_view_results: Callback<()>,
}

#[function_component(VotePage)]
pub fn vote_page(p: &VotePageProps) -> Html {
    if let Some(err) = p.boot_error.as_ref() {
        return html! {
            <section class="panel" role="alert">
                <h2>{ "Voting is unavailable" }</h2>
                <p class="muted">{ err.clone() }</p>
            </section>
        };
    }
    if !p.ready {
        return html! {
            <section class="panel" aria-busy="true">
                <p>{ "Loading products..." }</p>
            </section>
        };
    }
    if p.progress.completed {
        let view_results = {
            let cb = p.on_view_results.clone();
            Callback::from(move |_| cb.emit(()))
        };
        return html! {
            <section class="panel vote-done" aria-live="polite">
                <h2>{ "Thanks for voting!" }</h2>
                <p>{ format!("You cast all {} votes.", p.progress.max_clicks) }</p>
                <button type="button" class="view-results" onclick={view_results}>
                    { "View Results" }
                </button>
            </section>
        };
    }

    let voted = p.progress.max_clicks.saturating_sub(p.progress.remaining);
    html! {
        <section class="panel vote">
            <p class="vote-progress" aria-live="polite">
                { format!("Round {}: {} of {} votes cast", p.progress.round, voted, p.progress.max_clicks) }
            </p>
            <VoteBoard items={p.items.clone()} on_pick={p.on_pick.clone()} />
        </section>
    }
}
