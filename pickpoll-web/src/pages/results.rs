use crate::components::{BarChart, ResultsList};
use pickpoll_core::Aggregates;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct ResultsPageProps {
    pub aggregates: Aggregates,
    pub on_vote_again: Callback<()>,
}

/// Per-item tallies with the votes and views charts.
#[function_component(ResultsPage)]
pub fn results_page(p: &ResultsPageProps) -> Html {
    let vote_again = {
        let cb = p.on_vote_again.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let body = if p.aggregates.is_empty() {
        html! { <p class="muted">{ "No votes recorded yet." }</p> }
    } else {
        html! {
            <>
                <ResultsList aggregates={p.aggregates.clone()} />
                <div class="charts">
                    <BarChart series={p.aggregates.votes_series()} />
                    <BarChart series={p.aggregates.views_series()} />
                </div>
            </>
        }
    };

    html! {
        <section class="panel results" aria-labelledby="results-title">
            <h2 id="results-title">{ "Results" }</h2>
            { body }
            <button type="button" class="vote-again" onclick={vote_again}>
                { "Vote again" }
            </button>
        </section>
    }
}
