use pickpoll_core::Aggregates;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq, Eq)]
pub struct Props {
    pub aggregates: Aggregates,
}

#[function_component(ResultsList)]
pub fn results_list(p: &Props) -> Html {
    let rates = p.aggregates.click_rates();
    html! {
        <ul class="results-list">
            { for p.aggregates.result_lines().into_iter().zip(rates).map(|(line, rate)| html! {
                <li>
                    { line }
                    <span class="muted">{ format!(" ({rate}% pick rate)") }</span>
                </li>
            }) }
        </ul>
    }
}
