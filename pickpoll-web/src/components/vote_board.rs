use crate::paths::image_src;
use pickpoll_core::Item;
use web_sys::HtmlImageElement;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct Props {
    pub items: Vec<Item>,
    /// Emits the `alt` text of the clicked image; clicks between images emit nothing.
    pub on_pick: Callback<String>,
}

/// The round's images inside one clickable section.
#[function_component(VoteBoard)]
pub fn vote_board(p: &Props) -> Html {
    let onclick = {
        let on_pick = p.on_pick.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(image) = e.target_dyn_into::<HtmlImageElement>() {
                on_pick.emit(image.alt());
            }
        })
    };

    html! {
        <section class="vote-board" aria-label="Pick your favorite" {onclick}>
            { for p.items.iter().map(|item| html! {
                <img
                    key={item.name.clone()}
                    class="vote-item"
                    src={image_src(&item.image_ref)}
                    alt={item.name.clone()}
                    title={item.name.clone()}
                />
            }) }
        </section>
    }
}
