use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Vote,
    #[at("/results")]
    Results,
    #[at("/404")]
    #[not_found]
    NotFound,
}
