use futures::executor::block_on;
use pickpoll_core::{Aggregates, Catalog, Item};
use pickpoll_web::app::RoundProgress;
use pickpoll_web::components::bar_chart::{BarChart, Props as BarChartProps};
use pickpoll_web::components::vote_board::{Props as VoteBoardProps, VoteBoard};
use pickpoll_web::pages::{
    not_found::{NotFound, Props as NotFoundProps},
    results::{ResultsPage, ResultsPageProps},
    vote::{VotePage, VotePageProps},
};
use yew::{Callback, LocalServerRenderer};

fn round_items() -> Vec<Item> {
    Catalog::default_products().iter().take(4).cloned().collect()
}

fn active_progress() -> RoundProgress {
    RoundProgress {
        round: 3,
        remaining: 23,
        max_clicks: 25,
        completed: false,
    }
}

fn sample_aggregates() -> Aggregates {
    Aggregates {
        labels: vec!["bag".into(), "banana".into()],
        clicks: vec![1, 3],
        views: vec![4, 6],
    }
}

#[test]
fn vote_board_renders_one_image_per_item() {
    let props = VoteBoardProps {
        items: round_items(),
        on_pick: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<VoteBoard>::with_props(props).render());
    assert_eq!(html.matches("<img").count(), 4);
    assert!(html.contains(r#"alt="bag""#));
    assert!(html.contains(r#"src="/img/bag.jpg""#));
}

#[test]
fn vote_page_shows_progress_while_active() {
    let props = VotePageProps {
        items: round_items(),
        progress: active_progress(),
        ready: true,
        boot_error: None,
        on_pick: Callback::noop(),
        on_view_results: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<VotePage>::with_props(props).render());
    assert!(html.contains("Round 3: 2 of 25 votes cast"));
    assert!(!html.contains("View Results"));
}

#[test]
fn vote_page_offers_results_once_completed() {
    let props = VotePageProps {
        items: Vec::new(),
        progress: RoundProgress {
            round: 26,
            remaining: 0,
            max_clicks: 25,
            completed: true,
        },
        ready: true,
        boot_error: None,
        on_pick: Callback::noop(),
        on_view_results: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<VotePage>::with_props(props).render());
    assert!(html.contains("View Results"));
    assert!(!html.contains("<img"));
}

#[test]
fn vote_page_reports_loading_and_boot_errors() {
    let loading = VotePageProps {
        items: Vec::new(),
        progress: RoundProgress::default(),
        ready: false,
        boot_error: None,
        on_pick: Callback::noop(),
        on_view_results: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<VotePage>::with_props(loading.clone()).render());
    assert!(html.contains("Loading products"));

    let failed = VotePageProps {
        boot_error: Some("catalog needs at least 2 items".into()),
        ..loading
    };
    let html = block_on(LocalServerRenderer::<VotePage>::with_props(failed).render());
    assert!(html.contains("Voting is unavailable"));
    assert!(html.contains("catalog needs at least 2 items"));
}

#[test]
fn results_page_lists_lines_and_draws_both_charts() {
    let props = ResultsPageProps {
        aggregates: sample_aggregates(),
        on_vote_again: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ResultsPage>::with_props(props).render());
    assert!(html.contains("bag had 4 views and was clicked 1 times."));
    assert!(html.contains("banana had 6 views and was clicked 3 times."));
    assert!(html.contains("(50% pick rate)"));
    assert_eq!(html.matches("<svg").count(), 2);
    assert!(html.contains("Votes"));
    assert!(html.contains("Views"));
    assert!(html.contains("Vote again"));
}

#[test]
fn results_page_handles_empty_tallies() {
    let props = ResultsPageProps {
        aggregates: Aggregates::default(),
        on_vote_again: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ResultsPage>::with_props(props).render());
    assert!(html.contains("No votes recorded yet."));
    assert!(!html.contains("<svg"));
}

#[test]
fn bar_chart_scales_tallest_bar_to_plot_height() {
    let props = BarChartProps {
        series: sample_aggregates().votes_series(),
        plot_height: 120,
    };
    let html = block_on(LocalServerRenderer::<BarChart>::with_props(props).render());
    assert!(html.contains(r#"height="120""#));
    assert!(html.contains(r#"height="40""#));
    assert!(html.contains("banana: 3"));
}

#[test]
fn not_found_page_offers_way_back() {
    let props = NotFoundProps {
        on_go_home: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<NotFound>::with_props(props).render());
    assert!(html.contains("Page not found"));
    assert!(html.contains("Back to voting"));
}
