pub mod bar_chart;
pub mod results_list;
pub mod vote_board;

pub use bar_chart::BarChart;
pub use results_list::ResultsList;
pub use vote_board::VoteBoard;
