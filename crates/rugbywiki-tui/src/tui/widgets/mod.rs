// TUI widget modules for each screen region.

pub mod fixture_list;
pub mod league_filter;
pub mod quit_confirm;
pub mod status_bar;
pub mod team_list;
pub mod team_stats;
