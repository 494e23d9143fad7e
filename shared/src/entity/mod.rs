pub mod stat_history;
