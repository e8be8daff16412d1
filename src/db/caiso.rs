pub mod daily_totals;
pub mod renewables_report;
pub mod renewables_watch;
