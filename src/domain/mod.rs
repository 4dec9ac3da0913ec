// Domain layer - Entries, trendlines and chart data
pub mod chart;
pub mod entry;
pub mod trendline;
