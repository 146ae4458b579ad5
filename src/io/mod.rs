/// CSV export of scenario comparisons and chart series.
pub mod export;
