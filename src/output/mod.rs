pub mod formatter;

pub use formatter::{
    alert_age, format_age, format_alerts, format_assessment, format_breakdown, format_metrics,
    format_score, format_trend, format_zones_table, should_use_colors, sparkline, trend_arrow,
};
