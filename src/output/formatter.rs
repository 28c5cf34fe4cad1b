use chrono::Duration;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::dashboard::{Alert, RiskMetric, RiskTrend, RiskZone, Trend};
use crate::scoring::{AssessmentSource, RiskAssessment, RiskTier, ScoreBreakdown};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a 0-100 score with one decimal, dropping a trailing ".0"
/// (62.5 -> "62.5", 91.0 -> "91")
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    formatted
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(formatted)
}

/// Color text by tier: green, yellow, bright red, bold red
fn paint(text: &str, tier: RiskTier, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match tier {
        RiskTier::Low => text.green().to_string(),
        RiskTier::Moderate => text.yellow().to_string(),
        RiskTier::High => text.bright_red().to_string(),
        RiskTier::Extreme => text.red().bold().to_string(),
    }
}

fn source_label(source: AssessmentSource) -> &'static str {
    match source {
        AssessmentSource::Model => "model",
        AssessmentSource::Fallback => "fallback",
    }
}

/// Multi-line summary of an assessment
pub fn format_assessment(assessment: &RiskAssessment, use_colors: bool) -> String {
    let tier = assessment.tier;
    let headline = format!("{}/100 ({})", format_score(assessment.score), tier.label());
    let baseline = format!(
        "{}/100 ({})",
        format_score(assessment.baseline.score),
        assessment.baseline.tier.label()
    );
    let drivers = if assessment.top_drivers.is_empty() {
        "none reported".to_string()
    } else {
        assessment.top_drivers.join(", ")
    };
    let source = source_label(assessment.source);

    if use_colors {
        format!(
            "Risk score: {} [{}]\n  Action: {}\n  Baseline: {}\n  Drivers: {}",
            paint(&headline, tier, true).bold(),
            source.dimmed(),
            paint(tier.action(), tier, true),
            paint(&baseline, assessment.baseline.tier, true),
            drivers
        )
    } else {
        format!(
            "Risk score: {} [{}]\n  Action: {}\n  Baseline: {}\n  Drivers: {}",
            headline,
            source,
            tier.action(),
            baseline,
            drivers
        )
    }
}

/// Per-term view of the local formula (verbose mode)
pub fn format_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut lines = vec![format!("  Intercept: {:+.1}", breakdown.intercept)];
    for factor in &breakdown.factors {
        lines.push(format!(
            "  {}: {:.2} x {:+} = {:+.1}",
            factor.label, factor.input, factor.weight, factor.contribution
        ));
    }
    lines.push(format!(
        "  Raw: {:.1} -> clamped {}",
        breakdown.raw,
        format_score(breakdown.score)
    ));
    lines.join("\n")
}

/// Arrow glyph for a metric trend
pub fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "↑",
        Trend::Down => "↓",
        Trend::Neutral => "→",
    }
}

/// One line per metric card: "title  value  [status]  arrow change"
pub fn format_metrics(metrics: &[RiskMetric], use_colors: bool) -> String {
    let title_width = metrics.iter().map(|m| m.title.chars().count()).max().unwrap_or(0);

    metrics
        .iter()
        .map(|metric| {
            let title = format!("{:<width$}", metric.title, width = title_width);
            let value = format!("{:>8}", metric.value);
            let status = format!("[{}]", metric.status.as_str());
            let change = match &metric.change {
                Some(change) => format!("  {} {}", trend_arrow(metric.trend), change),
                None => String::new(),
            };

            if use_colors {
                format!(
                    "{}  {}  {}{}",
                    title.dimmed(),
                    value.bold(),
                    paint(&status, metric.status, true),
                    change
                )
            } else {
                format!("{}  {}  {}{}", title, value, status, change)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format how long ago something happened ("2h ago", "3d ago", "just now")
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w ago", weeks)
    } else if days >= 1 {
        format!("{}d ago", days)
    } else if hours >= 1 {
        format!("{}h ago", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m ago", minutes)
        } else {
            "just now".to_string()
        }
    }
}

/// Render an alert's age, keeping the raw string if it doesn't parse
pub fn alert_age(alert: &Alert) -> String {
    alert
        .age_duration()
        .ok()
        .and_then(|d| Duration::from_std(d).ok())
        .map(format_age)
        .unwrap_or_else(|| alert.age.clone())
}

pub fn format_alerts(alerts: &[Alert], use_colors: bool) -> String {
    if alerts.is_empty() {
        return "No active alerts.".to_string();
    }

    alerts
        .iter()
        .map(|alert| {
            let tier = alert.severity.tier();
            let badge = format!("[{}]", tier.as_str());
            let age = alert_age(alert);
            if use_colors {
                format!(
                    "{} {} ({})\n    {}",
                    paint(&badge, tier, true),
                    alert.title.bold(),
                    age.dimmed(),
                    alert.description
                )
            } else {
                format!("{} {} ({})\n    {}", badge, alert.title, age, alert.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Sparkline scaled against `max` (values at or above max get the full block)
pub fn sparkline(data: &[f64], max: f64) -> String {
    data.iter()
        .map(|v| {
            let ratio = if max > 0.0 { (v / max).clamp(0.0, 1.0) } else { 0.0 };
            let idx = (ratio * (SPARK_CHARS.len() - 1) as f64).round() as usize;
            SPARK_CHARS[idx]
        })
        .collect()
}

/// One sparkline row per series, sharing a common scale
pub fn format_trend(trend: &RiskTrend) -> String {
    let max = trend.max_value();
    let label_width = trend
        .series
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "{:<width$}  {}",
        "",
        trend
            .labels
            .iter()
            .map(|l| l.chars().next().unwrap_or(' '))
            .collect::<String>(),
        width = label_width
    )];

    for series in &trend.series {
        let last = series.data.last().map(|v| format_score(*v)).unwrap_or_default();
        lines.push(format!(
            "{:<width$}  {}  {}",
            series.label,
            sparkline(&series.data, max),
            last,
            width = label_width
        ));
    }

    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Zones as a table: id, level, temperature, humidity, name
/// Name is last so it can take (and be truncated to) the remaining width
pub fn format_zones_table(zones: &[RiskZone], use_colors: bool) -> String {
    if zones.is_empty() {
        return "No risk zones configured.".to_string();
    }

    let term_width = get_terminal_width();
    let id_width = zones.iter().map(|z| z.id.chars().count()).max().unwrap_or(2).max(2);

    // id + level(8) + temp(7) + humidity(6) + 4 separators of 2
    let fixed_width = id_width + 8 + 7 + 6 + 8;

    zones
        .iter()
        .map(|zone| {
            let id = format!("{:<width$}", zone.id, width = id_width);
            let level = format!("{:<8}", zone.risk_level.as_str());
            let temp = format!("{:>5.1}C", zone.temperature);
            let humidity = format!("{:>4.0}%", zone.humidity);

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&zone.name, width - fixed_width),
                Some(_) => truncate_name(&zone.name, 20),
                None => zone.name.clone(),
            };

            if use_colors {
                format!(
                    "{}  {}  {}  {}  {}",
                    id.dimmed(),
                    paint(&level, zone.risk_level, true),
                    temp,
                    humidity,
                    name.bold()
                )
            } else {
                format!("{}  {}  {}  {}  {}", id, level, temp, humidity, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
