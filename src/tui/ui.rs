use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{
    Axis, Block, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Tabs, Wrap,
};

use crate::dashboard::{zones_extent, DashboardSnapshot, RiskMetric};
use crate::output::{alert_age, format_score, trend_arrow};
use crate::scoring::{breakdown, explain_drivers, AssessmentSource};
use crate::tui::app::{App, InputMode, View};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 12 || area.width < 50 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Tab bar
        Constraint::Fill(1),   // Body
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Overview => render_overview(frame, chunks[2], app),
        View::Map => render_map(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::Breakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }

    // Loading overlay sits on top of everything
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let name = "GeoFire Risk";
    let mut spans = vec![Span::styled(name, Style::default().fg(theme.title_color).bold())];

    // Current tier and recommended action on the right
    if let Some(snapshot) = &app.snapshot {
        let tier = snapshot.assessment.tier;
        let right = format!("{}: {}", tier.label(), tier.action());
        let padding_len = (area.width as usize).saturating_sub(name.len() + right.chars().count());
        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(
            right,
            Style::default().fg(theme.tier_color(tier)).bold(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let selected = match app.current_view {
        View::Overview => 0,
        View::Map => 1,
    };

    let tabs = Tabs::new(vec!["Overview", "Zone Map"])
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_placeholder(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
    let msg = Paragraph::new("Waiting for first assessment...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.muted));
    frame.render_widget(msg, area);
}

fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let Some(snapshot) = &app.snapshot else {
        render_placeholder(frame, area, &app.theme);
        return;
    };

    let rows = Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).split(area);

    // Metric cards, one per column
    let card_count = snapshot.metrics.len().max(1) as u32;
    let cards = Layout::horizontal(
        snapshot
            .metrics
            .iter()
            .map(|_| Constraint::Ratio(1, card_count)),
    )
    .split(rows[0]);
    for (metric, card_area) in snapshot.metrics.iter().zip(cards.iter()) {
        render_metric_card(frame, *card_area, metric, &app.theme);
    }

    let main = Layout::horizontal([Constraint::Percentage(62), Constraint::Fill(1)]).split(rows[1]);
    render_trend_chart(frame, main[0], snapshot, &app.theme);
    render_alerts(frame, main[1], snapshot, &app.theme);
}

fn render_metric_card(frame: &mut Frame, area: Rect, metric: &RiskMetric, theme: &ThemeColors) {
    let color = theme.tier_color(metric.status);
    let block = Block::bordered()
        .title(metric.title.as_str())
        .border_style(Style::default().fg(color));

    let mut lines = vec![Line::from(vec![
        Span::styled(
            metric.value.clone(),
            Style::default().fg(theme.value_color).bold(),
        ),
        Span::raw("  "),
        Span::styled(metric.status.label(), Style::default().fg(color)),
    ])];
    if let Some(change) = &metric.change {
        lines.push(Line::from(Span::styled(
            format!("{} {}", trend_arrow(metric.trend), change),
            Style::default().fg(theme.muted),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_trend_chart(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &ThemeColors) {
    let trend = &snapshot.trend;

    // Points must outlive the datasets that borrow them
    let points: Vec<Vec<(f64, f64)>> = trend
        .series
        .iter()
        .map(|s| {
            s.data
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = trend
        .series
        .iter()
        .zip(points.iter())
        .map(|(series, data)| {
            let (color, marker) = if series.dashed {
                (theme.chart_reference, Marker::Dot)
            } else {
                (theme.chart_primary, Marker::Braille)
            };
            Dataset::default()
                .name(series.label.clone())
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let x_max = trend.labels.len().saturating_sub(1).max(1) as f64;
    let y_max = trend.max_value().max(100.0);

    let chart = Chart::new(datasets)
        .block(Block::bordered().title(" 7-Day Risk Forecast "))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.axis_color))
                .bounds([0.0, x_max])
                .labels(trend.labels.clone()),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.axis_color))
                .bounds([0.0, y_max])
                .labels(["0".to_string(), format_score(y_max / 2.0), format_score(y_max)]),
        );

    frame.render_widget(chart, area);
}

fn render_alerts(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &ThemeColors) {
    let block = Block::bordered().title(" Active Alerts ");

    if snapshot.alerts.is_empty() {
        let msg = Paragraph::new("No active alerts")
            .style(Style::default().fg(theme.muted))
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let mut lines = Vec::new();
    for alert in &snapshot.alerts {
        let color = theme.tier_color(alert.severity.tier());
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::styled(alert.title.clone(), Style::default().bold()),
            Span::raw("  "),
            Span::styled(alert_age(alert), Style::default().fg(theme.muted)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", alert.description),
            Style::default().fg(theme.muted),
        )));
        lines.push(Line::from(""));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_map(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some(snapshot) = &app.snapshot else {
        render_placeholder(frame, area, &app.theme);
        return;
    };
    let theme = &app.theme;
    let zones = &snapshot.zones;

    let cols = Layout::horizontal([Constraint::Percentage(55), Constraint::Fill(1)]).split(area);

    let selected_id = app
        .zone_state
        .selected()
        .and_then(|i| zones.get(i))
        .map(|z| z.id.clone());
    let (x0, y0, x1, y1) = zones_extent(zones).unwrap_or((-180.0, -90.0, 180.0, 90.0));

    let canvas = Canvas::default()
        .block(Block::bordered().title(" Zone Map "))
        .marker(Marker::Braille)
        .x_bounds([x0, x1])
        .y_bounds([y0, y1])
        .paint(|ctx| {
            for zone in zones {
                let color = theme.tier_color(zone.risk_level);
                for pair in zone.polygon.windows(2) {
                    ctx.draw(&CanvasLine::new(pair[0][0], pair[0][1], pair[1][0], pair[1][1], color));
                }
                if let Some((zx0, zy0, zx1, zy1)) = zone.bounds() {
                    let style = if selected_id.as_deref() == Some(zone.id.as_str()) {
                        Style::default().fg(color).bold().reversed()
                    } else {
                        Style::default().fg(color)
                    };
                    ctx.print(
                        (zx0 + zx1) / 2.0,
                        (zy0 + zy1) / 2.0,
                        Span::styled(zone.id.clone(), style),
                    );
                }
            }
        });
    frame.render_widget(canvas, cols[0]);

    let rows: Vec<Row> = zones
        .iter()
        .map(|zone| {
            let color = theme.tier_color(zone.risk_level);
            Row::new(vec![
                Cell::from(zone.id.clone()),
                Cell::from(zone.name.clone()),
                Cell::from(zone.risk_level.label()).style(Style::default().fg(color)),
                Cell::from(format!("{:.1}°C", zone.temperature)),
                Cell::from(format!("{:.0}%", zone.humidity)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .block(Block::bordered().title(" Zones "))
        .header(
            Row::new(vec!["ID", "Name", "Risk", "Temp", "Hum"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, cols[1], &mut app.zone_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.contains("fallback") || msg.starts_with("Refresh failed") {
            theme.flash_error
        } else if msg.starts_with("Refreshed") {
            theme.flash_success
        } else {
            theme.value_color
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let source = match app.snapshot.as_ref().map(|s| s.assessment.source) {
            Some(AssessmentSource::Model) => "model",
            Some(AssessmentSource::Fallback) => "fallback",
            None => "pending",
        };

        let elapsed = app.last_refresh.elapsed();
        let refresh_time = if elapsed.as_secs() < 60 {
            format!("refreshed {}s ago", elapsed.as_secs())
        } else {
            format!("refreshed {}m ago", elapsed.as_secs() / 60)
        };

        let hints: &[(&str, &str)] = match app.current_view {
            View::Overview => &[
                ("Tab", ":map "),
                ("b", ":breakdown "),
                ("r", ":refresh "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            View::Map => &[
                ("j/k", ":zone "),
                ("Tab", ":overview "),
                ("b", ":breakdown "),
                ("r", ":refresh "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = vec![
            Span::styled(format!("source: {}", source), Style::default().fg(theme.muted)),
            Span::raw(" "),
            Span::styled(refresh_time, Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn popup_block<'a>(title: &'a str, theme: &ThemeColors) -> Block<'a> {
    Block::bordered()
        .title(Span::styled(title, theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg))
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 13, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Keyboard Shortcuts ", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let entries = [
        ("Tab           ", "Toggle Overview/Zone Map"),
        ("j / Down      ", "Next zone (map)"),
        ("k / Up        ", "Previous zone (map)"),
        ("b             ", "Score breakdown"),
        ("r             ", "Re-assess now"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Inputs, heuristic terms and drivers behind the current score
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let Some(snapshot) = &app.snapshot else {
        return;
    };
    let theme = &app.theme;
    let assessment = &snapshot.assessment;
    let reading = &snapshot.reading;
    let terms = breakdown(reading);

    let popup_area = centered_rect_fixed(64, 22, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Score Breakdown ", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let tier_color = theme.tier_color(assessment.tier);
    let label_style = Style::default().fg(theme.muted);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Score     ", label_style),
            Span::styled(
                format!("{}/100 {}", format_score(assessment.score), assessment.tier.label()),
                Style::default().fg(tier_color).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Source    ", label_style),
            Span::raw(match assessment.source {
                AssessmentSource::Model => "prediction service",
                AssessmentSource::Fallback => "local heuristic (fallback)",
            }),
        ]),
        Line::from(vec![
            Span::styled("Action    ", label_style),
            Span::raw(assessment.tier.action()),
        ]),
        Line::from(vec![
            Span::styled("Drivers   ", label_style),
            Span::raw(assessment.top_drivers.join(", ")),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Inputs: {:.1}°C, {:.0}% humidity, {:.1} km/h wind, veg {:.2}",
                reading.temperature_celsius,
                reading.relative_humidity_percent,
                reading.wind_speed_kmh,
                reading.vegetation_moisture_fraction
            ),
            label_style,
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Heuristic baseline {}", format_score(terms.score)),
            Style::default().bold(),
        )),
    ];

    for factor in &terms.factors {
        lines.push(Line::from(format!(
            "  {:<20} {:.2} x {:>4} = {:>+6.1}",
            factor.label, factor.input, factor.weight, factor.contribution
        )));
    }
    lines.push(Line::from(format!(
        "  {:<20} {:>18}",
        "Intercept",
        format!("{:+.1}", terms.intercept)
    )));
    if terms.raw != terms.score {
        lines.push(Line::from(Span::styled(
            format!("  raw {:.1}, clamped to {}", terms.raw, format_score(terms.score)),
            label_style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Local drivers  ", label_style),
        Span::raw(explain_drivers(reading).join(", ")),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Esc/b: close", label_style)));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let text = if app.snapshot.is_none() {
        format!("{} Assessing risk...", spinner)
    } else {
        format!("{} Refreshing...", spinner)
    };

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title_color));

    frame.render_widget(loading_text, inner);
}
