use crate::config::Config;
use crate::dashboard::{DashboardSnapshot, RiskZone};
use crate::scoring::EnvironmentalReading;
use crate::tui::theme::ThemeColors;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Overview,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    Breakdown,
}

pub struct App {
    pub snapshot: Option<DashboardSnapshot>,
    pub reading: EnvironmentalReading,
    pub zone_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub last_refresh: Instant,
    pub last_interaction: Instant,
    pub needs_refresh: bool,
    pub force_refresh: bool,
    pub should_quit: bool,
    pub config: Config,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub theme: ThemeColors,
}

impl App {
    /// Create an App with no snapshot yet, in loading state.
    /// The first assessment runs in the background after the TUI is up.
    pub fn new_loading(config: Config, reading: EnvironmentalReading, theme: ThemeColors) -> Self {
        Self {
            snapshot: None,
            reading,
            zone_state: ratatui::widgets::TableState::default(),
            current_view: View::Overview,
            input_mode: InputMode::Normal,
            flash_message: None,
            last_refresh: Instant::now(),
            last_interaction: Instant::now(),
            needs_refresh: false,
            force_refresh: false,
            should_quit: false,
            config,
            is_loading: true,
            spinner_frame: 0,
            theme,
        }
    }

    pub fn zones(&self) -> &[RiskZone] {
        match &self.snapshot {
            Some(snapshot) => &snapshot.zones,
            None => &[],
        }
    }

    pub fn next_zone(&mut self) {
        let count = self.zones().len();
        if count == 0 {
            return;
        }
        let i = match self.zone_state.selected() {
            Some(i) if i + 1 < count => i + 1,
            _ => 0,
        };
        self.zone_state.select(Some(i));
    }

    pub fn previous_zone(&mut self) {
        let count = self.zones().len();
        if count == 0 {
            return;
        }
        let i = match self.zone_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.zone_state.select(Some(i));
    }

    pub fn selected_zone(&self) -> Option<&RiskZone> {
        let zones = self.zones();
        self.zone_state.selected().and_then(|i| zones.get(i))
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Toggle between the overview and the zone map
    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::Overview => View::Map,
            View::Map => View::Overview,
        };
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show score breakdown overlay (only once there is something to explain)
    pub fn show_breakdown(&mut self) {
        if self.snapshot.is_some() {
            self.input_mode = InputMode::Breakdown;
        }
    }

    pub fn dismiss_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Replace the snapshot with a freshly loaded one
    pub fn update_snapshot(&mut self, snapshot: DashboardSnapshot) {
        let zone_count = snapshot.zones.len();
        let fallback = snapshot.assessment.is_fallback();
        self.snapshot = Some(snapshot);

        // Keep zone selection in range
        match self.zone_state.selected() {
            _ if zone_count == 0 => self.zone_state.select(None),
            Some(i) if i >= zone_count => self.zone_state.select(Some(zone_count - 1)),
            None => self.zone_state.select(Some(0)),
            Some(_) => {}
        }

        self.last_refresh = Instant::now();

        if fallback {
            self.show_flash("Refreshed (predictor unavailable, using fallback)".to_string());
        } else {
            self.show_flash("Refreshed".to_string());
        }
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::build_metrics;
    use crate::scoring::assess_offline;
    use chrono::Utc;

    fn snapshot(config: &Config) -> DashboardSnapshot {
        let reading = config.conditions;
        let assessment = assess_offline(&reading);
        DashboardSnapshot {
            reading,
            metrics: build_metrics(&assessment, &config.hotspots),
            assessment,
            alerts: config.alerts.clone(),
            trend: config.trend.clone(),
            zones: config.zones.clone(),
            loaded_at: Utc::now(),
        }
    }

    fn app() -> App {
        let config = Config::default();
        let reading = config.conditions;
        App::new_loading(config, reading, ThemeColors::dark())
    }

    #[test]
    fn test_new_loading_state() {
        let app = app();
        assert!(app.is_loading);
        assert!(app.snapshot.is_none());
        assert!(app.zones().is_empty());
        assert_eq!(app.current_view, View::Overview);
    }

    #[test]
    fn test_breakdown_requires_snapshot() {
        let mut app = app();
        app.show_breakdown();
        assert_eq!(app.input_mode, InputMode::Normal);

        let snap = snapshot(&app.config);
        app.update_snapshot(snap);
        app.show_breakdown();
        assert_eq!(app.input_mode, InputMode::Breakdown);
        app.dismiss_breakdown();
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_update_snapshot_flags_fallback() {
        let mut app = app();
        let snap = snapshot(&app.config);
        app.update_snapshot(snap);

        let (msg, _) = app.flash_message.clone().unwrap();
        assert!(msg.contains("fallback"));
        assert_eq!(app.zone_state.selected(), Some(0));
    }

    #[test]
    fn test_zone_navigation_wraps() {
        let mut app = app();
        let snap = snapshot(&app.config);
        app.update_snapshot(snap);
        let count = app.zones().len();
        assert_eq!(count, 3);

        app.previous_zone();
        assert_eq!(app.zone_state.selected(), Some(count - 1));
        app.next_zone();
        assert_eq!(app.zone_state.selected(), Some(0));
        app.next_zone();
        assert_eq!(app.selected_zone().map(|z| z.id.as_str()), Some("z2"));
    }

    #[test]
    fn test_toggle_view() {
        let mut app = app();
        app.toggle_view();
        assert_eq!(app.current_view, View::Map);
        app.toggle_view();
        assert_eq!(app.current_view, View::Overview);
    }
}
