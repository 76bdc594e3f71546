use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::i18n::{Locale, lookup};
use crate::utils::log_msg;

/// TSLA quarterly EPS, actual vs analyst estimate. The live numbers come
/// from the FinSage server; the tour ships this fixed snapshot.
pub struct EarningsSeries {
    pub labels: [&'static str; 4],
    pub actual: [f64; 4],
    pub estimated: [f64; 4],
}

pub const EARNINGS: EarningsSeries = EarningsSeries {
    labels: ["Q1 2025", "Q2 2025", "Q3 2025", "Q4 2025"],
    actual: [0.27, 0.40, 0.50, 0.50],
    estimated: [0.40, 0.44, 0.56, 0.46],
};

/// Y window framing this dataset.
pub const Y_BOUNDS: [f64; 2] = [0.25, 0.60];

const ACTUAL_COLOR: Color = Color::Rgb(0, 229, 160);
const ESTIMATED_COLOR: Color = Color::Rgb(255, 107, 107);

/// EPS values render as dollars with exactly two decimals.
pub fn currency(value: f64) -> String {
    format!("${value:.2}")
}

pub fn signed_percent(value: f64) -> String {
    format!("{value:+.2}%")
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name: String,
    pub color: Color,
    pub points: Vec<(f64, f64)>,
}

/// Everything the view needs to draw the earnings chart. Built fresh for a
/// `(series, locale)` pair; labels are locale-bound, so a locale switch means
/// a new config, never a patched one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub title: String,
    pub x_labels: Vec<String>,
    pub y_bounds: [f64; 2],
    pub y_labels: Vec<String>,
    pub series: Vec<SeriesSpec>,
    /// Renders a data value for the readout line and axis labels.
    pub value_formatter: fn(f64) -> String,
}

pub fn build_config(series: &EarningsSeries, locale: Locale) -> ChartConfig {
    let points = |values: &[f64; 4]| {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect()
    };

    let [lo, hi] = Y_BOUNDS;
    ChartConfig {
        title: lookup(locale, "chat.title"),
        x_labels: series.labels.iter().map(|l| l.to_string()).collect(),
        y_bounds: Y_BOUNDS,
        y_labels: vec![currency(lo), currency((lo + hi) / 2.0), currency(hi)],
        value_formatter: currency,
        series: vec![
            SeriesSpec {
                name: lookup(locale, "chat.actual_eps"),
                color: ACTUAL_COLOR,
                points: points(&series.actual),
            },
            SeriesSpec {
                name: lookup(locale, "chat.estimated_eps"),
                color: ESTIMATED_COLOR,
                points: points(&series.estimated),
            },
        ],
    }
}

/// Headline numbers for the metrics row, derived from the dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurpriseStats {
    pub latest_actual: f64,
    pub last_surprise_pct: f64,
    pub beats: usize,
    pub total: usize,
}

pub fn surprise_stats(series: &EarningsSeries) -> SurpriseStats {
    let n = series.labels.len();
    let beats = series
        .actual
        .iter()
        .zip(&series.estimated)
        .filter(|(actual, estimated)| actual > estimated)
        .count();
    let latest_actual = series.actual[n - 1];
    let latest_estimated = series.estimated[n - 1];
    SurpriseStats {
        latest_actual,
        last_surprise_pct: (latest_actual - latest_estimated) / latest_estimated * 100.0,
        beats,
        total: n,
    }
}

/// Handle to the screen region the chart draws onto. The view layer owns the
/// layout and attaches the current region every frame (detaching when the
/// hosting section is off screen); the occupancy flag is how mounting keeps
/// the one-instance-per-target guarantee observable.
pub struct CanvasTarget {
    area: Cell<Option<Rect>>,
    occupied: Cell<bool>,
}

impl CanvasTarget {
    pub fn new() -> Self {
        Self {
            area: Cell::new(None),
            occupied: Cell::new(false),
        }
    }

    pub fn attach(&self, area: Rect) {
        if area.width == 0 || area.height == 0 {
            self.area.set(None);
        } else {
            self.area.set(Some(area));
        }
    }

    pub fn detach(&self) {
        self.area.set(None);
    }

    pub fn area(&self) -> Option<Rect> {
        self.area.get()
    }

    pub fn is_attached(&self) -> bool {
        self.area.get().is_some()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied.get()
    }
}

impl Default for CanvasTarget {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// The render target is not attached to the screen yet, or another live
    /// instance already owns it. The caller retries on a later render cycle.
    TargetUnavailable,
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetUnavailable => write!(f, "chart render target unavailable"),
        }
    }
}

impl std::error::Error for ChartError {}

/// A live, mounted chart. Exactly one exists per target; the target is
/// released when the instance drops, on every exit path.
pub struct ChartInstance {
    config: ChartConfig,
    target: Rc<CanvasTarget>,
}

impl ChartInstance {
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn area(&self) -> Option<Rect> {
        self.target.area()
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        self.target.occupied.set(false);
    }
}

pub fn mount(target: &Rc<CanvasTarget>, config: ChartConfig) -> Result<ChartInstance, ChartError> {
    if !target.is_attached() || target.is_occupied() {
        return Err(ChartError::TargetUnavailable);
    }
    target.occupied.set(true);
    log_msg("info", "Chart mounted");
    Ok(ChartInstance {
        config,
        target: Rc::clone(target),
    })
}

/// Replace the live instance with one built from `config`. The existing
/// instance releases its target before the new mount acquires it, so the
/// target is never shared between two live instances.
pub fn remount(
    existing: Option<ChartInstance>,
    target: &Rc<CanvasTarget>,
    config: ChartConfig,
) -> Result<ChartInstance, ChartError> {
    drop(existing);
    mount(target, config)
}

pub fn dispose(instance: ChartInstance) {
    log_msg("info", "Chart disposed");
    drop(instance);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached_target() -> Rc<CanvasTarget> {
        let target = Rc::new(CanvasTarget::new());
        target.attach(Rect::new(0, 0, 60, 20));
        target
    }

    #[test]
    fn dataset_is_finite_and_inside_the_y_window() {
        for (actual, estimated) in EARNINGS.actual.iter().zip(&EARNINGS.estimated) {
            assert!(actual.is_finite() && estimated.is_finite());
            assert!(*actual >= Y_BOUNDS[0] && *actual <= Y_BOUNDS[1]);
            assert!(*estimated >= Y_BOUNDS[0] && *estimated <= Y_BOUNDS[1]);
        }
    }

    #[test]
    fn config_is_referentially_stable() {
        let first = build_config(&EARNINGS, Locale::En);
        let second = build_config(&EARNINGS, Locale::En);
        assert_eq!(first, second);
    }

    #[test]
    fn config_carries_locale_bound_series_names() {
        let es = build_config(&EARNINGS, Locale::Es);
        let en = build_config(&EARNINGS, Locale::En);

        assert_eq!(es.series[0].name, "EPS Real");
        assert_eq!(en.series[0].name, "Actual EPS");
        assert_eq!(es.series[1].name, "EPS Estimado");
        assert_eq!(en.series[1].name, "Estimated EPS");
        assert_ne!(es.title, en.title);
    }

    #[test]
    fn config_pins_categories_and_axis_bounds() {
        let config = build_config(&EARNINGS, Locale::Es);
        assert_eq!(config.x_labels, ["Q1 2025", "Q2 2025", "Q3 2025", "Q4 2025"]);
        assert_eq!(config.y_bounds, [0.25, 0.60]);
        assert_eq!(config.y_labels.first().map(String::as_str), Some("$0.25"));
        assert_eq!(config.y_labels.last().map(String::as_str), Some("$0.60"));
        assert_eq!(config.series[0].points[0], (0.0, 0.27));
        assert_eq!(config.series[1].points[3], (3.0, 0.46));
    }

    #[test]
    fn currency_renders_two_decimals_with_dollar_prefix() {
        assert_eq!(currency(0.5), "$0.50");
        assert_eq!(currency(0.27), "$0.27");
        assert_eq!(currency(0.0), "$0.00");
    }

    #[test]
    fn config_formatter_matches_the_currency_contract() {
        let config = build_config(&EARNINGS, Locale::En);
        assert_eq!((config.value_formatter)(0.5), "$0.50");
    }

    #[test]
    fn stats_match_the_dataset() {
        let stats = surprise_stats(&EARNINGS);
        assert_eq!(stats.beats, 1);
        assert_eq!(stats.total, 4);
        assert_eq!(currency(stats.latest_actual), "$0.50");
        assert_eq!(signed_percent(stats.last_surprise_pct), "+8.70%");
    }

    #[test]
    fn mount_fails_before_the_target_attaches() {
        let target = Rc::new(CanvasTarget::new());
        let result = mount(&target, build_config(&EARNINGS, Locale::Es));
        assert!(matches!(result, Err(ChartError::TargetUnavailable)));
        assert!(!target.is_occupied());
    }

    #[test]
    fn a_target_never_hosts_two_live_instances() {
        let target = attached_target();
        let first = mount(&target, build_config(&EARNINGS, Locale::Es)).unwrap();
        assert!(target.is_occupied());

        let second = mount(&target, build_config(&EARNINGS, Locale::En));
        assert!(matches!(second, Err(ChartError::TargetUnavailable)));

        drop(first);
        assert!(!target.is_occupied());
    }

    #[test]
    fn remount_releases_before_acquiring() {
        let target = attached_target();
        let first = mount(&target, build_config(&EARNINGS, Locale::Es)).unwrap();

        // Would fail with TargetUnavailable if the old instance were still
        // holding the target when the new mount runs.
        let second = remount(Some(first), &target, build_config(&EARNINGS, Locale::En)).unwrap();
        assert_eq!(second.config().series[0].name, "Actual EPS");

        let third = remount(Some(second), &target, build_config(&EARNINGS, Locale::Es)).unwrap();
        assert_eq!(third.config().series[0].name, "EPS Real");
        assert!(target.is_occupied());
    }

    #[test]
    fn dispose_frees_the_target_for_the_next_mount() {
        let target = attached_target();
        let instance = mount(&target, build_config(&EARNINGS, Locale::Es)).unwrap();
        dispose(instance);
        assert!(!target.is_occupied());

        assert!(mount(&target, build_config(&EARNINGS, Locale::Es)).is_ok());
    }

    #[test]
    fn dropping_the_instance_releases_on_any_path() {
        let target = attached_target();
        {
            let _instance = mount(&target, build_config(&EARNINGS, Locale::Es)).unwrap();
            assert!(target.is_occupied());
        }
        assert!(!target.is_occupied());
    }

    #[test]
    fn zero_sized_attach_counts_as_detached() {
        let target = Rc::new(CanvasTarget::new());
        target.attach(Rect::new(0, 0, 0, 5));
        assert!(!target.is_attached());

        target.attach(Rect::new(0, 0, 10, 5));
        assert!(target.is_attached());
        target.detach();
        assert!(!target.is_attached());
    }
}
