use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::Serialize;

use crate::error::{MalformedTimestampError, RecordDiagnostic};
use crate::models::{NormalizedPublication, PublicationTimestamp, PublicationType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Window {
    LastWeek,
    LastMonth,
    LastYear,
    #[serde(rename = "last5Years")]
    Last5Years,
    Overall,
}

impl Window {
    /// Narrowest first; every window contains the ones before it.
    pub const ALL: [Window; 5] = [
        Window::LastWeek,
        Window::LastMonth,
        Window::LastYear,
        Window::Last5Years,
        Window::Overall,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Window::LastWeek => "Last Week",
            Window::LastMonth => "Last Month",
            Window::LastYear => "Last Year",
            Window::Last5Years => "Last 5 Years",
            Window::Overall => "Overall",
        }
    }

    pub fn lookback_days(&self) -> Option<i64> {
        match self {
            Window::LastWeek => Some(7),
            Window::LastMonth => Some(30),
            Window::LastYear => Some(365),
            Window::Last5Years => Some(5 * 365),
            Window::Overall => None,
        }
    }

    /// `None` when the window has no representable lower bound: always for
    /// `Overall`, and for bounded windows whose start would precede
    /// `DateTime::MIN_UTC`.
    pub fn lower_bound(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.lookback_days()
            .and_then(|days| now.checked_sub_signed(Duration::days(days)))
    }

    /// Whether a parsed timestamp falls in `[lower_bound, now]`.
    pub fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if *self == Window::Overall {
            return true;
        }
        let after_start = self.lower_bound(now).map_or(true, |lower| lower <= at);
        after_start && at <= now
    }
}

pub type TypeTotals = BTreeMap<PublicationType, f64>;

fn zeroed_totals() -> TypeTotals {
    PublicationType::ALL
        .into_iter()
        .map(|kind| (kind, 0.0))
        .collect()
}

/// Per-type totals for every window. Every publication type is present in
/// every window, zero included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    #[serde(rename = "lastWeek")]
    pub last_week: TypeTotals,
    #[serde(rename = "lastMonth")]
    pub last_month: TypeTotals,
    #[serde(rename = "lastYear")]
    pub last_year: TypeTotals,
    #[serde(rename = "last5Years")]
    pub last_5_years: TypeTotals,
    pub overall: TypeTotals,
}

impl Default for WindowSummary {
    fn default() -> Self {
        Self {
            last_week: zeroed_totals(),
            last_month: zeroed_totals(),
            last_year: zeroed_totals(),
            last_5_years: zeroed_totals(),
            overall: zeroed_totals(),
        }
    }
}

impl WindowSummary {
    pub fn window(&self, window: Window) -> &TypeTotals {
        match window {
            Window::LastWeek => &self.last_week,
            Window::LastMonth => &self.last_month,
            Window::LastYear => &self.last_year,
            Window::Last5Years => &self.last_5_years,
            Window::Overall => &self.overall,
        }
    }

    fn window_mut(&mut self, window: Window) -> &mut TypeTotals {
        match window {
            Window::LastWeek => &mut self.last_week,
            Window::LastMonth => &mut self.last_month,
            Window::LastYear => &mut self.last_year,
            Window::Last5Years => &mut self.last_5_years,
            Window::Overall => &mut self.overall,
        }
    }

    pub fn get(&self, window: Window, kind: PublicationType) -> f64 {
        self.window(window).get(&kind).copied().unwrap_or(0.0)
    }

    fn add(&mut self, window: Window, kind: PublicationType, weight: f64) {
        *self.window_mut(window).entry(kind).or_insert(0.0) += weight;
    }

    pub fn window_total(&self, window: Window) -> f64 {
        self.window(window).values().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublicationSummary {
    pub windows: WindowSummary,
    /// Records whose timestamp could not be parsed; they count in
    /// `overall` only.
    pub malformed: Vec<RecordDiagnostic>,
}

/// Accumulates publication weights into the rolling windows ending at `now`.
pub fn summarize(publications: &[NormalizedPublication], now: DateTime<Utc>) -> PublicationSummary {
    let mut windows = WindowSummary::default();
    let mut malformed = Vec::new();

    for publication in publications {
        let kind = publication.publication_type;
        windows.add(Window::Overall, kind, publication.weight);

        let at = match &publication.timestamp {
            PublicationTimestamp::Parsed(at) => *at,
            PublicationTimestamp::Malformed { raw } => {
                warn!(
                    "record {}: malformed timestamp `{}`, counted in overall only",
                    publication.position, raw
                );
                malformed.push(RecordDiagnostic::new(
                    publication.position,
                    MalformedTimestampError { raw: raw.clone() },
                ));
                continue;
            }
        };

        for window in Window::ALL {
            if window != Window::Overall && window.contains(at, now) {
                windows.add(window, kind, publication.weight);
            }
        }
    }

    debug!(
        "summarized {} publications as of {} ({} malformed timestamps)",
        publications.len(),
        now,
        malformed.len()
    );

    PublicationSummary { windows, malformed }
}
