//! Trend chart of a run's changes

use crate::context::date_stamp;
use crate::error::{DeltaError, Result};
use crate::record::{ChangeIndicator, DeltaSet};
use crate::snapshot::SnapshotLoader;
use chrono::NaiveDate;
use indexmap::IndexMap;
use plotters::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix of a rendered chart
pub const CHART_PREFIX: &str = "CustomerTrendAnalysis_";
pub const CHART_EXTENSION: &str = "svg";

pub const CHART_CAPTION: &str = "Customer trend analysis for the day";
pub const X_AXIS_TITLE: &str = "Insert/Update/Delete customers per day";
pub const Y_AXIS_TITLE: &str = "No. of customers";

const CHART_SIZE: (u32, u32) = (800, 600);

/// One bar per indicator, left to right
const BARS: [ChangeIndicator; 3] = [
    ChangeIndicator::Insert,
    ChangeIndicator::Update,
    ChangeIndicator::Delete,
];

/// Reporting category derived from a record's source id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CustomerCategory {
    OnlineCustomers,
    OfflineCustomers,
}

impl CustomerCategory {
    pub fn of(source_id: i64, online_source_id: i64) -> Self {
        if source_id == online_source_id {
            Self::OnlineCustomers
        } else {
            Self::OfflineCustomers
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OnlineCustomers => "OnlineCustomers",
            Self::OfflineCustomers => "OfflineCustomers",
        }
    }

    fn color(self) -> RGBColor {
        match self {
            Self::OnlineCustomers => RGBColor(31, 119, 180),
            Self::OfflineCustomers => RGBColor(255, 127, 14),
        }
    }
}

impl fmt::Display for CustomerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Record counts per (indicator, category), in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeTally {
    counts: IndexMap<(ChangeIndicator, CustomerCategory), usize>,
}

impl ChangeTally {
    pub fn from_delta(delta: &DeltaSet, online_source_id: i64) -> Self {
        let mut counts = IndexMap::new();
        for classified in &delta.records {
            let category = CustomerCategory::of(classified.record.source_id, online_source_id);
            *counts.entry((classified.change, category)).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, change: ChangeIndicator, category: CustomerCategory) -> usize {
        self.counts.get(&(change, category)).copied().unwrap_or(0)
    }

    pub fn entries(&self) -> impl Iterator<Item = (ChangeIndicator, CustomerCategory, usize)> + '_ {
        self.counts
            .iter()
            .map(|(&(change, category), &count)| (change, category, count))
    }

    /// Categories in the order they were first seen
    pub fn categories(&self) -> Vec<CustomerCategory> {
        let mut categories = Vec::new();
        for (_, category) in self.counts.keys() {
            if !categories.contains(category) {
                categories.push(*category);
            }
        }
        categories
    }

    /// Height of the stacked bar for an indicator
    pub fn bar_total(&self, change: ChangeIndicator) -> usize {
        self.entries()
            .filter(|(c, _, _)| *c == change)
            .map(|(_, _, count)| count)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Renders the stacked bar chart for a delta
pub struct TrendReporter {
    online_source_id: i64,
}

impl TrendReporter {
    pub fn new(online_source_id: i64) -> Self {
        Self { online_source_id }
    }

    pub fn chart_path(plot_dir: &Path, run_date: NaiveDate) -> PathBuf {
        plot_dir.join(format!(
            "{}{}.{}",
            CHART_PREFIX,
            date_stamp(run_date),
            CHART_EXTENSION
        ))
    }

    /// Read a delta file back and chart it
    pub fn report_delta_file(&self, delta_path: &Path, output: &Path) -> Result<ChangeTally> {
        log::info!("Delta file consumed for reporting: {}", delta_path.display());
        let delta = SnapshotLoader::new()?.load_delta(delta_path)?;
        let tally = ChangeTally::from_delta(&delta, self.online_source_id);

        for (change, category, count) in tally.entries() {
            log::debug!("{} {}: {}", change, category, count);
        }

        self.render(&tally, output)?;
        log::info!("Trend chart written to {}", output.display());
        Ok(tally)
    }

    pub fn render(&self, tally: &ChangeTally, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tallest = BARS.iter().map(|c| tally.bar_total(*c)).max().unwrap_or(0) as u32;
        let y_max = tallest + tallest / 10 + 1;

        let root = SVGBackend::new(output, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(CHART_CAPTION, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((0..BARS.len() as i32).into_segmented(), 0u32..y_max)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(X_AXIS_TITLE)
            .y_desc(Y_AXIS_TITLE)
            .x_labels(BARS.len())
            .x_label_formatter(&|v| bar_label(v))
            .draw()
            .map_err(draw_error)?;

        let categories = tally.categories();
        let mut stacked = [0u32; BARS.len()];

        for category in &categories {
            let color = category.color();
            let mut bars = Vec::new();

            for (i, change) in BARS.iter().enumerate() {
                let count = tally.get(*change, *category) as u32;
                if count == 0 {
                    continue;
                }
                let bottom = stacked[i];
                stacked[i] += count;

                let x = i as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(x), bottom),
                        (SegmentValue::Exact(x + 1), stacked[i]),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 20, 20);
                bars.push(bar);
            }

            chart
                .draw_series(bars)
                .map_err(draw_error)?
                .label(category.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        if !categories.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
        Ok(())
    }
}

fn bar_label(value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => BARS
            .get(*i as usize)
            .map(|c| c.label().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn draw_error<E: fmt::Display>(error: E) -> DeltaError {
    DeltaError::report(error.to_string())
}
