//! Threshold-colored occupancy chart rendering.
//!
//! Bars are green below the threshold and red at or above it, with a dashed
//! reference line and a min/max/avg overlay. The artifact is a fixed-size
//! SVG, fully overwritten on every render.
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

use crate::store::Reading;

const CHART_SIZE: (u32, u32) = (1400, 600);

const BELOW_COLOR: RGBColor = RGBColor(0x2e, 0xcc, 0x71);
const ABOVE_COLOR: RGBColor = RGBColor(0xe7, 0x4c, 0x3c);
const THRESHOLD_COLOR: RGBColor = RGBColor(0xf3, 0x9c, 0x12);

const X_LABEL_FORMAT: &str = "%m-%d %H:%M";
const TICK_HOURS: i64 = 6;
const BAR_HALF_WIDTH_MINUTES: i64 = 3;

/// Counts at or above the threshold are highlighted.
pub fn is_above_threshold(count: u32, threshold: u32) -> bool {
    count >= threshold
}

/// Summary statistics overlaid on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStats {
    pub min: u32,
    pub max: u32,
    /// Arithmetic mean, rounded to the nearest integer for display.
    pub mean: u32,
}

impl SeriesStats {
    pub fn from_series(series: &[Reading]) -> Option<Self> {
        let first = series.first()?;
        let mut min = first.count;
        let mut max = first.count;
        let mut sum = 0u64;
        for reading in series {
            min = min.min(reading.count);
            max = max.max(reading.count);
            sum += u64::from(reading.count);
        }
        let mean = (sum as f64 / series.len() as f64).round() as u32;
        Some(Self { min, max, mean })
    }
}

/// Chart parameters for one report run.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub threshold: u32,
    pub window_hours: i64,
    pub output: PathBuf,
}

/// What a successful render produced.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub path: PathBuf,
    pub points: usize,
    pub stats: SeriesStats,
}

/// Render the series to the configured path, overwriting any prior artifact.
///
/// An empty series writes nothing and returns `None`.
pub fn render(series: &[Reading], config: &ChartConfig) -> Result<Option<RenderedChart>> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Ok(None);
    };
    let Some(stats) = SeriesStats::from_series(series) else {
        return Ok(None);
    };

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }

    let pad = Duration::minutes(BAR_HALF_WIDTH_MINUTES * 4);
    let x_start = first.timestamp - pad;
    let x_end = last.timestamp + pad;
    let y_end = (f64::from(stats.max.max(config.threshold)) * 1.1).ceil() as u32 + 1;

    let root = SVGBackend::new(&config.output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).context("fill chart background")?;

    let caption = format!("SportLife Gym Load (Last {} Hours)", config.window_hours);
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(RangedDateTime::from(x_start..x_end), 0u32..y_end)
        .context("lay out chart axes")?;

    let span_hours = (x_end - x_start).num_hours().max(1);
    let ticks = usize::try_from(span_hours / TICK_HOURS)
        .unwrap_or(0)
        .clamp(2, 24);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(ticks)
        .x_label_formatter(&|ts| ts.format(X_LABEL_FORMAT).to_string())
        .x_desc("Time")
        .y_desc("People in Gym")
        .label_style(("sans-serif", 14))
        .draw()
        .context("draw chart mesh")?;

    let threshold = config.threshold;
    let below = series
        .iter()
        .filter(|r| !is_above_threshold(r.count, threshold));
    let above = series
        .iter()
        .filter(|r| is_above_threshold(r.count, threshold));

    chart
        .draw_series(below.map(|r| bar(r, BELOW_COLOR)))
        .context("draw below-threshold bars")?
        .label("Below threshold")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BELOW_COLOR.filled()));
    chart
        .draw_series(above.map(|r| bar(r, ABOVE_COLOR)))
        .context("draw above-threshold bars")?
        .label("Above threshold")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], ABOVE_COLOR.filled()));

    chart
        .draw_series(DashedLineSeries::new(
            [(x_start, threshold), (x_end, threshold)],
            8,
            4,
            THRESHOLD_COLOR.stroke_width(2),
        ))
        .context("draw threshold line")?
        .label(format!("Threshold ({threshold})"))
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 14, y)], THRESHOLD_COLOR.stroke_width(2))
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.4))
        .label_font(("sans-serif", 14))
        .draw()
        .context("draw chart legend")?;

    let overlay = format!(
        "Min: {}  |  Max: {}  |  Avg: {}",
        stats.min, stats.max, stats.mean
    );
    root.draw(&Text::new(
        overlay,
        (72, 56),
        ("sans-serif", 16).into_font().color(&BLACK),
    ))
    .context("draw stats overlay")?;

    root.present().context("write chart artifact")?;

    Ok(Some(RenderedChart {
        path: config.output.clone(),
        points: series.len(),
        stats,
    }))
}

fn bar(reading: &Reading, color: RGBColor) -> Rectangle<(NaiveDateTime, u32)> {
    let half = Duration::minutes(BAR_HALF_WIDTH_MINUTES);
    Rectangle::new(
        [
            (reading.timestamp - half, 0),
            (reading.timestamp + half, reading.count),
        ],
        color.mix(0.8).filled(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn reading(hour: u32, minute: u32, count: u32) -> Reading {
        let timestamp = NaiveDate::from_ymd_opt(2025, 3, 10)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time");
        Reading { timestamp, count }
    }

    fn config(output: PathBuf) -> ChartConfig {
        ChartConfig {
            threshold: 140,
            window_hours: 96,
            output,
        }
    }

    #[test]
    fn classification_is_inclusive_at_the_threshold() {
        assert!(!is_above_threshold(139, 140));
        assert!(is_above_threshold(140, 140));
        assert!(is_above_threshold(141, 140));
    }

    #[test]
    fn stats_cover_min_max_and_rounded_mean() {
        let series = [reading(8, 0, 100), reading(9, 0, 120), reading(10, 0, 170)];
        let stats = SeriesStats::from_series(&series).expect("stats");
        assert_eq!(
            stats,
            SeriesStats {
                min: 100,
                max: 170,
                mean: 130
            }
        );
    }

    #[test]
    fn mean_rounds_to_nearest_integer() {
        let series = [reading(8, 0, 100), reading(9, 0, 105)];
        let stats = SeriesStats::from_series(&series).expect("stats");
        assert_eq!(stats.mean, 103);
    }

    #[test]
    fn empty_series_writes_no_artifact() {
        let dir = tempdir().expect("create scratch dir");
        let output = dir.path().join("chart.svg");
        let rendered = render(&[], &config(output.clone())).expect("render");
        assert!(rendered.is_none());
        assert!(!output.exists());
    }

    #[test]
    fn render_overwrites_the_artifact() {
        let dir = tempdir().expect("create scratch dir");
        let output = dir.path().join("chart.svg");
        fs::write(&output, "stale artifact").expect("seed stale artifact");

        let series = [reading(8, 0, 120), reading(12, 0, 150), reading(16, 0, 90)];
        let rendered = render(&series, &config(output.clone()))
            .expect("render")
            .expect("chart for non-empty series");

        assert_eq!(rendered.points, 3);
        assert_eq!(rendered.path, output);
        let contents = fs::read_to_string(&output).expect("read artifact");
        assert_ne!(contents, "stale artifact");
        assert!(contents.contains("<svg"));
    }

    #[test]
    fn single_point_series_renders() {
        let dir = tempdir().expect("create scratch dir");
        let output = dir.path().join("chart.svg");
        let rendered = render(&[reading(8, 0, 140)], &config(output.clone()))
            .expect("render")
            .expect("chart for non-empty series");
        assert_eq!(rendered.points, 1);
        assert!(output.is_file());
    }
}
