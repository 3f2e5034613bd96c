//! Append-only per-day occupancy partitions.
//!
//! One CSV file per local calendar date, named `YYYY-MM-DD.csv`, holding a
//! `time,count` header followed by `HH:MM,<count>` rows in insertion order.
//! Files are only ever appended to; an interrupted run can at worst leave a
//! truncated final line, which the loader skips.
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const PARTITION_EXT: &str = "csv";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// One occupancy sample at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub count: u32,
}

impl Reading {
    /// Build a reading, truncating the timestamp to the minute the log stores.
    pub fn at_minute(timestamp: NaiveDateTime, count: u32) -> Self {
        let timestamp = timestamp
            .with_second(0)
            .and_then(|ts| ts.with_nanosecond(0))
            .unwrap_or(timestamp);
        Self { timestamp, count }
    }
}

/// CSV row layout; the date half of the timestamp lives in the filename.
#[derive(Serialize)]
struct Row<'a> {
    time: &'a str,
    count: u32,
}

/// A directory of per-day partitions.
pub struct PartitionStore {
    root: PathBuf,
}

impl PartitionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Partition file backing the given date.
    pub fn partition_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(format!("{}.{PARTITION_EXT}", date.format(DATE_FORMAT)))
    }

    /// Append one reading to the partition for its date, creating the store
    /// directory and the header row as needed.
    pub fn append(&self, reading: &Reading) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create {}", self.root.display()))?;
        let path = self.partition_path(reading.timestamp.date());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        let is_empty = file
            .metadata()
            .with_context(|| format!("stat {}", path.display()))?
            .len()
            == 0;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        let time = reading.timestamp.format(TIME_FORMAT).to_string();
        writer
            .serialize(Row {
                time: &time,
                count: reading.count,
            })
            .with_context(|| format!("append to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flush {}", path.display()))?;
        Ok(path)
    }

    /// Load every reading within `[now - window, now]`, oldest first.
    ///
    /// Partitions are visited in date order and each partition's rows are
    /// already chronological, so the combined sequence needs no sort. Rows
    /// that fail to parse are skipped rather than failing the whole load.
    pub fn load_window(&self, now: NaiveDateTime, window: Duration) -> Result<Vec<Reading>> {
        let cutoff = now - window;
        let mut readings = Vec::new();
        if !self.exists() {
            return Ok(readings);
        }
        for (date, path) in self.partitions()? {
            // Coarse pre-filter; the per-row check below is authoritative.
            if date < cutoff.date() - Duration::days(1) {
                tracing::debug!(file = %path.display(), "partition predates window");
                continue;
            }
            load_partition(&path, date, cutoff, now, &mut readings)?;
        }
        Ok(readings)
    }

    /// Partition files with a parseable date stem, sorted by date.
    fn partitions(&self) -> Result<Vec<(NaiveDate, PathBuf)>> {
        let mut partitions = Vec::new();
        let entries =
            fs::read_dir(&self.root).with_context(|| format!("read {}", self.root.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("read {}", self.root.display()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PARTITION_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match NaiveDate::parse_from_str(stem, DATE_FORMAT) {
                Ok(date) => partitions.push((date, path)),
                Err(_) => {
                    tracing::debug!(file = %path.display(), "skipping non-partition file");
                }
            }
        }
        partitions.sort();
        Ok(partitions)
    }
}

fn load_partition(
    path: &Path,
    date: NaiveDate,
    cutoff: NaiveDateTime,
    now: NaiveDateTime,
    readings: &mut Vec<Reading>,
) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    for record in reader.records() {
        let Ok(record) = record else {
            tracing::debug!(file = %path.display(), "skipping unreadable row");
            continue;
        };
        let Some(reading) = parse_row(&record, date) else {
            tracing::debug!(file = %path.display(), row = ?record, "skipping malformed row");
            continue;
        };
        if reading.timestamp >= cutoff && reading.timestamp <= now {
            readings.push(reading);
        }
    }
    Ok(())
}

/// Parse one `HH:MM,<count>` record against its partition date.
fn parse_row(record: &csv::StringRecord, date: NaiveDate) -> Option<Reading> {
    let time = NaiveTime::parse_from_str(record.get(0)?.trim(), TIME_FORMAT).ok()?;
    let count = record.get(1)?.trim().parse::<u32>().ok()?;
    Some(Reading {
        timestamp: date.and_time(time),
        count,
    })
}
