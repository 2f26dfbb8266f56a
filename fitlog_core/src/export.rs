//! CSV export of daily records.
//!
//! One row per calendar day with every catalog exercise's quantity and the
//! day's total energy. Days without a record are written as zeros so the
//! file has no gaps.

use crate::aggregate::{daily_total_energy, StatsContext};
use crate::calendar::{date_key, window_ending};
use crate::Records;
use crate::Result;
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;

/// Write `days` days ending at `end` to `path`, returning the row count
///
/// The file is replaced if it exists, and synced to disk before returning.
pub fn export_csv(
    records: &Records,
    end: NaiveDate,
    days: u32,
    ctx: &StatsContext<'_>,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new().from_writer(file);

    let mut header = vec!["date".to_string()];
    header.extend(ctx.catalog.iter().map(|e| e.key.clone()));
    header.push("total_kcal".into());
    writer.write_record(&header)?;

    let dates = window_ending(end, days);
    for &date in &dates {
        let record = records.get(&date);
        let mut row = vec![date_key(date)];
        row.extend(
            ctx.catalog
                .iter()
                .map(|e| record.map_or(0.0, |r| r.quantity(&e.key)).to_string()),
        );
        row.push(format!("{:.2}", daily_total_energy(records, date, ctx)));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} days to {:?}", dates.len(), path);
    Ok(dates.len())
}
