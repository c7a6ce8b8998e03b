use crate::config::Settings;
use crate::error::{AcquireError, Result};
use crate::labor::series::SeriesRow;
use crate::labor::states::{intermediate_name, series_id, Period, PERIODS, STATE_DIRECTORY};
use crate::table::Table;
use csv::WriterBuilder;
use std::{fs, path::Path};
use tracing::{info, warn};

pub const MERGED_FILE: &str = "State Characteristics.csv";

const STATE_ID_COLUMN: &str = "StateID";
const STATE_CODE_COLUMN: &str = "StateCode";
const LATEST_COLUMN: &str = "latest";

/// Every intermediate carries this exact header, whether or not any row in
/// it has a `latest` marker.
pub const INTERMEDIATE_HEADERS: [&str; 4] = ["year", "period", "latest", "value"];

/// Persist one (state, period) batch of rows as a scratch CSV.
pub fn write_intermediate(path: &Path, rows: &[SeriesRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// What a merge pass did, for the run summary.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Rows in the final table.
    pub rows: usize,
    /// States that contributed at least one row.
    pub states_merged: usize,
    /// (state number, period) pairs with no intermediate on disk.
    pub missing: Vec<(String, Period)>,
    /// Intermediates deleted after the final table was written.
    pub removed_files: usize,
}

/// Reload every intermediate that exists, tag rows with their state identity,
/// concatenate everything into one table, drop the `latest` marker, write the
/// final CSV to storage, then delete the merged intermediates.
///
/// States and periods with no intermediate contribute zero rows; they are
/// reported instead of silently shrinking the output.
pub fn merge_intermediates(settings: &Settings) -> Result<MergeReport> {
    let expected: Vec<String> = INTERMEDIATE_HEADERS.iter().map(|h| h.to_string()).collect();
    let mut headers = expected.clone();
    headers.push(STATE_ID_COLUMN.to_string());
    headers.push(STATE_CODE_COLUMN.to_string());

    let mut combined = Table::new(headers);
    let mut report = MergeReport::default();
    let mut merged_paths = Vec::new();

    for &(number, code) in STATE_DIRECTORY {
        let mut state_rows = 0;
        for &period in PERIODS {
            let path = settings.work_dir.join(intermediate_name(number, period));
            if !path.exists() {
                warn!(
                    state = number,
                    start = period.start_year,
                    end = period.end_year,
                    "no intermediate to merge"
                );
                report.missing.push((number.to_string(), period));
                continue;
            }

            let mut part = Table::read_csv(&path)?;
            if part.headers != expected {
                return Err(AcquireError::Malformed(format!(
                    "unexpected columns {:?} in {}",
                    part.headers,
                    path.display()
                )));
            }

            part.push_column(STATE_ID_COLUMN, vec![series_id(number); part.len()]);
            part.push_column(STATE_CODE_COLUMN, vec![code.to_string(); part.len()]);
            state_rows += part.len();
            combined.append(part);
            merged_paths.push(path);
        }
        if state_rows > 0 {
            report.states_merged += 1;
        }
    }

    combined.drop_column(LATEST_COLUMN);
    report.rows = combined.len();

    fs::create_dir_all(&settings.storage_dir)?;
    let output = settings.storage_dir.join(MERGED_FILE);
    combined.write_csv(&output)?;
    info!(
        rows = report.rows,
        states = report.states_merged,
        file = %output.display(),
        "wrote merged table"
    );

    for path in merged_paths {
        fs::remove_file(&path)?;
        report.removed_files += 1;
    }

    Ok(report)
}
