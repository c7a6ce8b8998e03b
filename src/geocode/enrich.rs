use crate::config::Settings;
use crate::error::{AcquireError, Result};
use crate::geocode::Geocoder;
use crate::table::Table;
use std::fs;
use tracing::info;

pub const LOCATIONS_FILE: &str = "GPS Locations.csv";
pub const ENRICHED_FILE: &str = "Full Location Data.csv";

const AIRPORT_COLUMN: &str = "Airport";
const LAT_COLUMN: &str = "Lat";
const LON_COLUMN: &str = "Lon";
const COUNTY_COLUMN: &str = "County";

fn required_column(table: &Table, file: &str, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| AcquireError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
}

fn is_airport(field: &str) -> bool {
    let f = field.trim();
    f.eq_ignore_ascii_case("true") || f == "1"
}

/// Missing or unparseable coordinates become 0.0: the lookup is then
/// geographically meaningless but still answerable, and the row survives.
fn parse_coordinate(field: &str) -> f64 {
    field.trim().parse().unwrap_or(0.0)
}

/// Split rows into (ground, airport) partitions on the `Airport` flag,
/// keeping the original row order within each partition.
pub fn partition_by_airport(table: &Table, file: &str) -> Result<(Table, Table)> {
    let airport = required_column(table, file, AIRPORT_COLUMN)?;

    let mut ground = Table::new(table.headers.clone());
    let mut air = Table::new(table.headers.clone());
    for row in &table.rows {
        let flagged = row.get(airport).map(|f| is_airport(f)).unwrap_or(false);
        if flagged {
            air.rows.push(row.clone());
        } else {
            ground.rows.push(row.clone());
        }
    }
    Ok((ground, air))
}

/// The (lat, lon) pair for every row, in row order.
pub fn coordinates(table: &Table, file: &str) -> Result<Vec<(f64, f64)>> {
    let lat = required_column(table, file, LAT_COLUMN)?;
    let lon = required_column(table, file, LON_COLUMN)?;

    Ok(table
        .rows
        .iter()
        .map(|row| {
            let field = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
            (parse_coordinate(field(lat)), parse_coordinate(field(lon)))
        })
        .collect())
}

async fn county_column(geocoder: &Geocoder, coords: &[(f64, f64)]) -> Result<Vec<String>> {
    let mut counties = Vec::with_capacity(coords.len());
    for &(lat, lon) in coords {
        let county = geocoder.reverse_county(lat, lon).await?;
        counties.push(county.unwrap_or_default());
    }
    Ok(counties)
}

/// Read the locations table, attach a `County` column via one reverse lookup
/// per row, and write the merged table (ground rows first, then airports)
/// back to storage. A lookup that still fails after retries aborts the run.
pub async fn enrich_locations(settings: &Settings, geocoder: &Geocoder) -> Result<()> {
    let input = settings.storage_dir.join(LOCATIONS_FILE);
    let table = Table::read_csv(&input)?;
    info!(rows = table.len(), file = %input.display(), "loaded locations");

    let (mut ground, mut air) = partition_by_airport(&table, LOCATIONS_FILE)?;
    info!(ground = ground.len(), airports = air.len(), "partitioned");

    let ground_counties = county_column(geocoder, &coordinates(&ground, LOCATIONS_FILE)?).await?;
    ground.push_column(COUNTY_COLUMN, ground_counties);

    let air_counties = county_column(geocoder, &coordinates(&air, LOCATIONS_FILE)?).await?;
    air.push_column(COUNTY_COLUMN, air_counties);

    let mut merged = ground;
    merged.append(air);

    fs::create_dir_all(&settings.storage_dir)?;
    let output = settings.storage_dir.join(ENRICHED_FILE);
    merged.write_csv(&output)?;
    info!(rows = merged.len(), file = %output.display(), "wrote enriched locations");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations() -> Table {
        Table {
            headers: vec![
                "Name".into(),
                "Lat".into(),
                "Lon".into(),
                "Airport".into(),
            ],
            rows: vec![
                vec!["depot".into(), "39.1".into(), "-84.5".into(), "False".into()],
                vec!["CVG".into(), "39.0".into(), "-84.7".into(), "True".into()],
                vec!["yard".into(), "".into(), "".into(), "False".into()],
                vec!["LEX".into(), "38.0".into(), "-84.6".into(), "TRUE".into()],
            ],
        }
    }

    #[test]
    fn partition_keeps_order_and_every_row() {
        let table = locations();
        let (ground, air) = partition_by_airport(&table, "test.csv").unwrap();
        assert_eq!(ground.len() + air.len(), table.len());
        assert_eq!(ground.rows[0][0], "depot");
        assert_eq!(ground.rows[1][0], "yard");
        assert_eq!(air.rows[0][0], "CVG");
        assert_eq!(air.rows[1][0], "LEX");
    }

    #[test]
    fn missing_airport_column_is_reported() {
        let table = Table::new(vec!["Lat".into(), "Lon".into()]);
        let err = partition_by_airport(&table, "test.csv").unwrap_err();
        assert!(matches!(
            err,
            AcquireError::MissingColumn { ref column, .. } if column == "Airport"
        ));
    }

    #[test]
    fn blank_coordinates_fall_back_to_zero() {
        let table = locations();
        let coords = coordinates(&table, "test.csv").unwrap();
        assert_eq!(coords[0], (39.1, -84.5));
        assert_eq!(coords[2], (0.0, 0.0));
    }

    #[test]
    fn reassembly_preserves_row_count_and_adds_county() {
        let table = locations();
        let (mut ground, mut air) = partition_by_airport(&table, "test.csv").unwrap();

        let blank = |t: &Table| vec![String::new(); t.len()];
        let g = blank(&ground);
        ground.push_column(COUNTY_COLUMN, g);
        let a = blank(&air);
        air.push_column(COUNTY_COLUMN, a);

        let mut merged = ground;
        merged.append(air);

        assert_eq!(merged.len(), table.len());
        assert_eq!(merged.headers.last().map(String::as_str), Some("County"));
        // ground rows come first, airports after.
        assert_eq!(merged.rows[0][0], "depot");
        assert_eq!(merged.rows[2][0], "CVG");
    }
}
