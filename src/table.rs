use std::{collections::BTreeSet, io, path::Path};

use anyhow::{Context, Result};
use geo::Point;

/// French operator codes (MCC 208 + MNC) to display names.
pub fn operator_name(code: u32) -> Option<&'static str> {
    match code {
        20801 => Some("Orange"),
        20810 => Some("SFR"),
        20815 => Some("Free"),
        20820 => Some("Bouygue"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Tower {
    pub operator: u32,
    pub position: Point,
    /// One flag per network, aligned with `TowerTable::networks`.
    pub coverage: Vec<bool>,
}

/// The full tower dataset, loaded once at startup and shared read-only
/// across requests.
#[derive(Debug)]
pub struct TowerTable {
    networks: Vec<String>,
    towers: Vec<Tower>,
    operators: BTreeSet<u32>,
}

impl TowerTable {
    /// Loads a `;`-delimited CSV with `Operateur`, `Latitude` and
    /// `Longitude` columns; every other column is treated as a 0/1
    /// network-coverage flag. Missing required columns are fatal, rows
    /// with unparseable numbers are skipped (the upstream dataset has
    /// stray NA rows).
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_path(path)
            .with_context(|| format!("Failed to open dataset {}", path.display()))?;
        Self::from_csv(reader)
    }

    pub fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("dataset is missing the {name:?} column"))
        };
        let operator_col = column("Operateur")?;
        let lat_col = column("Latitude")?;
        let lon_col = column("Longitude")?;

        let mut networks = Vec::new();
        let mut network_cols = Vec::new();
        for (i, header) in headers.iter().enumerate() {
            if i != operator_col && i != lat_col && i != lon_col {
                networks.push(header.to_string());
                network_cols.push(i);
            }
        }

        let mut towers = Vec::new();
        let mut skipped = 0usize;
        for result in reader.records() {
            let record = result?;
            match parse_row(&record, operator_col, lat_col, lon_col, &network_cols) {
                Some(tower) => towers.push(tower),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("skipped {skipped} rows with unparseable fields");
        }

        let operators = towers.iter().map(|t| t.operator).collect();
        Ok(TowerTable {
            networks,
            towers,
            operators,
        })
    }

    pub fn new(networks: Vec<String>, towers: Vec<Tower>) -> Self {
        let operators = towers.iter().map(|t| t.operator).collect();
        TowerTable {
            networks,
            towers,
            operators,
        }
    }

    /// Network labels in dataset column order.
    pub fn networks(&self) -> &[String] {
        &self.networks
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    /// Distinct operator codes present anywhere in the table.
    pub fn operators(&self) -> &BTreeSet<u32> {
        &self.operators
    }
}

fn parse_row(
    record: &csv::StringRecord,
    operator_col: usize,
    lat_col: usize,
    lon_col: usize,
    network_cols: &[usize],
) -> Option<Tower> {
    let operator = record.get(operator_col)?.trim().parse().ok()?;
    // "NaN" and "inf" parse as f64; a non-finite coordinate would poison
    // every distance computed against it, so such rows are bad data too
    let lat: f64 = record.get(lat_col)?.trim().parse().ok().filter(|v: &f64| v.is_finite())?;
    let lon: f64 = record.get(lon_col)?.trim().parse().ok().filter(|v: &f64| v.is_finite())?;

    let mut coverage = Vec::with_capacity(network_cols.len());
    for &col in network_cols {
        let flag: u8 = record.get(col)?.trim().parse().ok()?;
        coverage.push(flag != 0);
    }

    Some(Tower {
        operator,
        position: Point::new(lon, lat),
        coverage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(data.as_bytes())
    }

    #[test]
    fn loads_rows_and_discovers_networks() {
        let data = "Operateur;Latitude;Longitude;2G;3G;4G\n\
                    20801;47.31;5.03;1;1;1\n\
                    20815;47.32;5.04;0;1;1\n";
        let table = TowerTable::from_csv(reader(data)).unwrap();
        assert_eq!(table.networks(), ["2G", "3G", "4G"]);
        assert_eq!(table.towers().len(), 2);
        assert_eq!(table.operators().len(), 2);
        assert_eq!(table.towers()[1].coverage, vec![false, true, true]);
        assert_eq!(table.towers()[0].position, Point::new(5.03, 47.31));
    }

    #[test]
    fn missing_column_is_fatal() {
        let data = "Operateur;x;y;2G\n20801;1;2;1\n";
        let err = TowerTable::from_csv(reader(data)).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn non_finite_coordinates_are_skipped() {
        let data = "Operateur;Latitude;Longitude;2G;3G;4G\n\
                    20801;NaN;NaN;1;1;1\n\
                    20810;inf;5.03;1;1;1\n\
                    20815;47.31;5.03;0;1;1\n";
        let table = TowerTable::from_csv(reader(data)).unwrap();
        assert_eq!(table.towers().len(), 1);
        assert_eq!(table.towers()[0].operator, 20815);
    }

    #[test]
    fn unparseable_rows_are_skipped() {
        let data = "Operateur;Latitude;Longitude;2G;3G;4G\n\
                    20801;NA;NA;1;1;1\n\
                    20810;47.31;5.03;1;0;1\n";
        let table = TowerTable::from_csv(reader(data)).unwrap();
        assert_eq!(table.towers().len(), 1);
        assert_eq!(table.towers()[0].operator, 20810);
    }

    #[test]
    fn directory_covers_the_four_operators() {
        assert_eq!(operator_name(20801), Some("Orange"));
        assert_eq!(operator_name(20810), Some("SFR"));
        assert_eq!(operator_name(20815), Some("Free"));
        assert_eq!(operator_name(20820), Some("Bouygue"));
        assert_eq!(operator_name(20899), None);
    }
}
