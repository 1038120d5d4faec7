//! Offline dataset preparation: turns the raw government tower export
//! (Lambert-93 meters, stray NA rows) into the runtime CSV with WGS84
//! `Latitude`/`Longitude` columns. Not part of the request path.

use std::{
    f64::consts::{FRAC_PI_2, FRAC_PI_4},
    io,
    path::Path,
};

use anyhow::{Context, Result};

// RGF93 / Lambert-93 (EPSG:2154) on the GRS80 ellipsoid.
const A: f64 = 6_378_137.0;
const E: f64 = 0.081_819_191_042_816;
const LAT_0: f64 = 46.5;
const LAT_1: f64 = 44.0;
const LAT_2: f64 = 49.0;
const LON_0: f64 = 3.0;
const X_0: f64 = 700_000.0;
const Y_0: f64 = 6_600_000.0;

fn m(phi: f64) -> f64 {
    phi.cos() / (1.0 - E * E * phi.sin() * phi.sin()).sqrt()
}

fn t(phi: f64) -> f64 {
    let es = E * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(E / 2.0)
}

/// Inverse Lambert conformal conic: projected meters to WGS84 degrees.
pub fn lambert93_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let (lat0, lat1, lat2) = (LAT_0.to_radians(), LAT_1.to_radians(), LAT_2.to_radians());

    let n = (m(lat1).ln() - m(lat2).ln()) / (t(lat1).ln() - t(lat2).ln());
    let f = m(lat1) / (n * t(lat1).powf(n));
    let rho0 = A * f * t(lat0).powf(n);

    let dx = x - X_0;
    let dy = rho0 - (y - Y_0);
    let rho = (dx * dx + dy * dy).sqrt();
    let theta = dx.atan2(dy);

    let lon = (theta / n).to_degrees() + LON_0;

    let ti = (rho / (A * f)).powf(1.0 / n);
    let mut lat = FRAC_PI_2 - 2.0 * ti.atan();
    for _ in 0..8 {
        let es = E * lat.sin();
        lat = FRAC_PI_2 - 2.0 * (ti * ((1.0 - es) / (1.0 + es)).powf(E / 2.0)).atan();
    }

    (lat.to_degrees(), lon)
}

pub fn run(input: &Path, output: &Path) -> Result<()> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let (written, dropped) = convert(reader, writer)?;
    log::info!("wrote {written} rows, dropped {dropped}");
    Ok(())
}

/// Rewrites `x`/`y` (Lambert-93) as `Latitude`/`Longitude`, passing all
/// other columns through. Rows with non-numeric coordinates are
/// dropped.
fn convert<R: io::Read, W: io::Write>(
    mut reader: csv::Reader<R>,
    mut writer: csv::Writer<W>,
) -> Result<(usize, usize)> {
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("input is missing the {name:?} column"))
    };
    let x_col = column("x")?;
    let y_col = column("y")?;

    let out_headers: Vec<&str> = headers
        .iter()
        .map(|h| match h {
            "x" => "Latitude",
            "y" => "Longitude",
            other => other,
        })
        .collect();
    writer.write_record(&out_headers)?;

    let mut written = 0;
    let mut dropped = 0;
    for result in reader.records() {
        let record = result?;
        let coords = record
            .get(x_col)
            .and_then(|x| x.trim().parse::<f64>().ok())
            .zip(record.get(y_col).and_then(|y| y.trim().parse::<f64>().ok()));
        let Some((x, y)) = coords else {
            dropped += 1;
            continue;
        };

        let (lat, lon) = lambert93_to_wgs84(x, y);
        let row: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(i, field)| {
                if i == x_col {
                    format!("{lat}")
                } else if i == y_col {
                    format!("{lon}")
                } else {
                    field.to_string()
                }
            })
            .collect();
        writer.write_record(&row)?;
        written += 1;
    }
    writer.flush()?;

    Ok((written, dropped))
}
