//! Flat point-list files.
//!
//! Format: one point per line, `x\ty`, no header. Reading is token based,
//! so any whitespace separates coordinates; the first token that is not a
//! finite number ends the list (a dangling `x` without `y` is dropped).
//! Importing replaces the whole point sequence.
//!
//! Tangent files use the same layout with four columns per knot:
//! `in_x\tin_y\tout_x\tout_y`. They are read strictly, line by line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::domain::{Point, Tangent};
use crate::error::AppError;
use crate::spline::TangentPair;

/// Read points until end of input or the first malformed token.
pub fn read_points<R: BufRead>(reader: R) -> std::io::Result<Vec<Point>> {
    let mut values = Vec::new();
    'lines: for line in reader.lines() {
        let line = line?;
        for token in line.split_whitespace() {
            match token.parse::<f32>() {
                Ok(v) if v.is_finite() => values.push(v),
                _ => {
                    log::warn!("point list stops at malformed token {token:?}");
                    break 'lines;
                }
            }
        }
    }
    if values.len() % 2 == 1 {
        log::warn!("point list has a dangling coordinate; dropped");
    }
    Ok(values
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect())
}

/// Write one `x\ty` line per point.
pub fn write_points<W: Write>(mut writer: W, points: &[Point]) -> std::io::Result<()> {
    for p in points {
        writeln!(writer, "{}\t{}", p.x, p.y)?;
    }
    writer.flush()
}

/// Read one tangent pair per non-empty line.
pub fn read_tangents<R: BufRead>(reader: R) -> Result<Vec<TangentPair>, AppError> {
    let mut pairs = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AppError::new(2, format!("Failed to read tangents: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }
        let values: Vec<f64> = line
            .split_whitespace()
            .map(|tok| tok.parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| AppError::new(2, format!("Tangent line {}: {e}", i + 1)))?;
        if values.len() != 4 || values.iter().any(|v| !v.is_finite()) {
            return Err(AppError::new(
                2,
                format!("Tangent line {}: expected 4 finite numbers (in_x in_y out_x out_y)", i + 1),
            ));
        }
        pairs.push(TangentPair::new(
            Tangent::new(values[0], values[1]),
            Tangent::new(values[2], values[3]),
        ));
    }
    Ok(pairs)
}

pub fn read_points_file(path: &Path) -> Result<Vec<Point>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open point list '{}': {e}", path.display())))?;
    let points = read_points(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Failed to read point list '{}': {e}", path.display())))?;
    log::info!("imported {} points from {}", points.len(), path.display());
    Ok(points)
}

pub fn write_points_file(path: &Path, points: &[Point]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create point list '{}': {e}", path.display())))?;
    write_points(BufWriter::new(file), points)
        .map_err(|e| AppError::new(2, format!("Failed to write point list '{}': {e}", path.display())))?;
    log::info!("exported {} points to {}", points.len(), path.display());
    Ok(())
}

pub fn read_tangents_file(path: &Path) -> Result<Vec<TangentPair>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open tangent file '{}': {e}", path.display())))?;
    read_tangents(BufReader::new(file))
}

/// `x\ty` rendering of points for stdout.
pub fn points_to_string(points: &[Point]) -> String {
    let mut out = String::new();
    for p in points {
        out.push_str(&format!("{}\t{}\n", p.x, p.y));
    }
    out
}
