//! Dataset reader (C13): `DIMENSION` header, `BEGIN`/`END` markers,
//! `id x y` lines.

use std::path::Path;

use crate::error::{Result, RspError};
use crate::geometry::Station;

/// Parses a dataset file into a station table. IDs must be consecutive
/// starting at 1; any gap or repeat is an input error.
pub fn load_dataset(path: &Path) -> Result<Vec<Station>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| RspError::Input(format!("reading dataset {path:?}: {e}")))?;
    parse_dataset(&text)
}

fn parse_dataset(text: &str) -> Result<Vec<Station>> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let dimension: usize = lines
        .find(|l| l.starts_with("DIMENSION"))
        .ok_or_else(|| RspError::Input("missing DIMENSION header".to_string()))
        .and_then(|l| {
            l.split(':')
                .nth(1)
                .or_else(|| l.split_whitespace().nth(1))
                .ok_or_else(|| RspError::Input(format!("malformed DIMENSION line: {l:?}")))
                .and_then(|v| {
                    v.trim()
                        .parse()
                        .map_err(|e| RspError::Input(format!("malformed DIMENSION value: {e}")))
                })
        })?;

    let found_begin = lines.by_ref().any(|l| l.eq_ignore_ascii_case("BEGIN"));
    if !found_begin {
        return Err(RspError::Input("missing BEGIN marker".to_string()));
    }

    let mut stations = Vec::with_capacity(dimension);
    for line in lines {
        if line.eq_ignore_ascii_case("END") {
            break;
        }
        let mut parts = line.split_whitespace();
        let id: u32 = parts
            .next()
            .ok_or_else(|| RspError::Input(format!("malformed station line: {line:?}")))?
            .parse()
            .map_err(|e| RspError::Input(format!("malformed station id in {line:?}: {e}")))?;
        let x: f64 = parts
            .next()
            .ok_or_else(|| RspError::Input(format!("malformed station line: {line:?}")))?
            .parse()
            .map_err(|e| RspError::Input(format!("malformed x coordinate in {line:?}: {e}")))?;
        let y: f64 = parts
            .next()
            .ok_or_else(|| RspError::Input(format!("malformed station line: {line:?}")))?
            .parse()
            .map_err(|e| RspError::Input(format!("malformed y coordinate in {line:?}: {e}")))?;
        stations.push(Station { id, x, y });
    }

    if stations.len() != dimension {
        return Err(RspError::Input(format!(
            "DIMENSION declared {dimension} stations, found {}",
            stations.len()
        )));
    }
    for (expected, s) in (1u32..).zip(stations.iter()) {
        if s.id != expected {
            return Err(RspError::Input(format!(
                "station ids must be consecutive starting at 1, got {} at position {expected}",
                s.id
            )));
        }
    }

    Ok(stations)
}
