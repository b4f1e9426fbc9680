use std::io;

use serde::{Deserialize, Serialize};

use crate::accumulate::YearMatrix;
use crate::common::{AuthorId, Stowage, Weight, Year};

/// One weighted collaboration record scoped to one year, u <= v.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalEdge {
    pub u: AuthorId,
    pub v: AuthorId,
    pub year: Year,
    pub weight: Weight,
}

/// Run-length-encodes each cell's year multiset into per-year weighted
/// edges. Input year order never matters; equal years always merge into
/// one edge.
pub fn aggregate(matrix: &YearMatrix) -> Vec<TemporalEdge> {
    let mut cells: Vec<(AuthorId, AuthorId)> = matrix.keys().copied().collect();
    cells.sort_unstable();
    let mut edges = Vec::new();
    for (u, v) in cells {
        let mut years = matrix[&(u, v)].clone();
        if years.is_empty() {
            continue;
        }
        years.sort_unstable();
        let mut current_year = years[0];
        let mut weight: Weight = 0;
        for year in years {
            if year == current_year {
                weight += 1;
            } else {
                edges.push(TemporalEdge { u, v, year: current_year, weight });
                current_year = year;
                weight = 1;
            }
        }
        edges.push(TemporalEdge { u, v, year: current_year, weight });
    }
    edges
}

/// Stable by-year sort; ties retain input order for deterministic output.
pub fn sort_by_year(edges: &mut [TemporalEdge]) {
    edges.sort_by_key(|e| e.year);
}

pub fn write_graph(
    stowage: &Stowage,
    acronym: &str,
    fname: &str,
    edges: &[TemporalEdge],
) -> io::Result<()> {
    let mut writer = stowage.graph_writer(acronym, fname)?;
    for edge in edges {
        writer.serialize(edge)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_graph(stowage: &Stowage, acronym: &str, fname: &str) -> io::Result<Vec<TemporalEdge>> {
    let mut edges = Vec::new();
    for row in stowage.graph_reader(acronym, fname)?.deserialize() {
        edges.push(row?);
    }
    Ok(edges)
}
