use std::io;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::common::{AuthorId, Stowage, Weight, Year};
use crate::temporal::TemporalEdge;

/// A temporal edge's weight aggregated over a year window, u <= v.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticEdge {
    pub u: AuthorId,
    pub v: AuthorId,
    pub weight: Weight,
}

/// Sums temporal weights over the closed interval [first_year, last_year].
/// Pairs with zero qualifying weight are omitted entirely; self-pairs are
/// kept like any other pair.
pub fn collapse(edges: &[TemporalEdge], first_year: Year, last_year: Year) -> Vec<StaticEdge> {
    let mut weights: HashMap<(AuthorId, AuthorId), Weight> = HashMap::new();
    for edge in edges {
        if edge.year < first_year || edge.year > last_year {
            continue;
        }
        let cell = (edge.u.min(edge.v), edge.u.max(edge.v));
        *weights.entry(cell).or_insert(0) += edge.weight;
    }
    let mut cells: Vec<(AuthorId, AuthorId)> = weights.keys().copied().collect();
    cells.sort_unstable();
    cells
        .into_iter()
        .filter(|c| weights[c] > 0)
        .map(|(u, v)| StaticEdge { u, v, weight: weights[&(u, v)] })
        .collect()
}

pub fn write_static(
    stowage: &Stowage,
    acronym: &str,
    fname: &str,
    edges: &[StaticEdge],
) -> io::Result<()> {
    let mut writer = stowage.graph_writer(acronym, fname)?;
    for edge in edges {
        writer.serialize(edge)?;
    }
    writer.flush()?;
    Ok(())
}
