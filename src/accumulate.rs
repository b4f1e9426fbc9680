use std::fmt::Display;
use std::io::{self, Write};

use hashbrown::HashMap;
use tqdm::Iter;

use crate::common::{bad_record, parse_field, AuthorId, Stowage, Year, PAPER_LISTING};
use crate::config::ConferenceConfig;
use crate::corpus::CorpusRead;
use crate::venue::{is_countable, VenueClassifier};

/// Sparse upper-triangular (u <= v) pairwise year multisets; a cell exists
/// iff at least one qualifying co-authorship occurred.
pub type YearMatrix = HashMap<(AuthorId, AuthorId), Vec<Year>>;

pub struct Matrices {
    pub all: YearMatrix,
    pub conf: YearMatrix,
}

/// Second pipeline phase: one scan over the full corpus filling both
/// matrices and the flat listing of qualifying conference papers.
pub fn accumulate<C: CorpusRead>(
    db: &C,
    stowage: &Stowage,
    conf: &ConferenceConfig,
    key_ids: &HashMap<String, AuthorId>,
) -> io::Result<Matrices> {
    let classifier = VenueClassifier::new(&conf.venues, &conf.exceptions);
    let mut all = YearMatrix::new();
    let mut restricted = YearMatrix::new();
    let mut pub_bw = stowage.conf_writer(&conf.acronym, PAPER_LISTING)?;

    for publ in db.publications().iter().tqdm().desc(Some(conf.acronym.as_str())) {
        if !is_countable(publ) {
            continue;
        }
        let year = publ.year;
        let authors = publ.authors();
        let matches = classifier.match_count(&publ.url, year);
        for k1 in authors {
            if let Some(&id1) = key_ids.get(k1) {
                for k2 in authors {
                    let paired = (k1 != k2 && key_ids.contains_key(k2))
                        || (k1 == k2 && authors.len() == 1);
                    if !paired {
                        continue;
                    }
                    let id2 = key_ids[k2];
                    if id1 <= id2 {
                        all.entry((id1, id2)).or_default().push(year);
                        for _ in 0..matches {
                            restricted.entry((id1, id2)).or_default().push(year);
                        }
                    }
                }
            }
        }
        if !authors.is_empty() && matches > 0 {
            let ids: Vec<AuthorId> = authors
                .iter()
                .filter_map(|k| key_ids.get(k).copied())
                .collect();
            for _ in 0..matches {
                writeln!(
                    pub_bw,
                    "y##{}##k##{}##a##{}",
                    year,
                    publ.key,
                    bracketed(&ids)
                )?;
            }
        }
    }
    Ok(Matrices {
        all,
        conf: restricted,
    })
}

fn bracketed<T: Display>(items: &[T]) -> String {
    let inner: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("[{}]", inner.join(", "))
}

/// Persists non-empty cells ordered by (u, v); years stay in insertion
/// order.
pub fn write_matrix(
    stowage: &Stowage,
    acronym: &str,
    fname: &str,
    matrix: &YearMatrix,
) -> io::Result<()> {
    let mut bw = stowage.conf_writer(acronym, fname)?;
    let mut cells: Vec<(AuthorId, AuthorId)> = matrix.keys().copied().collect();
    cells.sort_unstable();
    for cell in cells {
        writeln!(
            bw,
            "({},{}): {}",
            cell.0,
            cell.1,
            bracketed(&matrix[&cell])
        )?;
    }
    Ok(())
}

pub fn read_matrix(stowage: &Stowage, acronym: &str, fname: &str) -> io::Result<YearMatrix> {
    let mut matrix = YearMatrix::new();
    for line in stowage.conf_lines(acronym, fname)? {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (cell, years) = parse_matrix_line(&line, fname)?;
        matrix.insert(cell, years);
    }
    Ok(matrix)
}

fn parse_matrix_line(
    line: &str,
    fname: &str,
) -> io::Result<((AuthorId, AuthorId), Vec<Year>)> {
    let (head, tail) = match line.split_once(':') {
        Some(parts) => parts,
        None => return Err(bad_record(fname, line)),
    };
    let uv = head.trim().trim_start_matches('(').trim_end_matches(')');
    let (u_raw, v_raw) = match uv.split_once(',') {
        Some(parts) => parts,
        None => return Err(bad_record(fname, line)),
    };
    let u = parse_field::<AuthorId>(u_raw, fname, line)?;
    let v = parse_field::<AuthorId>(v_raw, fname, line)?;
    let listing = tail.trim().trim_start_matches('[').trim_end_matches(']');
    let mut years = Vec::new();
    for raw in listing.split(',') {
        years.push(parse_field::<Year>(raw, fname, line)?);
    }
    Ok(((u, v), years))
}
