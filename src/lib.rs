use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub mod accumulate;
pub mod collapse;
pub mod common;
pub mod config;
pub mod corpus;
pub mod identify;
pub mod para;
pub mod temporal;
pub mod venue;

use common::{
    parse_field, Stowage, Year, ADJACENCY, ADJACENCY_CONF, STATIC, STATIC_CONF, TEMPORAL,
    TEMPORAL_CONF, TEMPORAL_CONF_SORTED, TEMPORAL_SORTED,
};
use config::{ConferenceConfig, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR};
use corpus::{CorpusRead, RecordDb};

/// The full five-phase pipeline for one conference: identity assignment,
/// matrix accumulation, temporal aggregation, chronological sort, window
/// collapse. Each phase persists its artifact before the next one runs.
pub fn run_conference<C: CorpusRead>(
    db: &C,
    stowage: &Stowage,
    conf: &ConferenceConfig,
    window: (Year, Year),
) -> io::Result<()> {
    println!("processing {} ...", conf.acronym);
    let table = identify::collect_authors(db, stowage, conf)?;
    println!("....{}: {} authors identified", conf.acronym, table.len());
    let key_ids = table.key_ids();
    let matrices = accumulate::accumulate(db, stowage, conf, &key_ids)?;
    accumulate::write_matrix(stowage, &conf.acronym, ADJACENCY, &matrices.all)?;
    accumulate::write_matrix(stowage, &conf.acronym, ADJACENCY_CONF, &matrices.conf)?;
    println!("....{}: matrices accumulated", conf.acronym);
    finish_graphs(stowage, &conf.acronym, &matrices.all, GraphFiles::ALL, window)?;
    finish_graphs(stowage, &conf.acronym, &matrices.conf, GraphFiles::CONF, window)?;
    println!("{} done", conf.acronym);
    Ok(())
}

struct GraphFiles {
    temporal: &'static str,
    sorted: &'static str,
    collapsed: &'static str,
}

impl GraphFiles {
    const ALL: Self = Self {
        temporal: TEMPORAL,
        sorted: TEMPORAL_SORTED,
        collapsed: STATIC,
    };
    const CONF: Self = Self {
        temporal: TEMPORAL_CONF,
        sorted: TEMPORAL_CONF_SORTED,
        collapsed: STATIC_CONF,
    };
}

fn finish_graphs(
    stowage: &Stowage,
    acronym: &str,
    matrix: &accumulate::YearMatrix,
    files: GraphFiles,
    window: (Year, Year),
) -> io::Result<()> {
    let mut edges = temporal::aggregate(matrix);
    temporal::write_graph(stowage, acronym, files.temporal, &edges)?;
    temporal::sort_by_year(&mut edges);
    temporal::write_graph(stowage, acronym, files.sorted, &edges)?;
    let static_edges = collapse::collapse(&edges, window.0, window.1);
    collapse::write_static(stowage, acronym, files.collapsed, &static_edges)?;
    Ok(())
}

/// Rebuilds the graph artifacts of one conference from its persisted
/// adjacency matrices.
pub fn rebuild_graphs(stowage: &Stowage, acronym: &str, window: (Year, Year)) -> io::Result<()> {
    for (mat_fname, files) in [(ADJACENCY, GraphFiles::ALL), (ADJACENCY_CONF, GraphFiles::CONF)] {
        let matrix = accumulate::read_matrix(stowage, acronym, mat_fname)?;
        finish_graphs(stowage, acronym, &matrix, files, window)?;
    }
    Ok(())
}

/// Re-collapses the persisted sorted graphs over a different year window.
pub fn recollapse(stowage: &Stowage, acronym: &str, window: (Year, Year)) -> io::Result<()> {
    for (sorted_fname, static_fname) in
        [(TEMPORAL_SORTED, STATIC), (TEMPORAL_CONF_SORTED, STATIC_CONF)]
    {
        let edges = temporal::read_graph(stowage, acronym, sorted_fname)?;
        let static_edges = collapse::collapse(&edges, window.0, window.1);
        collapse::write_static(stowage, acronym, static_fname, &static_edges)?;
    }
    Ok(())
}

fn load_or_default(path_o: Option<String>) -> io::Result<Vec<ConferenceConfig>> {
    match path_o {
        Some(p) => config::load_conferences(Path::new(&p)),
        None => Ok(config::default_roster()),
    }
}

fn pick_conference(confs: Vec<ConferenceConfig>, acronym: &str) -> io::Result<ConferenceConfig> {
    confs
        .into_iter()
        .find(|c| c.acronym == acronym)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("configuration error: unknown conference {}", acronym),
            )
        })
}

pub fn runner<A>(comm: &str, root_str: &str, mut args: A) -> io::Result<()>
where
    A: Iterator<Item = String>,
{
    let stowage = Stowage::new(root_str);
    let window = (DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR);
    if comm == "run" {
        let acronym = expect_arg(args.next(), "run needs a conference acronym")?;
        let conf = pick_conference(load_or_default(args.next())?, &acronym)?;
        let db = RecordDb::load(&stowage)?;
        run_conference(&db, &stowage, &conf, window)?;
    } else if comm == "run-all" {
        let confs = load_or_default(args.next())?;
        let db = RecordDb::load(&stowage)?;
        let failed = AtomicUsize::new(0);
        para::run_parallel(confs, |conf| {
            if let Err(e) = run_conference(&db, &stowage, &conf, window) {
                eprintln!("{} failed: {}", conf.acronym, e);
                failed.fetch_add(1, Ordering::Relaxed);
            }
        });
        let failed = failed.into_inner();
        if failed > 0 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} conference(s) failed", failed),
            ));
        }
    } else if comm == "graphs" {
        let acronym = expect_arg(args.next(), "graphs needs a conference acronym")?;
        rebuild_graphs(&stowage, &acronym, window)?;
    } else if comm == "collapse" {
        let acronym = expect_arg(args.next(), "collapse needs a conference acronym")?;
        let fy_raw = expect_arg(args.next(), "collapse needs a first year")?;
        let ly_raw = expect_arg(args.next(), "collapse needs a last year")?;
        let fy = parse_field::<Year>(&fy_raw, "args", &fy_raw)?;
        let ly = parse_field::<Year>(&ly_raw, "args", &ly_raw)?;
        recollapse(&stowage, &acronym, (fy, ly))?;
    } else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unknown command {}", comm),
        ));
    }
    Ok(())
}

fn expect_arg(arg: Option<String>, msg: &str) -> io::Result<String> {
    arg.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, msg))
}
