use std::fs;
use std::path::PathBuf;

use coagraph::accumulate::{self, YearMatrix};
use coagraph::common::{
    Stowage, ADJACENCY, ADJACENCY_CONF, ID_NAME_KEY, PAPER_LISTING, STATIC, STATIC_CONF,
    TEMPORAL_SORTED,
};
use coagraph::config::ConferenceConfig;
use coagraph::corpus::{Publication, RecordDb};
use coagraph::identify::read_id_map;
use coagraph::temporal::read_graph;
use coagraph::{recollapse, run_conference};

fn focs_config() -> ConferenceConfig {
    let raw = r#"[{
        "acronym": "focs",
        "editions": [
            {"dir": "focs", "acronym": "focs", "first_suffix": 99, "last_suffix": 99},
            {"dir": "focs", "acronym": "focs", "first_suffix": 2000, "last_suffix": 2000}
        ],
        "venues": [
            {"dir": "focs", "acronym": "focs", "first_year": 1960, "last_year": 2021}
        ]
    }]"#;
    let mut confs: Vec<ConferenceConfig> = coagraph::common::deserialize_verbose(raw).unwrap();
    let conf = confs.pop().unwrap();
    conf.validate().unwrap();
    conf
}

fn synthetic_corpus() -> RecordDb {
    let mut db = RecordDb::new();
    db.insert_author("c/Carol", "Carol C.");
    db.insert_author("a/Alice", "Alice A.");
    db.insert_author("b/Bob", "Bob B.");
    db.insert_author("e/Ed", "Ed E.");

    // focs 1999 edition: Carol and Alice, front matter excluded later
    db.insert_publication(
        "db/conf/focs/focs99.bht",
        Publication::new("conf/focs/P4", "inproceedings", 1999)
            .with_title("Pairing, partitioning, and some separations")
            .with_booktitle("FOCS")
            .with_url("db/conf/focs/focs99.html#P4")
            .with_authors(&["c/Carol", "a/Alice"]),
    );
    // focs 2000 edition: two identical Alice/Bob papers plus front matter
    db.insert_publication(
        "db/conf/focs/focs2000.bht",
        Publication::new("conf/focs/2000", "proceedings", 2000)
            .with_title("41st FOCS")
            .with_authors(&["e/Ed"]),
    );
    for pkey in ["conf/focs/P1", "conf/focs/P2"] {
        db.insert_publication(
            "db/conf/focs/focs2000.bht",
            Publication::new(pkey, "inproceedings", 2000)
                .with_title("Lower bounds twice over")
                .with_booktitle("FOCS")
                .with_url("db/conf/focs/focs2000.html#P")
                .with_authors(&["a/Alice", "b/Bob"]),
        );
    }
    // sole-author journal paper, no venue match
    db.insert_publication(
        "",
        Publication::new("journals/jacm/P3", "article", 1999)
            .with_title("A solitary result")
            .with_url("db/journals/jacm/jacm46.html#P3")
            .with_authors(&["c/Carol"]),
    );
    // workshop variant: counts as a collaboration, never as focs itself
    db.insert_publication(
        "",
        Publication::new("conf/focs/W1", "inproceedings", 1999)
            .with_title("A workshop note")
            .with_booktitle("FOCS Workshops")
            .with_url("db/conf/focs/focsw99.html#W1")
            .with_authors(&["a/Alice", "b/Bob"]),
    );
    // informal record, ineligible everywhere
    db.insert_publication(
        "",
        Publication::new("journals/corr/P6", "article", 2001)
            .with_title("A preprint")
            .with_url("db/journals/corr/corr0101.html#P6")
            .with_publ_type("informal")
            .with_authors(&["a/Alice", "b/Bob"]),
    );
    db
}

fn temp_root(slug: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("coagraph-{}-{}", slug, std::process::id()));
    if root.exists() {
        fs::remove_dir_all(&root).unwrap();
    }
    root
}

#[test]
fn five_phase_pipeline() {
    let root = temp_root("pipeline");
    let stowage = Stowage::new(root.to_str().unwrap());
    let db = synthetic_corpus();
    let conf = focs_config();

    run_conference(&db, &stowage, &conf, (1900, 2021)).unwrap();

    // ids are dense, first-seen order, front-matter editor excluded
    let id_lines: Vec<String> = stowage
        .conf_lines("focs", ID_NAME_KEY)
        .unwrap()
        .map(|l| l.unwrap())
        .collect();
    assert_eq!(
        id_lines,
        vec![
            "i##1##n##Carol C.##k##c/Carol",
            "i##2##n##Alice A.##k##a/Alice",
            "i##3##n##Bob B.##k##b/Bob",
        ]
    );
    let key_ids = read_id_map(&stowage, "focs").unwrap();
    assert_eq!(key_ids.len(), 3);
    assert_eq!(key_ids["b/Bob"], 3);

    // persisted matrices round-trip and hold the expected multisets
    let all: YearMatrix = accumulate::read_matrix(&stowage, "focs", ADJACENCY).unwrap();
    assert_eq!(all[&(1, 1)], vec![1999]);
    assert_eq!(all[&(1, 2)], vec![1999]);
    let mut alice_bob = all[&(2, 3)].clone();
    alice_bob.sort_unstable();
    assert_eq!(alice_bob, vec![1999, 2000, 2000]);
    assert_eq!(all.len(), 3);

    let conf_matrix: YearMatrix =
        accumulate::read_matrix(&stowage, "focs", ADJACENCY_CONF).unwrap();
    assert_eq!(conf_matrix[&(1, 2)], vec![1999]);
    assert_eq!(conf_matrix[&(2, 3)], vec![2000, 2000]);
    // workshop and journal records never reach the restricted matrix
    assert_eq!(conf_matrix.len(), 2);

    // duplicate papers collapse into one weight-2 temporal edge in both graphs
    let sorted = read_graph(&stowage, "focs", TEMPORAL_SORTED).unwrap();
    assert!(sorted
        .iter()
        .any(|e| (e.u, e.v, e.year, e.weight) == (2, 3, 2000, 2)));
    // self-pair from the sole-author article, in the all-graph only
    assert!(sorted
        .iter()
        .any(|e| (e.u, e.v, e.year, e.weight) == (1, 1, 1999, 1)));
    let years: Vec<u16> = sorted.iter().map(|e| e.year).collect();
    let mut resorted = years.clone();
    resorted.sort_unstable();
    assert_eq!(years, resorted);

    // full-window static graph reproduces per-pair totals
    let static_lines: Vec<String> = stowage
        .conf_lines("focs", STATIC)
        .unwrap()
        .map(|l| l.unwrap())
        .collect();
    assert_eq!(static_lines, vec!["1,1,1", "1,2,1", "2,3,3"]);
    let static_conf: Vec<String> = stowage
        .conf_lines("focs", STATIC_CONF)
        .unwrap()
        .map(|l| l.unwrap())
        .collect();
    assert_eq!(static_conf, vec!["1,2,1", "2,3,2"]);

    // qualifying conference papers listing, corpus order
    let listing: Vec<String> = stowage
        .conf_lines("focs", PAPER_LISTING)
        .unwrap()
        .map(|l| l.unwrap())
        .collect();
    assert_eq!(
        listing,
        vec![
            "y##1999##k##conf/focs/P4##a##[1, 2]",
            "y##2000##k##conf/focs/P1##a##[2, 3]",
            "y##2000##k##conf/focs/P2##a##[2, 3]",
        ]
    );

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn recollapse_over_narrow_window() {
    let root = temp_root("recollapse");
    let stowage = Stowage::new(root.to_str().unwrap());
    let db = synthetic_corpus();
    let conf = focs_config();

    run_conference(&db, &stowage, &conf, (1900, 2021)).unwrap();
    recollapse(&stowage, "focs", (2000, 2005)).unwrap();

    let static_lines: Vec<String> = stowage
        .conf_lines("focs", STATIC)
        .unwrap()
        .map(|l| l.unwrap())
        .collect();
    // 1999 edges fall outside, their pairs are omitted entirely
    assert_eq!(static_lines, vec!["2,3,2"]);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn edition_walk_builds_per_year_artifacts() {
    let root = temp_root("editions");
    let stowage = Stowage::new(root.to_str().unwrap());
    let db = synthetic_corpus();
    let conf = focs_config();

    run_conference(&db, &stowage, &conf, (1900, 2021)).unwrap();

    let titles_1999 =
        fs::read_to_string(root.join("conferences/focs/papers/paper_titles_1999.txt")).unwrap();
    assert_eq!(titles_1999.trim(), "Pairing, partitioning, and some separations");
    let titles_2000 =
        fs::read_to_string(root.join("conferences/focs/papers/paper_titles_2000.txt")).unwrap();
    // front matter is excluded, the twin papers both appear
    assert_eq!(titles_2000.lines().count(), 2);
    assert!(!titles_2000.contains("41st"));

    fs::remove_dir_all(&root).unwrap();
}
