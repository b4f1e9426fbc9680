use std::io;
use std::time::Instant;

use hashbrown::HashMap;
use serde::Deserialize;
use tqdm::Iter;

use crate::common::{Stowage, Year, AUTHORS, WORKS};

pub const ARTICLE: &str = "article";
pub const INPROCEEDINGS: &str = "inproceedings";
pub const PROCEEDINGS: &str = "proceedings";

#[derive(Deserialize, Debug)]
struct SWork {
    key: String,
    toc: Option<String>,
    tag: String,
    year: Option<Year>,
    title: Option<String>,
    booktitle: Option<String>,
    url: Option<String>,
    publ_type: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SAuthorship {
    parent_id: String,
    author: String,
}

#[derive(Deserialize, Debug)]
struct SAuthor {
    key: String,
    display_name: Option<String>,
}

/// One corpus publication. Missing fields are tolerated as empty values,
/// never as load failures.
#[derive(Debug, Clone)]
pub struct Publication {
    pub key: String,
    pub tag: String,
    pub year: Year,
    pub title: String,
    pub booktitle: String,
    pub url: String,
    pub publ_type: Option<String>,
    authors: Vec<String>,
}

impl Publication {
    pub fn new(key: &str, tag: &str, year: Year) -> Self {
        Self {
            key: key.to_string(),
            tag: tag.to_string(),
            year,
            title: String::new(),
            booktitle: String::new(),
            url: String::new(),
            publ_type: None,
            authors: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_booktitle(mut self, booktitle: &str) -> Self {
        self.booktitle = booktitle.to_string();
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn with_publ_type(mut self, publ_type: &str) -> Self {
        self.publ_type = Some(publ_type.to_string());
        self
    }

    pub fn with_authors(mut self, keys: &[&str]) -> Self {
        self.authors = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Co-author keys in document order.
    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

/// Minimal read interface the pipeline consumes; the corpus store behind it
/// is an external concern.
pub trait CorpusRead {
    fn publications(&self) -> &[Publication];
    fn toc(&self, toc_key: &str) -> Vec<&Publication>;
    fn author_name(&self, author_key: &str) -> &str;
    fn publications_of(&self, author_key: &str) -> Vec<&Publication>;
}

pub struct RecordDb {
    pubs: Vec<Publication>,
    by_author: HashMap<String, Vec<usize>>,
    by_toc: HashMap<String, Vec<usize>>,
    names: HashMap<String, String>,
}

impl RecordDb {
    pub fn new() -> Self {
        Self {
            pubs: Vec::new(),
            by_author: HashMap::new(),
            by_toc: HashMap::new(),
            names: HashMap::new(),
        }
    }

    pub fn insert_author(&mut self, key: &str, display_name: &str) {
        self.names.insert(key.to_string(), display_name.to_string());
    }

    pub fn insert_publication(&mut self, toc_key: &str, publication: Publication) {
        let pind = self.pubs.len();
        for author_key in publication.authors() {
            self.by_author
                .entry(author_key.clone())
                .or_default()
                .push(pind);
        }
        if !toc_key.is_empty() {
            self.by_toc.entry(toc_key.to_string()).or_default().push(pind);
        }
        self.pubs.push(publication);
    }

    /// Build the in-memory corpus store from the gzipped csv dumps.
    pub fn load(stowage: &Stowage) -> io::Result<Self> {
        println!("building the corpus main memory db ...");
        let start = Instant::now();
        let mut db = Self::new();

        let mut author_rdr = stowage.get_sub_reader(AUTHORS, "main")?;
        for row in author_rdr.deserialize::<SAuthor>().tqdm().desc(Some(AUTHORS)) {
            let author = row?;
            db.insert_author(&author.key, &author.display_name.unwrap_or_default());
        }

        let mut authorships: HashMap<String, Vec<String>> = HashMap::new();
        let mut ship_rdr = stowage.get_sub_reader(WORKS, "authorships")?;
        for row in ship_rdr
            .deserialize::<SAuthorship>()
            .tqdm()
            .desc(Some("authorships"))
        {
            let ship = row?;
            authorships.entry(ship.parent_id).or_default().push(ship.author);
        }

        let mut work_rdr = stowage.get_sub_reader(WORKS, "main")?;
        for row in work_rdr.deserialize::<SWork>().tqdm().desc(Some(WORKS)) {
            let work = row?;
            let author_keys = authorships.remove(&work.key).unwrap_or_default();
            let mut publication = Publication::new(&work.key, &work.tag, work.year.unwrap_or(0));
            publication.title = work.title.unwrap_or_default();
            publication.booktitle = work.booktitle.unwrap_or_default();
            publication.url = work.url.unwrap_or_default();
            publication.publ_type = work.publ_type.filter(|t| !t.is_empty());
            publication.authors = author_keys;
            db.insert_publication(&work.toc.unwrap_or_default(), publication);
        }

        println!(
            "corpus db ready in {} seconds: {} publs, {} pers",
            start.elapsed().as_secs(),
            db.pubs.len(),
            db.names.len()
        );
        Ok(db)
    }
}

impl CorpusRead for RecordDb {
    fn publications(&self) -> &[Publication] {
        &self.pubs
    }

    fn toc(&self, toc_key: &str) -> Vec<&Publication> {
        // toc members are indexed at load time, corpus order is kept
        match self.by_toc.get(toc_key) {
            Some(inds) => inds.iter().map(|i| &self.pubs[*i]).collect(),
            None => Vec::new(),
        }
    }

    fn author_name(&self, author_key: &str) -> &str {
        match self.names.get(author_key) {
            Some(name) => name,
            None => "",
        }
    }

    fn publications_of(&self, author_key: &str) -> Vec<&Publication> {
        match self.by_author.get(author_key) {
            Some(inds) => inds.iter().map(|i| &self.pubs[*i]).collect(),
            None => Vec::new(),
        }
    }
}
