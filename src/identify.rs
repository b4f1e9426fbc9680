use std::io::{self, Write};

use hashbrown::HashMap;

use crate::common::{
    AuthorId, Stowage, AUTHOR_CONFERENCES, AUTHOR_PAPER_TITLES, ID_NAME_KEY,
};
use crate::config::ConferenceConfig;
use crate::corpus::{CorpusRead, Publication, INPROCEEDINGS, PROCEEDINGS};
use crate::venue::is_countable;

const MAX_TITLE_COMMAS: usize = 3;

#[derive(Debug, Clone)]
pub struct AuthorRecord {
    pub id: AuthorId,
    pub name: String,
    pub key: String,
}

/// Dense ids 1..N in first-seen order. Authors are deduplicated by display
/// name, which merges distinct people sharing a rendered name; kept for
/// compatibility with existing id maps.
pub struct AuthorTable {
    name_id: HashMap<String, AuthorId>,
    records: Vec<AuthorRecord>,
}

impl AuthorTable {
    pub fn new() -> Self {
        Self {
            name_id: HashMap::new(),
            records: Vec::new(),
        }
    }

    /// Returns the fresh id when (name, key) was unseen.
    pub fn assign(&mut self, name: &str, key: &str) -> Option<AuthorId> {
        if self.name_id.contains_key(name) {
            return None;
        }
        let id = self.records.len() as AuthorId + 1;
        self.name_id.insert(name.to_string(), id);
        self.records.push(AuthorRecord {
            id,
            name: name.to_string(),
            key: key.to_string(),
        });
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[AuthorRecord] {
        &self.records
    }

    /// Corpus-key view consumed by the accumulator.
    pub fn key_ids(&self) -> HashMap<String, AuthorId> {
        self.records
            .iter()
            .map(|r| (r.key.clone(), r.id))
            .collect()
    }
}

/// First pipeline phase: enumerate the conference's authors edition by
/// edition and persist the id map plus the per-author listings.
pub fn collect_authors<C: CorpusRead>(
    db: &C,
    stowage: &Stowage,
    conf: &ConferenceConfig,
) -> io::Result<AuthorTable> {
    let mut table = AuthorTable::new();
    let mut paper_pw = stowage.conf_writer(&conf.acronym, AUTHOR_PAPER_TITLES)?;
    let mut conf_pw = stowage.conf_writer(&conf.acronym, AUTHOR_CONFERENCES)?;

    for edition in &conf.editions {
        for suffix in edition.suffixes() {
            let tocs: Vec<Vec<&Publication>> = edition
                .toc_keys(suffix)
                .iter()
                .map(|k| db.toc(k))
                .collect();
            let edition_year = match tocs.iter().flatten().next() {
                Some(publ) => publ.year,
                None => continue,
            };
            let mut year_pw = stowage.papers_writer(&conf.acronym, edition_year)?;
            for toc in &tocs {
                save_titles(toc, &mut year_pw)?;
                analyse_toc(db, toc, &mut table, &mut paper_pw, &mut conf_pw)?;
            }
        }
    }

    let mut id_bw = stowage.conf_writer(&conf.acronym, ID_NAME_KEY)?;
    for rec in table.records() {
        writeln!(id_bw, "i##{}##n##{}##k##{}", rec.id, rec.name, rec.key)?;
    }
    Ok(table)
}

/// Titles of one edition's papers, front matter excluded.
fn save_titles<W: Write>(toc: &[&Publication], year_pw: &mut W) -> io::Result<()> {
    for publ in toc {
        if publ.tag != PROCEEDINGS {
            writeln!(year_pw, "{}", publ.title)?;
        }
    }
    Ok(())
}

fn analyse_toc<C: CorpusRead, W: Write>(
    db: &C,
    toc: &[&Publication],
    table: &mut AuthorTable,
    paper_pw: &mut W,
    conf_pw: &mut W,
) -> io::Result<()> {
    for publ in toc {
        if publ.tag == PROCEEDINGS {
            continue;
        }
        for author_key in publ.authors() {
            let name = db.author_name(author_key);
            let id = match table.assign(name, author_key) {
                Some(id) => id,
                None => continue,
            };
            writeln!(paper_pw, "i##{}##n##{}##k##{}", id, name, author_key)?;
            writeln!(conf_pw, "i##{}##n##{}##k##{}", id, name, author_key)?;
            for personal in db.publications_of(author_key) {
                if !is_countable(personal) {
                    continue;
                }
                let commas = personal.title.chars().filter(|c| *c == ',').count();
                if commas <= MAX_TITLE_COMMAS {
                    writeln!(paper_pw, "y##{}##t##{}", personal.year, personal.title)?;
                }
                if personal.tag == INPROCEEDINGS {
                    writeln!(conf_pw, "y##{}##c##{}", personal.year, personal.booktitle)?;
                }
            }
        }
    }
    Ok(())
}

/// Reads a persisted id map back; used when later phases run standalone.
pub fn read_id_map(stowage: &Stowage, acronym: &str) -> io::Result<HashMap<String, AuthorId>> {
    let mut key_ids = HashMap::new();
    for line in stowage.conf_lines(acronym, ID_NAME_KEY)? {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let split: Vec<&str> = line.split("##").collect();
        if split.len() != 6 {
            return Err(crate::common::bad_record(ID_NAME_KEY, &line));
        }
        let id = crate::common::parse_field::<AuthorId>(split[1], ID_NAME_KEY, &line)?;
        key_ids.insert(split[5].to_string(), id);
    }
    Ok(key_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_stable() {
        let mut table = AuthorTable::new();
        assert_eq!(table.assign("Ada", "a/Ada"), Some(1));
        assert_eq!(table.assign("Bob", "b/Bob"), Some(2));
        assert_eq!(table.assign("Ada", "a/Ada2"), None);
        assert_eq!(table.assign("Cyd", "c/Cyd"), Some(3));
        let ids: Vec<AuthorId> = table.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // the second Ada merged into id 1, her second key is not recorded
        assert_eq!(table.key_ids().get("a/Ada"), Some(&1));
        assert_eq!(table.key_ids().get("a/Ada2"), None);
    }
}
