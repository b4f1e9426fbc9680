use std::{
    fs::{create_dir_all, File},
    io::{self, BufRead, BufReader, BufWriter},
    path::{Path, PathBuf},
};

use csv::{Reader, ReaderBuilder, Writer, WriterBuilder};
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

pub type AuthorId = u32;
pub type Year = u16;
pub type Weight = u32;

pub type StowReader = Reader<BufReader<GzDecoder<File>>>;
pub type LineWriter = BufWriter<File>;
pub type Lines = std::io::Lines<BufReader<File>>;
pub type GraphWriter = Writer<File>;
pub type GraphReader = Reader<File>;

pub const WORKS: &str = "works";
pub const AUTHORS: &str = "authors";

pub const ID_NAME_KEY: &str = "id_name_key.txt";
pub const AUTHOR_PAPER_TITLES: &str = "author_paper_titles.txt";
pub const AUTHOR_CONFERENCES: &str = "author_conferences.txt";
pub const PAPER_LISTING: &str = "papers.txt";
pub const ADJACENCY: &str = "temporal_adjacency_matrix.txt";
pub const ADJACENCY_CONF: &str = "temporal_adjacency_matrix_conf.txt";
pub const TEMPORAL: &str = "temporal_graph.txt";
pub const TEMPORAL_CONF: &str = "temporal_graph_conf.txt";
pub const TEMPORAL_SORTED: &str = "temporal_graph_sorted.txt";
pub const TEMPORAL_CONF_SORTED: &str = "temporal_graph_conf_sorted.txt";
pub const STATIC: &str = "static_graph.txt";
pub const STATIC_CONF: &str = "static_graph_conf.txt";

macro_rules! pathfields_fn {
    ($($k:ident => $v:literal),*,) => {

        pub fn new(root_path: &str) -> Self{
            $(
                let $k = Path::new(root_path).join($v);
                create_dir_all(&$k).unwrap();
            )*

            Self {
                $(
                    $k,
                )*
            }
        }
    };
}

pub struct Stowage {
    pub corpus_csvs: PathBuf,
    pub conferences: PathBuf,
}

impl Stowage {
    pathfields_fn!(
        corpus_csvs => "corpus",
        conferences => "conferences",
    );

    pub fn get_reader<T>(&self, fname: T) -> io::Result<StowReader>
    where
        T: AsRef<Path>,
    {
        let path = self.corpus_csvs.join(fname).with_extension("csv.gz");
        let reader = get_gz_buf(&path)?;
        Ok(ReaderBuilder::new().from_reader(reader))
    }

    pub fn get_sub_reader(&self, entity: &str, sub: &str) -> io::Result<StowReader> {
        self.get_reader(format!("{}/{}", entity, sub))
    }

    pub fn conf_dir(&self, acronym: &str) -> io::Result<PathBuf> {
        let dir = self.conferences.join(acronym);
        create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn conf_writer(&self, acronym: &str, fname: &str) -> io::Result<LineWriter> {
        let file = File::create(self.conf_dir(acronym)?.join(fname))?;
        Ok(BufWriter::new(file))
    }

    pub fn papers_writer(&self, acronym: &str, year: Year) -> io::Result<LineWriter> {
        let dir = self.conferences.join(acronym).join("papers");
        create_dir_all(&dir)?;
        let file = File::create(dir.join(format!("paper_titles_{}.txt", year)))?;
        Ok(BufWriter::new(file))
    }

    pub fn conf_lines(&self, acronym: &str, fname: &str) -> io::Result<Lines> {
        let file = File::open(self.conferences.join(acronym).join(fname))?;
        Ok(BufReader::new(file).lines())
    }

    pub fn graph_writer(&self, acronym: &str, fname: &str) -> io::Result<GraphWriter> {
        let path = self.conf_dir(acronym)?.join(fname);
        Ok(WriterBuilder::new().has_headers(false).from_path(path)?)
    }

    pub fn graph_reader(&self, acronym: &str, fname: &str) -> io::Result<GraphReader> {
        let path = self.conferences.join(acronym).join(fname);
        Ok(ReaderBuilder::new().has_headers(false).from_path(path)?)
    }
}

fn get_gz_buf(path: &Path) -> io::Result<BufReader<GzDecoder<File>>> {
    let file = File::open(path)?;
    Ok(BufReader::new(GzDecoder::new(file)))
}

pub fn bad_record(fname: &str, line: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed record in {}: {}", fname, line),
    )
}

pub fn parse_field<T>(raw: &str, fname: &str, line: &str) -> io::Result<T>
where
    T: std::str::FromStr,
{
    raw.trim().parse::<T>().map_err(|_| bad_record(fname, line))
}

pub fn deserialize_verbose<T: DeserializeOwned>(s: &str) -> io::Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(s);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("configuration error at {}: {}", err.path(), err),
        )
    })
}
