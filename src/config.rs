use std::fs::read_to_string;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::common::{deserialize_verbose, Year};
use crate::venue::VenueRule;

pub const DEFAULT_FIRST_YEAR: Year = 1900;
pub const DEFAULT_LAST_YEAR: Year = 2021;

fn default_kind() -> String {
    "conf".to_string()
}

fn default_parts() -> u8 {
    1
}

/// One block of conference editions sharing a file-name pattern: toc keys
/// `db/{kind}/{dir}/{acronym}{suffix}.bht`, with `-{part}` inserted before
/// the extension when the edition came in several parts.
#[derive(Deserialize, Debug, Clone)]
pub struct EditionSpec {
    #[serde(default = "default_kind")]
    pub kind: String,
    pub dir: String,
    pub acronym: String,
    pub first_suffix: u16,
    pub last_suffix: u16,
    #[serde(default = "default_parts")]
    pub parts: u8,
}

impl EditionSpec {
    pub fn suffixes(&self) -> std::ops::RangeInclusive<u16> {
        self.first_suffix..=self.last_suffix
    }

    pub fn toc_keys(&self, suffix: u16) -> Vec<String> {
        let suffix_string = if suffix < 10 {
            format!("0{}", suffix)
        } else {
            suffix.to_string()
        };
        let stem = format!("db/{}/{}/{}{}", self.kind, self.dir, self.acronym, suffix_string);
        if self.parts == 1 {
            vec![format!("{}.bht", stem)]
        } else {
            (1..=self.parts).map(|p| format!("{}-{}.bht", stem, p)).collect()
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ConferenceConfig {
    pub acronym: String,
    pub editions: Vec<EditionSpec>,
    pub venues: Vec<VenueRule>,
    #[serde(default)]
    pub exceptions: Vec<String>,
}

impl ConferenceConfig {
    /// Malformed configuration is reported before any processing starts.
    pub fn validate(&self) -> io::Result<()> {
        if self.acronym.is_empty() {
            return Err(config_error("empty conference acronym"));
        }
        if self.editions.is_empty() || self.venues.is_empty() {
            return Err(config_error(&format!(
                "{}: needs at least one edition and one venue rule",
                self.acronym
            )));
        }
        for ed in &self.editions {
            if ed.first_suffix > ed.last_suffix || ed.parts < 1 {
                return Err(config_error(&format!(
                    "{}: bad edition block {}/{} [{}..{}] x{}",
                    self.acronym, ed.dir, ed.acronym, ed.first_suffix, ed.last_suffix, ed.parts
                )));
            }
        }
        for rule in &self.venues {
            if rule.first_year > rule.last_year {
                return Err(config_error(&format!(
                    "{}: bad venue years {}/{} [{}..{}]",
                    self.acronym, rule.dir, rule.acronym, rule.first_year, rule.last_year
                )));
            }
        }
        Ok(())
    }
}

fn config_error(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("configuration error: {}", msg))
}

pub fn load_conferences(path: &Path) -> io::Result<Vec<ConferenceConfig>> {
    let raw = read_to_string(path)?;
    let confs: Vec<ConferenceConfig> = deserialize_verbose(&raw)?;
    for conf in &confs {
        conf.validate()?;
    }
    Ok(confs)
}

macro_rules! roster_conf {
    ($acr:literal,
     ed: [$(($edir:literal, $eacr:literal, $fs:literal, $ls:literal, $parts:literal)),+ $(,)?],
     venues: [$(($vdir:literal, $vacr:literal, $fy:literal, $ly:literal)),+ $(,)?]
     $(, exc: [$($exc:literal),*])?) => {
        ConferenceConfig {
            acronym: $acr.to_string(),
            editions: vec![$(EditionSpec {
                kind: default_kind(),
                dir: $edir.to_string(),
                acronym: $eacr.to_string(),
                first_suffix: $fs,
                last_suffix: $ls,
                parts: $parts,
            }),+],
            venues: vec![$(VenueRule {
                dir: $vdir.to_string(),
                acronym: $vacr.to_string(),
                first_year: $fy,
                last_year: $ly,
            }),+],
            exceptions: vec![$($($exc.to_string()),*)?],
        }
    };
}

/// The conference tables the binary falls back to when no configuration
/// file is given.
pub fn default_roster() -> Vec<ConferenceConfig> {
    vec![
        roster_conf!("cav",
            ed: [("cav", "cav", 1990, 1990, 1), ("cav", "cav", 91, 91, 1),
                 ("cav", "cav", 1992, 1992, 1), ("cav", "cav", 93, 99, 1),
                 ("cav", "cav", 2000, 2015, 1), ("cav", "cav", 2015, 2015, 2),
                 ("cav", "cav", 2016, 2021, 2)],
            venues: [("cav", "cav", 1990, 2021)]),
        roster_conf!("concur",
            ed: [("concur", "concur", 1984, 1984, 1), ("concur", "concur", 1988, 2021, 1)],
            venues: [("concur", "concur", 1984, 2021)]),
        roster_conf!("crypto",
            ed: [("crypto", "crypto", 81, 99, 1), ("crypto", "crypto", 2000, 2012, 1),
                 ("crypto", "crypto", 2013, 2015, 2), ("crypto", "crypto", 2016, 2020, 3),
                 ("crypto", "crypto", 2021, 2021, 4)],
            venues: [("crypto", "crypto", 1981, 2021)]),
        roster_conf!("csl",
            ed: [("csl", "csl", 87, 99, 1), ("csl", "csl", 2000, 2018, 1),
                 ("csl", "csl", 2020, 2021, 1)],
            venues: [("csl", "csl", 1987, 2021)]),
        roster_conf!("disc",
            ed: [("wdag", "wdag", 87, 97, 1), ("wdag", "disc", 98, 99, 1),
                 ("wdag", "disc", 2000, 2021, 1)],
            venues: [("wdag", "wdag", 1987, 1997), ("wdag", "disc", 1998, 2021)]),
        roster_conf!("esa",
            ed: [("esa", "esa", 93, 99, 1), ("esa", "esa", 2000, 2009, 1),
                 ("esa", "esa", 2010, 2010, 2), ("esa", "esa", 2011, 2021, 1)],
            venues: [("esa", "esa", 1993, 2021)]),
        roster_conf!("esop",
            ed: [("esop", "esop", 86, 86, 1), ("esop", "esop", 88, 88, 1),
                 ("esop", "esop", 90, 90, 1), ("esop", "esop", 92, 92, 1),
                 ("esop", "esop", 94, 94, 1), ("esop", "esop", 96, 96, 1),
                 ("esop", "esop", 98, 99, 1), ("esop", "esop", 2000, 2021, 1)],
            venues: [("esop", "esop", 1986, 2021)]),
        roster_conf!("eurocrypt",
            ed: [("eurocrypt", "eurocrypt", 82, 99, 1),
                 ("eurocrypt", "eurocrypt", 2000, 2014, 1),
                 ("eurocrypt", "eurocrypt", 2015, 2016, 2),
                 ("eurocrypt", "eurocrypt", 2017, 2021, 3)],
            venues: [("eurocrypt", "eurocrypt", 1982, 2021)]),
        roster_conf!("focs",
            ed: [("focs", "focs", 60, 99, 1), ("focs", "focs", 2000, 2021, 1)],
            venues: [("focs", "focs", 1960, 2021)]),
        roster_conf!("icalp",
            ed: [("icalp", "icalp", 72, 72, 1), ("icalp", "icalp", 74, 74, 1),
                 ("icalp", "icalp", 76, 99, 1), ("icalp", "icalp", 2000, 2005, 1),
                 ("icalp", "icalp", 2006, 2006, 2), ("icalp", "icalp", 2007, 2007, 1),
                 ("icalp", "icalp", 2008, 2015, 2), ("icalp", "icalp", 2016, 2021, 1)],
            venues: [("icalp", "icalp", 1972, 2021)]),
        roster_conf!("lics",
            ed: [("lics", "lics", 86, 99, 1), ("lics", "lics", 2000, 2013, 1),
                 ("csl", "csl", 2014, 2014, 1), ("lics", "lics", 2015, 2021, 1)],
            venues: [("lics", "lics", 1986, 2013), ("csl", "csl", 2014, 2014),
                     ("lics", "lics", 2015, 2021)]),
        roster_conf!("mfcs",
            ed: [("mfcs", "mfcs", 73, 99, 1), ("mfcs", "mfcs", 2000, 2013, 1),
                 ("mfcs", "mfcs", 2014, 2015, 2), ("mfcs", "mfcs", 2016, 2021, 1)],
            venues: [("mfcs", "mfcs", 1972, 2021)],
            exc: ["mfcs/mfcs98gs"]),
        roster_conf!("podc",
            ed: [("podc", "podc", 82, 99, 1), ("podc", "podc", 2000, 2021, 1)],
            venues: [("podc", "podc", 1982, 2021)]),
        roster_conf!("popl",
            ed: [("popl", "popl", 73, 99, 1), ("popl", "popl", 2000, 2017, 1)],
            venues: [("popl", "popl", 1973, 2017)]),
        roster_conf!("soda",
            ed: [("soda", "soda", 90, 99, 1), ("soda", "soda", 2000, 2021, 1)],
            venues: [("soda", "soda", 1990, 2021)]),
        roster_conf!("stacs",
            ed: [("stacs", "stacs", 84, 99, 1), ("stacs", "stacs", 2000, 2021, 1)],
            venues: [("stacs", "stacs", 1984, 2021)]),
        roster_conf!("stoc",
            ed: [("stoc", "stoc", 69, 92, 1), ("stoc", "stoc", 1993, 2021, 1)],
            venues: [("stoc", "stoc", 1969, 2021)]),
        roster_conf!("tacas",
            ed: [("tacas", "tacas", 95, 99, 1), ("tacas", "tacas", 2000, 2016, 1),
                 ("tacas", "tacas", 2017, 2018, 2), ("tacas", "tacas", 2019, 2019, 3),
                 ("tacas", "tacas", 2020, 2021, 2)],
            venues: [("tacas", "tacas", 1995, 2021)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_is_valid() {
        let roster = default_roster();
        assert_eq!(roster.len(), 18);
        for conf in &roster {
            conf.validate().unwrap();
        }
    }

    #[test]
    fn suffixes_zero_padded() {
        let ed = EditionSpec {
            kind: default_kind(),
            dir: "focs".to_string(),
            acronym: "focs".to_string(),
            first_suffix: 9,
            last_suffix: 9,
            parts: 1,
        };
        assert_eq!(ed.toc_keys(9), vec!["db/conf/focs/focs09.bht".to_string()]);
        assert_eq!(ed.toc_keys(99), vec!["db/conf/focs/focs99.bht".to_string()]);
    }

    #[test]
    fn multi_part_keys() {
        let ed = EditionSpec {
            kind: default_kind(),
            dir: "cav".to_string(),
            acronym: "cav".to_string(),
            first_suffix: 2016,
            last_suffix: 2021,
            parts: 2,
        };
        assert_eq!(
            ed.toc_keys(2016),
            vec![
                "db/conf/cav/cav2016-1.bht".to_string(),
                "db/conf/cav/cav2016-2.bht".to_string()
            ]
        );
    }

    #[test]
    fn inverted_years_rejected() {
        let mut conf = default_roster().pop().unwrap();
        conf.venues[0].first_year = 2022;
        assert!(conf.validate().is_err());
    }

    #[test]
    fn json_roundtrip_with_defaults() {
        let raw = r#"[{
            "acronym": "focs",
            "editions": [{"dir": "focs", "acronym": "focs",
                          "first_suffix": 60, "last_suffix": 99}],
            "venues": [{"dir": "focs", "acronym": "focs",
                        "first_year": 1960, "last_year": 2021}]
        }]"#;
        let confs: Vec<ConferenceConfig> = crate::common::deserialize_verbose(raw).unwrap();
        assert_eq!(confs[0].editions[0].kind, "conf");
        assert_eq!(confs[0].editions[0].parts, 1);
        assert!(confs[0].exceptions.is_empty());
        confs[0].validate().unwrap();
    }
}
