use serde::Deserialize;

use crate::common::Year;
use crate::corpus::{Publication, ARTICLE, INPROCEEDINGS};

/// Venue urls that keep a publication countable even when its publ_type
/// would exclude it.
pub const TYPE_EXCEPTION_ALLOW: &[&str] = &["eurocrypt/eurocrypt86"];

const INFORMAL: &str = "informal";
const WITHDRAWN: &str = "withdrawn";

/// One conference-restricted matching rule: a venue url prefix with a
/// closed year interval.
#[derive(Deserialize, Debug, Clone)]
pub struct VenueRule {
    pub dir: String,
    pub acronym: String,
    pub first_year: Year,
    pub last_year: Year,
}

/// Substring matching on venue urls is permissive on purpose; false
/// positives are compensated by the exception list.
pub struct VenueClassifier {
    rules: Vec<VenueRule>,
    patterns: Vec<String>,
    exceptions: Vec<String>,
}

impl VenueClassifier {
    pub fn new(rules: &[VenueRule], exceptions: &[String]) -> Self {
        let patterns = rules
            .iter()
            .map(|r| format!("{}/{}", r.dir, r.acronym).to_uppercase())
            .collect();
        Self {
            rules: rules.to_vec(),
            patterns,
            exceptions: exceptions.iter().map(|e| e.to_uppercase()).collect(),
        }
    }

    /// Number of rules accepting (url, year); each accepting rule counts one
    /// conference-restricted occurrence.
    pub fn match_count(&self, url: &str, year: Year) -> usize {
        let url_up = url.to_uppercase();
        if self.exceptions.iter().any(|e| url_up.contains(e)) {
            return 0;
        }
        let mut count = 0;
        for (rule, pattern) in self.rules.iter().zip(self.patterns.iter()) {
            if url_up.contains(pattern)
                && !url_up.contains(&format!("{}W", pattern))
                && !url_up.contains(&format!("{}{}W", pattern, year))
                && rule.first_year <= year
                && year <= rule.last_year
            {
                count += 1;
            }
        }
        count
    }

    pub fn accepts(&self, url: &str, year: Year) -> bool {
        self.match_count(url, year) > 0
    }
}

/// Tag/type eligibility for collaboration counting: journal and conference
/// papers that are neither informal nor withdrawn, with a fixed allow-list
/// overriding the type exclusion.
pub fn is_countable(publication: &Publication) -> bool {
    let type_ok = match publication.publ_type.as_deref() {
        Some(INFORMAL) | Some(WITHDRAWN) => false,
        _ => true,
    };
    let allowed = type_ok
        || TYPE_EXCEPTION_ALLOW
            .iter()
            .any(|a| contains_ci(&publication.url, a));
    allowed && (publication.tag == ARTICLE || publication.tag == INPROCEEDINGS)
}

pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}
