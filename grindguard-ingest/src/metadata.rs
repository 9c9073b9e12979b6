//! Parse the judge metadata CSV (acceptance rate, company tags, premium flag)
//! and attach it to sheet problems by normalized slug.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use grindguard_core::{normalize_slug, Problem, ProblemMeta};

#[derive(Debug, Deserialize)]
struct MetadataRow {
    #[serde(default)]
    url: String,
    #[serde(default)]
    acceptance_rate: String,
    #[serde(default)]
    frequency: String,
    #[serde(default)]
    companies: String,
    #[serde(default)]
    is_premium: String,
}

/// Parse the metadata CSV into a slug-keyed map. Rows without a URL are
/// skipped; unparseable numeric fields default to zero.
pub fn parse_metadata<R: Read>(reader: R) -> Result<HashMap<String, ProblemMeta>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut map = HashMap::new();
    for row in rdr.deserialize::<MetadataRow>() {
        let row = match row {
            Ok(r) => r,
            Err(_) => continue,
        };
        if row.url.is_empty() {
            continue;
        }

        let companies: Vec<String> = row
            .companies
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        map.insert(
            normalize_slug(&row.url),
            ProblemMeta {
                acceptance_rate: row.acceptance_rate.parse().unwrap_or(0.0),
                frequency: row.frequency.parse().unwrap_or(0.0),
                companies,
                is_premium: row.is_premium == "1",
            },
        );
    }

    Ok(map)
}

/// Parse the metadata CSV from disk.
pub fn parse_metadata_file(path: impl AsRef<Path>) -> Result<HashMap<String, ProblemMeta>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_metadata(file)
}

/// Attach metadata to every problem whose slug the map knows.
pub fn apply_metadata(problems: &mut [Problem], meta: &HashMap<String, ProblemMeta>) {
    for p in problems {
        if let Some(m) = meta.get(&p.slug()) {
            p.meta = Some(m.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grindguard_core::Difficulty;

    const CSV: &str = "\
id,title,acceptance_rate,frequency,url,companies,likes,dislikes,is_premium
1,Two Sum,49.1,95.2,https://leetcode.com/problems/two-sum,\"Amazon, Google\",100,5,0
2,Hidden,60.0,10.0,https://leetcode.com/problems/hidden-gem,,3,0,1
3,No Url,12.0,1.0,,Meta,1,0,0
";

    #[test]
    fn parses_and_keys_by_slug() {
        let map = parse_metadata(CSV.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);

        let two_sum = map.get("two-sum").unwrap();
        assert_eq!(two_sum.acceptance_rate, 49.1);
        assert_eq!(two_sum.companies, vec!["Amazon", "Google"]);
        assert!(!two_sum.is_premium);

        assert!(map.get("hidden-gem").unwrap().is_premium);
        assert!(map.get("hidden-gem").unwrap().companies.is_empty());
    }

    #[test]
    fn attaches_to_matching_problems() {
        let map = parse_metadata(CSV.as_bytes()).unwrap();
        let mut problems = vec![
            Problem::new(
                "Two Sum",
                "https://leetcode.com/problems/Two-Sum/description",
                "Arrays",
                Difficulty::Easy,
            ),
            Problem::new(
                "3Sum",
                "https://leetcode.com/problems/3sum",
                "Arrays",
                Difficulty::Medium,
            ),
        ];
        apply_metadata(&mut problems, &map);

        assert!(problems[0].meta.is_some());
        assert_eq!(problems[0].meta.as_ref().unwrap().frequency, 95.2);
        assert!(problems[1].meta.is_none());
    }
}
