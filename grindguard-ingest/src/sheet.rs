//! Parse the curated problem sheet CSV into [`Problem`]s.
//!
//! Two shapes are in the wild:
//! - Standard: `QuestionName`/`ProblemName`, `LeetCodeLink`, `Topic`,
//!   `Difficulty` headers.
//! - Raw dump (has a `FilePath` column): names carry `NN.` numbering, file
//!   extensions, and underscores; topic/difficulty live in the path
//!   (`Sheet\01.Arrays\1.Easy\...`); links are often missing and get
//!   synthesized from the cleaned name.
//!
//! Individual bad rows are skipped, never fatal.

use anyhow::{Context, Result};
use regex::Regex;
use std::io::Read;
use std::path::Path;

use grindguard_core::{normalize_problem_name, Difficulty, Problem};

/// Parse a sheet CSV from any reader.
pub fn parse_sheet<R: Read>(reader: R) -> Result<Vec<Problem>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("reading sheet headers")?.clone();
    let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let name_col = col("QuestionName").or_else(|| col("ProblemName"));
    let link_col = col("LeetCodeLink");
    let topic_col = col("Topic");
    let difficulty_col = col("Difficulty");
    let filepath_col = col("FilePath");

    let lead_number = Regex::new(r"^\d+\.").unwrap();
    let extension = Regex::new(r"\.(cpp|java|py)$").unwrap();

    let mut problems = Vec::new();
    for record in rdr.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => continue,
        };
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

        let mut name = field(name_col).to_string();
        let mut link = field(link_col).to_string();
        let mut topic = field(topic_col).to_string();
        let mut difficulty = Difficulty::from_label(field(difficulty_col));

        let file_path = field(filepath_col);
        if !file_path.is_empty() {
            // Raw-dump cleanup: "01.Largest_element_in_array.cpp" ->
            // "Largest element in array".
            name = extension
                .replace(&lead_number.replace(&name, ""), "")
                .replace('_', " ")
                .trim()
                .to_string();

            // "Sheet\01.Arrays\1.Easy\file.cpp": component 1 is the topic,
            // component 2 names the difficulty when the sheet column doesn't.
            let parts: Vec<&str> = file_path.split('\\').collect();
            if parts.len() >= 3 {
                let raw_topic = lead_number.replace(parts[1], "").trim().to_string();
                if !raw_topic.is_empty() {
                    topic = raw_topic;
                }
                if difficulty == Difficulty::Unknown {
                    difficulty = Difficulty::from_label(parts[2]);
                }
            }
        }

        if name.is_empty() && link.is_empty() {
            continue;
        }
        if name.is_empty() {
            name = "Unknown".to_string();
        }
        if link.is_empty() {
            link = format!(
                "https://leetcode.com/problems/{}",
                normalize_problem_name(&name)
            );
        }
        if topic.is_empty() {
            topic = "Unknown".to_string();
        }

        problems.push(Problem::new(name, link, topic, difficulty));
    }

    Ok(problems)
}

/// Parse a sheet CSV from disk.
pub fn parse_sheet_file(path: impl AsRef<Path>) -> Result<Vec<Problem>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_sheet(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_format() {
        let csv = "\
QuestionName,LeetCodeLink,Topic,Difficulty
Two Sum,https://leetcode.com/problems/two-sum,Arrays,Easy
3Sum,https://leetcode.com/problems/3sum,Arrays,Medium
LRU Cache,https://leetcode.com/problems/lru-cache,Design,Medium
";
        let problems = parse_sheet(csv.as_bytes()).unwrap();
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[0].name, "Two Sum");
        assert_eq!(problems[0].topic, "Arrays");
        assert_eq!(problems[0].difficulty, Difficulty::Easy);
        assert_eq!(problems[2].slug(), "lru-cache");
    }

    #[test]
    fn parses_raw_dump_format() {
        let csv = "\
Topic,ProblemName,Difficulty,TimeComplexity,SpaceComplexity,FilePath,LeetCodeLink
1.Easy,01.Largest_element_in_array.cpp,Unknown,O(n),O(1),Sheet\\01.Arrays\\1.Easy\\01.Largest_element_in_array.cpp,
2.Medium,03.Three_sum.cpp,Unknown,O(n^2),O(1),Sheet\\01.Arrays\\2.Medium\\03.Three_sum.cpp,https://leetcode.com/problems/3sum
";
        let problems = parse_sheet(csv.as_bytes()).unwrap();
        assert_eq!(problems.len(), 2);

        assert_eq!(problems[0].name, "Largest element in array");
        assert_eq!(problems[0].topic, "Arrays");
        assert_eq!(problems[0].difficulty, Difficulty::Easy);
        // Link synthesized from the cleaned name.
        assert_eq!(
            problems[0].link,
            "https://leetcode.com/problems/largest-element-in-array"
        );

        // Explicit link wins over synthesis; difficulty comes from the path.
        assert_eq!(problems[1].slug(), "3sum");
        assert_eq!(problems[1].difficulty, Difficulty::Medium);
    }

    #[test]
    fn skips_empty_rows_without_failing() {
        let csv = "\
QuestionName,LeetCodeLink,Topic,Difficulty
,,,
Two Sum,https://leetcode.com/problems/two-sum,Arrays,Easy
";
        let problems = parse_sheet(csv.as_bytes()).unwrap();
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn missing_topic_defaults_to_unknown() {
        let csv = "\
QuestionName,LeetCodeLink,Topic,Difficulty
Mystery,https://leetcode.com/problems/mystery,,
";
        let problems = parse_sheet(csv.as_bytes()).unwrap();
        assert_eq!(problems[0].topic, "Unknown");
        assert_eq!(problems[0].difficulty, Difficulty::Unknown);
    }
}
