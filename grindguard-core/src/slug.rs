//! Slug normalization: every component compares problems by normalized slug.

/// Canonicalize a problem identifier (judge URL or raw slug) into a lowercase
/// comparison key.
///
/// - No `/` in the input: already a slug, lowercase it.
/// - Otherwise take the segment after `/problems/`, dropping sub-routes like
///   `/description`, query strings, and a trailing slash.
/// - Anything unrecognizable falls back to the lowercased input. Never fails.
///
/// Idempotent: `normalize_slug(normalize_slug(x)) == normalize_slug(x)`.
pub fn normalize_slug(input: &str) -> String {
    let trimmed = input.trim();
    if !trimmed.contains('/') {
        return trimmed.to_lowercase();
    }

    match trimmed.split_once("/problems/") {
        Some((_, rest)) => {
            let slug = rest
                .split('/')
                .next()
                .unwrap_or(rest)
                .split('?')
                .next()
                .unwrap_or(rest);
            slug.trim().to_lowercase()
        }
        None => trimmed.to_lowercase(),
    }
}

/// Normalize a human-readable problem name into slug form.
/// "Best Time to Buy and Sell Stock" -> "best-time-to-buy-and-sell-stock".
pub fn normalize_problem_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
        // Other punctuation is dropped entirely, matching "3Sum" -> "3sum".
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_slug_passes_through_lowercased() {
        assert_eq!(normalize_slug("Two-Sum"), "two-sum");
        assert_eq!(normalize_slug("two-sum"), "two-sum");
    }

    #[test]
    fn url_variants_collapse_to_same_slug() {
        let expect = "two-sum";
        for url in [
            "https://leetcode.com/problems/two-sum",
            "https://leetcode.com/problems/two-sum/",
            "https://leetcode.com/problems/Two-Sum/description",
            "https://leetcode.com/problems/two-sum?envType=daily",
            "https://leetcode.com/problems/two-sum/solutions/12345/",
        ] {
            assert_eq!(normalize_slug(url), expect, "url: {url}");
        }
    }

    #[test]
    fn idempotent() {
        for input in [
            "https://leetcode.com/problems/LRU-Cache/description",
            "3Sum",
            "not a url at all",
            "https://example.com/no-marker/here",
        ] {
            let once = normalize_slug(input);
            assert_eq!(normalize_slug(&once), once);
        }
    }

    #[test]
    fn missing_marker_falls_back_to_lowercase() {
        assert_eq!(
            normalize_slug("https://example.com/Other/Path"),
            "https://example.com/other/path"
        );
    }

    #[test]
    fn name_normalization() {
        assert_eq!(normalize_problem_name("Two Sum"), "two-sum");
        assert_eq!(
            normalize_problem_name("Best Time to Buy and Sell Stock"),
            "best-time-to-buy-and-sell-stock"
        );
        assert_eq!(normalize_problem_name("3Sum"), "3sum");
        assert_eq!(normalize_problem_name("Kth Largest (Heap)"), "kth-largest-heap");
    }
}
