//! Fuzzy matching for "did you mean" suggestions on attribute names.

use strsim::levenshtein;

/// Find the closest candidate to `input`, if any is near enough.
pub fn did_you_mean<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    // Dynamic threshold based on length, in chars like levenshtein
    let threshold = match input.chars().count() {
        0..=2 => 0,
        3..=5 => 2,
        _ => 3,
    };

    let mut best_match = None;
    let mut min_dist = usize::MAX;

    for cand in candidates {
        // Attribute names are often camelCase; compare case-insensitively.
        let dist = levenshtein(&input.to_lowercase(), &cand.to_lowercase());
        if dist <= threshold && dist < min_dist {
            min_dist = dist;
            best_match = Some(cand.to_string());
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_did_you_mean() {
        let names = ["id", "firstName", "lastName", "age"];
        assert_eq!(did_you_mean("agee", names), Some("age".to_string()));
        assert_eq!(did_you_mean("firstname", names), Some("firstName".to_string()));
        assert_eq!(did_you_mean("frstNme", names), Some("firstName".to_string()));
        assert_eq!(did_you_mean("zz", names), None);
    }

    #[test]
    fn test_threshold_counts_chars() {
        let names = ["id", "firstName", "age"];
        assert_eq!(did_you_mean("名前", names), None);
        assert_eq!(did_you_mean("ïd", names), None);
        assert_eq!(did_you_mean("agée", names), Some("age".to_string()));
    }
}
