//! Oracle-hint fuzzy matching (spec.md §4.9): Levenshtein similarity
//! against known symbol names, threshold 0.8, up to 5 suggestions.

use crate::features::dispatcher::domain::Suggestion;

pub fn suggest(offending_name: &str, known_names: &[String], threshold: f64, limit: usize) -> Vec<Suggestion> {
    let mut scored: Vec<Suggestion> = known_names
        .iter()
        .map(|name| Suggestion { name: name.clone(), score: similarity(offending_name, name) })
        .filter(|s| s.score >= threshold)
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - (levenshtein(a, b) as f64 / max_len as f64)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut prev_diag = row[0];
        row[0] = i;
        for j in 1..=b.len() {
            let temp = row[j];
            row[j] = if a[i - 1] == b[j - 1] {
                prev_diag
            } else {
                1 + prev_diag.min(row[j]).min(row[j - 1])
            };
            prev_diag = temp;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_exact_match_scores_one() {
        let known = vec!["process_data".to_string()];
        let suggestions = suggest("process_data", &known, 0.8, 5);
        assert_eq!(suggestions[0].score, 1.0);
    }

    #[test]
    fn a_near_miss_clears_the_threshold() {
        let known = vec!["process_data".to_string()];
        let suggestions = suggest("proces_data", &known, 0.8, 5);
        assert_eq!(suggestions.len(), 1);
    }

    #[test]
    fn an_unrelated_name_is_filtered_out() {
        let known = vec!["completely_unrelated_symbol".to_string()];
        let suggestions = suggest("process_data", &known, 0.8, 5);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn results_are_capped_at_the_limit() {
        let known: Vec<String> = (0..10).map(|_| "process_data".to_string()).collect();
        let suggestions = suggest("process_data", &known, 0.8, 5);
        assert_eq!(suggestions.len(), 5);
    }
}
