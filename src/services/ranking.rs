use std::cmp::Ordering;

use crate::models::ReleaseItem;

/// Orders releases by rating, best first
///
/// Missing ratings count as 0.0. Equal ratings fall back to title in alphabetical
/// order, compared case-insensitively. The sort is stable, so releases equal on both
/// keys keep their incoming order.
pub fn rank(mut items: Vec<ReleaseItem>) -> Vec<ReleaseItem> {
    items.sort_by(compare);
    items
}

fn compare(a: &ReleaseItem, b: &ReleaseItem) -> Ordering {
    b.rank_score()
        .total_cmp(&a.rank_score())
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn item(title: &str, rating: Option<f64>) -> ReleaseItem {
        ReleaseItem {
            title: title.to_string(),
            year: None,
            release_date: None,
            genre: None,
            platforms: BTreeSet::new(),
            rating,
            plot: None,
        }
    }

    fn titles(items: &[ReleaseItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_higher_rating_first() {
        let ranked = rank(vec![
            item("Low", Some(5.1)),
            item("High", Some(8.7)),
            item("Mid", Some(7.0)),
        ]);
        assert_eq!(titles(&ranked), vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_missing_rating_ranks_as_zero() {
        let ranked = rank(vec![
            item("Unrated", None),
            item("Poor", Some(1.2)),
            item("Zero", Some(0.0)),
        ]);
        assert_eq!(titles(&ranked), vec!["Poor", "Unrated", "Zero"]);
    }

    #[test]
    fn test_ties_broken_alphabetically() {
        let ranked = rank(vec![
            item("charlie", Some(7.5)),
            item("Alpha", Some(7.5)),
            item("Bravo", Some(7.5)),
        ]);
        assert_eq!(titles(&ranked), vec!["Alpha", "Bravo", "charlie"]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let mut first = item("Same", Some(6.0));
        first.year = Some(2001);
        let mut second = item("Same", Some(6.0));
        second.year = Some(2024);

        let ranked = rank(vec![first, second]);
        assert_eq!(ranked[0].year, Some(2001));
        assert_eq!(ranked[1].year, Some(2024));
    }

    #[test]
    fn test_ranked_order_respects_ratings_pairwise() {
        let ratings = [3.3, 9.1, 0.0, 7.7, 7.7, 2.0, 8.8];
        let items: Vec<ReleaseItem> = ratings
            .iter()
            .enumerate()
            .map(|(i, r)| item(&format!("T{}", i), Some(*r)))
            .collect();

        let ranked = rank(items);
        for pair in ranked.windows(2) {
            assert!(pair[0].rank_score() >= pair[1].rank_score());
        }
    }
}
