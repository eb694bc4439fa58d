//! Page neighborhood expansion.
//!
//! Evidence for a clause often spills onto adjacent pages, so every ranked
//! hit pulls in its neighbors before harvesting.

use std::collections::HashSet;

use crate::rank::PageHit;

/// A candidate page carrying the base score inherited from the hit that
/// reached it first.
#[derive(Debug, Clone)]
pub struct ScoredPage {
    pub document_id: String,
    pub page: u32,
    pub base_score: f32,
}

/// Expand each hit ± `radius` pages, clamped to page ≥ 1, deduplicated by
/// (document_id, page).
///
/// When several hits reach the same page, the FIRST base score seen is kept,
/// not the maximum. Downstream ordering depends on this; see DESIGN.md
/// before changing it.
pub fn expand_neighborhoods(
    hits: &[PageHit],
    radius: u32,
    base_score_factor: f32,
) -> Vec<ScoredPage> {
    let mut seen: HashSet<(String, u32)> = HashSet::new();
    let mut pages = Vec::new();

    for hit in hits {
        let base_score = hit.similarity * base_score_factor;
        let lo = hit.page.saturating_sub(radius).max(1);
        let hi = hit.page.saturating_add(radius);
        for page in lo..=hi {
            if seen.insert((hit.document_id.clone(), page)) {
                pages.push(ScoredPage {
                    document_id: hit.document_id.clone(),
                    page,
                    base_score,
                });
            }
        }
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(document_id: &str, page: u32, similarity: f32) -> PageHit {
        PageHit {
            document_id: document_id.to_string(),
            page,
            similarity,
        }
    }

    #[test]
    fn test_radius_window() {
        let pages = expand_neighborhoods(&[hit("a.pdf", 10, 0.8)], 3, 0.25);
        let numbers: Vec<u32> = pages.iter().map(|p| p.page).collect();
        assert_eq!(numbers, vec![7, 8, 9, 10, 11, 12, 13]);
        for p in &pages {
            assert!((p.base_score - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_clamps_at_page_one() {
        let pages = expand_neighborhoods(&[hit("a.pdf", 2, 0.9)], 3, 0.25);
        let numbers: Vec<u32> = pages.iter().map(|p| p.page).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert!(pages.iter().all(|p| p.page >= 1));
    }

    #[test]
    fn test_first_wins_on_overlap() {
        // Page 4 is reachable from both hits; the first (higher-ranked) hit
        // supplies its base score.
        let pages = expand_neighborhoods(
            &[hit("a.pdf", 3, 0.8), hit("a.pdf", 5, 0.4)],
            1,
            0.25,
        );
        let page4: Vec<&ScoredPage> = pages.iter().filter(|p| p.page == 4).collect();
        assert_eq!(page4.len(), 1);
        assert!((page4[0].base_score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_documents_do_not_collide() {
        let pages = expand_neighborhoods(
            &[hit("a.pdf", 1, 0.8), hit("b.pdf", 1, 0.6)],
            0,
            0.25,
        );
        assert_eq!(pages.len(), 2);
    }
}
