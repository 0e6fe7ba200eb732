//! Ordering rules for merged result lists.

use fatwa_core::{SearchResult, SpecialSite, VideoResult};

/// Sort bucket of a search result: hadith grading first, then enabled
/// special sites, then everything else.
fn bucket(result: &SearchResult, special: &[SpecialSite]) -> u8 {
    if result.link.contains(SpecialSite::HADITH_GRADING.domain()) {
        0
    } else if special.iter().any(|site| result.link.contains(site.domain())) {
        1
    } else {
        2
    }
}

/// Stable-sort a concatenated search round into display order.
///
/// Input order is preserved within each bucket.
pub fn rank_search(mut results: Vec<SearchResult>, special: &[SpecialSite]) -> Vec<SearchResult> {
    results.sort_by_key(|result| bucket(result, special));
    results
}

/// Stable-sort videos newest first.
pub fn rank_videos(mut videos: Vec<VideoResult>) -> Vec<VideoResult> {
    videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    videos
}
