use log::debug;

use crate::classify::RegionCandidate;

/// Cross-band deduplication.
///
/// Candidates are visited in descending pixel-area order; a candidate
/// whose centroid lies within `distance_px` of an already-accepted region
/// is a duplicate and the larger of the two survives. Overlay renderers
/// frequently draw the same zone in two shades, so the same marker shows
/// up once per band.
pub fn dedup_by_center(mut candidates: Vec<RegionCandidate>, distance_px: f64) -> Vec<RegionCandidate> {
    let before = candidates.len();
    candidates.sort_by(|a, b| b.stats.area.total_cmp(&a.stats.area));

    let mut accepted: Vec<RegionCandidate> = Vec::new();
    'next: for candidate in candidates {
        for existing in accepted.iter_mut() {
            let d = (candidate.stats.centroid - existing.stats.centroid).norm();
            if d < distance_px {
                // Conflict: keep whichever is strictly larger.
                if candidate.stats.area > existing.stats.area {
                    *existing = candidate;
                }
                continue 'next;
            }
        }
        accepted.push(candidate);
    }

    debug!("merged {} candidates down to {}", before, accepted.len());
    accepted
}
