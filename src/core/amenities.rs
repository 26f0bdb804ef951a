use std::collections::HashSet;

/// Amenity ids shared by both sides, ascending
pub fn shared_amenities(reference: &HashSet<i32>, candidate: &HashSet<i32>) -> Vec<i32> {
    // Walk the smaller set
    let (small, large) = if reference.len() <= candidate.len() {
        (reference, candidate)
    } else {
        (candidate, reference)
    };

    let mut shared: Vec<i32> = small.iter().filter(|id| large.contains(id)).copied().collect();
    shared.sort_unstable();
    shared
}

/// Uncapped bonus: `shared_count * per_amenity`
#[inline]
pub fn amenity_points(shared_count: usize, per_amenity: u32) -> u32 {
    u32::try_from(shared_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(per_amenity)
}
