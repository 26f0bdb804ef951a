//! Per-dimension attribute comparisons
//!
//! Each function returns either its full weight or 0. An absent value on
//! either side always yields 0: absence is never a penalty and never an error.

use crate::models::FurnishingState;

/// Property type identifiers must be equal
#[inline]
pub fn property_type_points(preferred: Option<i32>, actual: Option<i32>, weight: u32) -> u32 {
    match (preferred, actual) {
        (Some(p), Some(a)) if p == a => weight,
        _ => 0,
    }
}

/// Exact room count equality, used for both bedrooms and bathrooms
#[inline]
pub fn room_count_points(desired: Option<i32>, actual: Option<i32>, weight: u32) -> u32 {
    match (desired, actual) {
        (Some(d), Some(a)) if d == a => weight,
        _ => 0,
    }
}

/// Case-insensitive exact city match
pub fn city_points(preferred: Option<&str>, actual: Option<&str>, weight: u32) -> u32 {
    match (present(preferred), present(actual)) {
        (Some(p), Some(a)) if p.to_lowercase() == a.to_lowercase() => weight,
        _ => 0,
    }
}

/// Preferred location must appear, case-insensitively, inside the address
pub fn location_points(preferred: Option<&str>, address: Option<&str>, weight: u32) -> u32 {
    match (present(preferred), present(address)) {
        (Some(needle), Some(haystack)) if haystack.to_lowercase().contains(&needle.to_lowercase()) => {
            weight
        }
        _ => 0,
    }
}

/// Awarded only when furnishing was asked for and the listing is semi or fully furnished
#[inline]
pub fn furnishing_points(wants_furnished: bool, state: Option<FurnishingState>, weight: u32) -> u32 {
    match state {
        Some(state) if wants_furnished && state.is_furnished() => weight,
        _ => 0,
    }
}

#[inline]
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
