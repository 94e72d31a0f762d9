// vim: tw=80
//! Placement group sizing
//!
//! This is the formula behind the upstream Ceph "pgcalc" tool.  The growth
//! factor plays the role of pgcalc's "target PGs per OSD": 100 for a cluster
//! that won't grow, 200 if the OSD count is expected to double, and so on.

/// Number of copies kept of each object.  pgcalc calls this the pool's "size".
pub const REPLICA_COUNT: u64 = 3;

/// A power of two is never chosen if it is more than this far below the exact
/// value.
const ROUNDING_THRESHOLD: f64 = 0.25;

/// Round `value` to a power of two, but never down by more than 25%.
///
/// `value` must be at least 1.
fn nearest_power_of_2(value: u64) -> u64 {
    debug_assert!(value >= 1);
    let exact = value as f64;
    // Values near u64::MAX would round up to 2^64
    let exponent = (exact.log2().round() as u32).min(u64::BITS - 1);
    let nearest = 1u64 << exponent;
    if (nearest as f64) < exact * (1.0 - ROUNDING_THRESHOLD) {
        nearest.checked_mul(2).unwrap_or(nearest)
    } else {
        nearest
    }
}

/// Calculate the number of placement groups for one pool.
///
/// # Arguments
///
/// `osds`          -   Total number of OSDs in the cluster
/// `percent_data`  -   Fraction of the cluster's data that will live in this
///                     pool, in the range `[0, 1]`.
/// `growth_factor` -   Target PGs per OSD.  100 means no expected growth.
///
/// The result is always a power of two.  It is never smaller than the power
/// of two nearest `osds / 3 + 1`, so every OSD holds at least one primary or
/// secondary PG of every pool no matter how little data the pool gets.
pub fn pg_count(osds: u64, percent_data: f64, growth_factor: u32) -> u64 {
    let numerator = f64::from(growth_factor) * osds as f64 * percent_data;
    let before_pow2 = (numerator / REPLICA_COUNT as f64).floor().max(1.0);
    let pgs = nearest_power_of_2(before_pow2 as u64);
    let min_pgs = nearest_power_of_2(osds / REPLICA_COUNT + 1);
    pgs.max(min_pgs)
}

// LCOV_EXCL_STOP
