// vim: tw=80
//! Assignment of OSD data devices to shared journal devices

/// Give every one of `count` OSD devices a journal from `journals`.
///
/// The OSDs are spread as evenly as possible: each journal gets
/// `count / journals.len()` of them, and the first `count % journals.len()`
/// journals get one more.  The result is grouped by journal, in the order the
/// journals were given, so the first journal's OSDs come first.
///
/// # Panics
///
/// If `journals` is empty but `count` is not zero.
pub fn distribute<T: Clone>(journals: &[T], count: usize) -> Vec<T> {
    if count == 0 {
        return Vec::new();
    }
    assert!(!journals.is_empty(), "Cannot journal {count} OSDs on no devices");

    let per_journal = count / journals.len();
    let remainder = count % journals.len();
    let mut assigned = Vec::with_capacity(count);
    for (i, journal) in journals.iter().enumerate() {
        let n = per_journal + usize::from(i < remainder);
        assigned.extend(std::iter::repeat(journal).take(n).cloned());
    }
    debug_assert_eq!(assigned.len(), count);
    assigned
}

// LCOV_EXCL_STOP
