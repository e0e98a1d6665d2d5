
/// Dirty evictions and their propagation.
pub mod writeback;
