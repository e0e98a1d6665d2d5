
/// Access type classification.
pub mod access_type;
