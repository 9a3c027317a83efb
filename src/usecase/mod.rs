pub mod attention;
pub mod staleness;
