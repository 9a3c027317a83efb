pub mod identity;
pub mod merge_request;
pub mod report;
