//! HTTP Response domain types

mod json_path;
mod received;
mod spec;

pub use json_path::query_json_path;
pub use received::{Response, reason_phrase};
pub use spec::{LogDetail, ResponseSpec, StatusExpectation, StatusMismatch};
