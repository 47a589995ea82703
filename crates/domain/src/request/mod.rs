//! Request descriptions and the concrete requests built from them

mod header;
mod method;
mod prepared;
mod query;
mod spec;

pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use prepared::PreparedRequest;
pub use query::{QueryParam, QueryParams};
pub use spec::{DEFAULT_TIMEOUT_MS, RequestSpec};
