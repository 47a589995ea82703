//! Restcheck Domain - Core types
//!
//! This crate defines the domain model for the restcheck API test harness:
//! request and response specifications, received responses, resource
//! payloads, settings and the report model.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod model;
pub mod request;
pub mod response;
pub mod settings;
pub mod testing;
pub mod worker;

pub use error::{DomainError, DomainResult};
pub use model::{Gender, Product, User, UserStatus};
pub use request::{Header, Headers, HttpMethod, PreparedRequest, QueryParam, QueryParams, RequestSpec};
pub use response::{LogDetail, Response, ResponseSpec, StatusExpectation, StatusMismatch};
pub use settings::{Settings, SettingsError};
pub use testing::{LogLevel, LogLine, Report, ReportEntry, ReportSummary, ScenarioStatus};
pub use worker::WorkerId;
