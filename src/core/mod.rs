pub mod area;
pub mod audit;
pub mod extract;
pub mod pipeline;
pub mod validator;
pub mod workspace;

pub use crate::domain::model::{AuditRecord, GeoRequest};
pub use crate::domain::ports::Extractor;
pub use crate::utils::error::Result;
