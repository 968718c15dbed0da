// Domain layer: request/audit models and the extractor port.

pub mod model;
pub mod ports;
