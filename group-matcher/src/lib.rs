pub mod dsu;
pub mod engine;
pub mod error;
pub mod groups;
pub mod matcher;
pub mod record;
pub mod report;

pub use engine::GroupingEngine;
pub use error::GroupingError;
pub use groups::{Group, Grouping};
pub use matcher::{process, run, Summary};
pub use record::{RecordError, RecordFormat, Value};
