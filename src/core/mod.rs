pub mod driver;
pub mod inspect;
pub mod writer;

pub use crate::domain::model::{CodeEntry, CodeSet, Domain, FieldBinding};
pub use crate::domain::ports::{DomainStore, ValueSource};
pub use crate::utils::error::Result;
pub use driver::{plan, DomainPlan, Driver, DriverOptions, RunSummary};
pub use writer::{DomainHandle, DomainWriter};
