pub mod limits;
pub mod module_updater;
pub mod pipeline;
pub mod registry;
pub mod resizer;
pub mod scale;
pub mod scheduler;
pub mod updater;

pub use crate::domain::model::{Dimensions, Part, PartId};
pub use crate::domain::ports::{PartLookup, PrototypeCatalog, TechProgress};
pub use crate::utils::error::Result;
