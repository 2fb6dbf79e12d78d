//! Catalog records and the entity-store boundary
//!
//! The engine reads immutable snapshots of these collections; creating,
//! editing and deleting them is the store's business.

pub mod dimension;
pub mod id_list;
pub mod store;
pub mod types;

pub use dimension::{Dimension, RecordFilter};
pub use id_list::{normalize_id_list, IdList, IdListError};
pub use store::{Catalog, CatalogSource};
pub use types::{
    BizDevPhase, Category, Department, EngagementLevel, Entity, Initiative, Status, Subject, Theme,
    Topic, Vc,
};
