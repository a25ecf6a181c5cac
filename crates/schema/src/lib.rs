//! Entity schemas for the restaurant admin surface.
//!
//! Every admin page is driven by data from this crate rather than by
//! per-entity code:
//! * [`EntityType`]: the closed set of backend collections
//! * [`EntitySchema`]: ordered [`FieldDescriptor`]s for one entity
//! * [`FieldValue`] / [`Record`]: in-memory scalar values and records
//! * [`codec`]: JSON wire encoding and decoding against a schema
//! * [`validate`]: declarative per-field rules and messages

#![warn(missing_docs)]

mod catalog;
pub mod codec;
mod entity;
mod error;
mod field;
mod record;
pub mod validate;
mod value;

pub use catalog::EntitySchema;
pub use codec::DecodeError;
pub use entity::EntityType;
pub use error::UnknownEntity;
pub use field::{FieldDescriptor, FieldKind};
pub use record::{FieldValues, ID_FIELD, Record};
pub use validate::{FieldErrors, Rule};
pub use value::{FieldValue, InputError, midnight, parse_date, today};
