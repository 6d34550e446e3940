pub mod appointment;
pub mod enums;
pub mod pet;
pub mod service;

pub use appointment::*;
pub use enums::*;
pub use pet::*;
pub use service::*;

/// Identifier issued by the entity store's shared sequence.
pub type RecordId = i64;
