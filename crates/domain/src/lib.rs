//! Domain layer for the routing gateway
//!
//! Contains the provider-agnostic vocabulary shared by every other crate:
//! coordinates, travel modes, provider identities, normalized routes,
//! resolved places and mobility events. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
