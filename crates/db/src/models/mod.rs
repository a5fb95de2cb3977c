//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod frame;
pub mod job;
pub mod node;
pub mod particle;
pub mod status;
pub mod texture;
