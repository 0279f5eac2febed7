//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (InputReader)
//! but are themselves concrete structs, not traits.

mod height;

pub use height::{HeightService, InputSource};
