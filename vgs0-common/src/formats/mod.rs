//! Binary formats consumed and produced by the packaging pipeline
//!
//! Headers are read through explicit field schemas ([`schema`]) rather than
//! struct overlays; every offset is checked against the buffer length.

pub mod bitmap;
pub mod game_package;
pub mod schema;

pub use bitmap::*;
pub use game_package::*;
pub use schema::{ByteCursor, Field};
