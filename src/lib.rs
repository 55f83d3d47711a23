pub mod error;
pub mod invert;
pub mod load;
pub mod preset;
pub mod render;

pub use error::{ColumnRole, InvertError};
pub use invert::{invert, ColumnSpec, InvertedMap, Table};
