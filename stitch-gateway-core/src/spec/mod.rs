mod field_type;
mod fragments;
mod operation;
mod schema;
mod selection;

pub use field_type::*;
pub use fragments::*;
pub use operation::*;
pub use schema::*;
pub use selection::*;
