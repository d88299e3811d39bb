//! Database models and types module.
//! Row structs, query-string filter types and JSON response bodies.

mod db_models; // Table rows and inserts
mod params; // Listing filters built from query strings
mod responses; // API request/response bodies

pub use db_models::*;
pub use params::*;
pub use responses::*;
