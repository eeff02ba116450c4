pub mod state;
pub mod request;

pub use state::FilterState;
pub use request::{validate_filters, FilterRequest};
