//! Page arithmetic for the list views.

mod error;
mod rows;
mod types;

pub use error::PageError;
pub use rows::chunk_rows;
pub use types::{Paginated, Pagination, ADMIN_PER_PAGE, DEFAULT_PER_PAGE};
