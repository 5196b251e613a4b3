//! CrudService: university and student queries built with the safe SQL builder.

mod crud;
mod validation;
pub use crud::{student_filters, university_filters, CrudService};
pub use validation::Validate;
