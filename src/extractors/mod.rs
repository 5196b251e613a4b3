mod validated;
pub use validated::{ValidJson, ValidQuery};
