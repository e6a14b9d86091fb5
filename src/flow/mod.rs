pub mod conversion;
pub mod definition;
pub mod document;
pub mod validation;

pub use conversion::*;
pub use definition::*;
pub use validation::validate;
