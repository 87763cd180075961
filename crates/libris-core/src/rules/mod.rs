pub mod validation;

pub use validation::{
    AuthorForUpdateValidator, BookForCreationValidator, ValidationErrors, Validator,
};
