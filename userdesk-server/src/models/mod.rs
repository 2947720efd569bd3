//! Request-side models with validation at construction
//!
//! Submitted fields are stripped of blanks first, then validated into
//! typed inputs. Invalid input returns ValidationErrors, not panic.

pub mod fields;
pub mod user;
pub mod validation;

pub use fields::strip_empty;
pub use user::{NewUser, UserChanges};
pub use validation::{is_valid_email, ValidationErrors};
