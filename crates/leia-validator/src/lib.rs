//! Structural validation of JSON payloads against leia schemas.
//!
//! [`structural::validate`] walks a payload alongside a schema's attribute
//! list and collects every mismatch as a [`LeiaMessageViolation`]. The
//! [`MessageValidator`] trait is the seam the multiplexer validates through.

pub mod structural;
pub mod validator;
pub mod violation;

pub use structural::{validate, validate_at};
pub use validator::{MessageValidator, NoOpMessageValidator, StructuralMessageValidator};
pub use violation::LeiaMessageViolation;
