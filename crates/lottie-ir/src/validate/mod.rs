//! Validators (components F and G): the scene descriptor and, per bound
//! animation, the Lottie document it resolves to. Neither validator ever
//! fails outright — both accumulate [`crate::error::ValidationIssue`]s into
//! a [`crate::error::ValidationReport`] and leave it to the caller to decide
//! whether any `Severity::Error` entry should block compilation.

pub mod anim;
pub mod scene;
