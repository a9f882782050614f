//! Pure match transforms: the validator gate and the combinatorial flattener.

pub mod flattener;
pub mod validator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use flattener::flatten;
pub use validator::validate;
