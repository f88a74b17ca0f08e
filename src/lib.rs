//! rfind - walk a directory tree, select entries by name, age or inode, and act on them

pub mod error;
pub mod find;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{ArgError, FindError};
pub use find::{
    Action, AgeComparison, Criteria, Criterion, FindConfig, ModAge, WalkSummary, Walker, evaluate,
};
