pub mod format;
pub mod parsing;

// Re-export commonly used items
pub use parsing::{OperatorInput, parse_operator_line};
