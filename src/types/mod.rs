pub mod function;
pub mod issue;
pub mod report;

pub use function::{ClassInfo, CodeStructure, FunctionInfo};
pub use issue::{CodeIssue, Severity};
pub use report::{RefactorReport, RefactorResult};
