pub mod change_record;
pub mod refactor_result;

pub use change_record::{ChangeKind, ChangeRecord, ReferenceLocation};
pub use refactor_result::{Equivalence, RefactorResult};
