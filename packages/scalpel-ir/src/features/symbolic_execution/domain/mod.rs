pub mod path;
pub mod state;
pub mod symbolic_value;
pub mod test_case;

pub use path::{Path, PathStatus, Terminal};
pub use state::{LoopAnnotation, SymbolicState};
pub use symbolic_value::SymbolicValue;
pub use test_case::TestCase;
