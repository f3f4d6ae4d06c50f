pub mod formula;
pub mod sort;

pub use formula::{ConcreteValue, Formula};
pub use sort::Sort;
