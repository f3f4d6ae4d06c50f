pub mod simulate_refactor;

pub use simulate_refactor::{simulate_refactor, RefactorInput};
