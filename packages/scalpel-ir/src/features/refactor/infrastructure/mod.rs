pub mod equivalence;
pub mod reference_scan;
pub mod structural_diff;

pub use equivalence::check_equivalence;
pub use reference_scan::{find_references, LiteralContext, REFERENCE_CATALOGUE_VERSION};
pub use structural_diff::diff_modules;
