pub mod build_pdg;

pub use build_pdg::build_pdg;
