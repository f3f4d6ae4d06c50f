//! The one place the crate reads the wall clock (spec.md §4.9 "Audit
//! record": `timestamp`; §6 backup file naming).

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
