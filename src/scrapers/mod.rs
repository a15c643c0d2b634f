//! Single-endpoint dataset pulls.
//!
//! Unlike the news pipeline, these sources expose one structured endpoint
//! each and need no discovery or fallback logic:
//!
//! | Source | Module | Format |
//! |--------|--------|--------|
//! | arXiv | [`arxiv`] | Atom API |
//! | Codeforces | [`codeforces`] | JSON API |
//!
//! Both follow the same shape: fetch, parse, cap, write rows. Fetch or parse
//! failures are logged warnings and leave the dataset with only its header
//! row.

pub mod arxiv;
pub mod codeforces;
