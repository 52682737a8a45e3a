//! Admin panel building blocks: search/pagination over fetched collections,
//! draft forms with submit-time normalization, and the guarded delete flow.

pub mod delete;
pub mod form;
pub mod listing;
