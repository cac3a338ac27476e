//! File-facing collaborators: price-list ingestion and estimate export.

pub mod export;
pub mod price_list;
