//! Domain logic for estimate computation lives here.

pub mod app_state;
pub mod entities;
pub mod estimate;

#[allow(unused_imports)]
pub use app_state::{AppState, PersistedState};
#[allow(unused_imports)]
pub use entities::{
    EstimateLine, EstimateSettings, EstimateTotals, PriceEntry, PriceInfo, SelectionLine,
};
#[allow(unused_imports)]
pub use estimate::{compute_estimate, derive_key, Estimate, PriceLookup, DEFAULT_UNIT};
