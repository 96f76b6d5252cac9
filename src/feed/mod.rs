pub mod aux;
pub mod store;
pub mod stream;

pub use aux::{price_trend, AuxCache, Trend};
pub use store::{MarketStore, StreamOutcome};
