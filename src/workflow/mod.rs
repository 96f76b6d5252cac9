pub mod mint;
pub mod portfolio;
pub mod trade;

pub use mint::{MintStage, MintWorkflow};
pub use portfolio::PortfolioView;
pub use trade::TradeWorkflow;
