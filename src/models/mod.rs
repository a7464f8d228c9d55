pub mod account;
pub mod board;
pub mod inplay;

pub use account::{BetRecord, WalletDetails};
pub use board::{BoardPhase, BoardUpdate, OddsBoard};
pub use inplay::{ExchangeBook, InplayFeed, InplayMatch, PriceLevel, Runner};
