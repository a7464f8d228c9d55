pub mod account_refresher;
pub mod odds_poller;
pub mod snapshot_writer;

pub use account_refresher::AccountRefresherWorker;
pub use odds_poller::OddsPollerWorker;
pub use snapshot_writer::SnapshotWriterWorker;
