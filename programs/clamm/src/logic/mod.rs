//! Engine logic: staging, ledgers, and the pool state machine

pub mod pool;
pub mod position_ledger;
pub mod protocol_fee;
pub mod swap;
pub mod tick_ledger;
pub mod unit_of_work;

pub use position_ledger::PositionLedger;
pub use protocol_fee::{authorize_collection, authorize_fee_config_change};
pub use swap::{SwapArgs, SwapOutcome};
pub use tick_ledger::TickLedger;
pub use unit_of_work::{TokenTransfer, WorkUnit};
