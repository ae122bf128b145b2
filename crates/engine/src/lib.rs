pub mod accrual;
pub mod clock;
pub mod ledger;
pub mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::AccrualLedger;
pub use snapshot::{AccountSnapshot, LedgerSnapshot};
