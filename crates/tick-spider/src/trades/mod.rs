//! Congressional trade disclosures: the record model, trade-size estimates, monthly
//! aggregation, storage and import, plus politician portraits.

mod sql;

pub mod images;
pub mod import;
pub mod record;
pub mod size;
pub mod store;
pub mod summary;

pub use record::{parse_trade_date, Direction, TradeRecord, TradeTriple};
pub use size::{size_to_numeric, SizeError, SizeRange};
pub use store::{PgTradeStore, TradeSource};
pub use summary::{aggregate, monthly_summary, MonthlyBucket, Summary};
