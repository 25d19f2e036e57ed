mod record;
mod store;

pub use record::{BaselineRecord, Cycle, Party, Shares};
pub use store::BaselineStore;
