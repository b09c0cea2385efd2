mod goal;
mod owner;
mod record;

pub use goal::Goal;
pub use owner::Owner;
pub use record::{MoneyRecord, RecordKind};
