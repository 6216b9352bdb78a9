mod persisted;
mod product;
mod promotion;
mod timestamp;
mod voucher;

pub use persisted::*;
pub use product::*;
pub use promotion::*;
pub use voucher::*;
