mod interface;
mod users;

pub use interface::*;
pub use users::*;
