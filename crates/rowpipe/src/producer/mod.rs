mod chunked;
mod epoch;
mod tick;

pub use chunked::*;
pub use epoch::*;
pub use tick::*;
