mod dataset;
mod record;
mod schema;
mod value;

pub use dataset::*;
pub use record::*;
pub use schema::*;
pub use value::*;
