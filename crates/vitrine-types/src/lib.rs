pub mod error;
pub mod inclusions;
pub mod tag;
pub mod value;

pub use error::{Error, Result};
pub use inclusions::Inclusions;
pub use tag::{Presentable, Tagged, TypeTag};
pub use value::Value;
