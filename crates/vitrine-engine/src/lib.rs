// Engine module - presenter registry and per-type callback chains
// This layer sits between domain objects (types) and whatever serializes the presented values

pub mod class;
pub mod registry;

pub use class::{normalize_with, ClassPresenter, PresentFn};
pub use registry::{Registry, RegistryOptions, ResolverFn};

pub use vitrine_types::{Error, Inclusions, Presentable, Result, Tagged, TypeTag, Value};
