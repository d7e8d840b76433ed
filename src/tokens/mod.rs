/// Token metadata
pub mod registry;

pub use registry::{
    HttpRegistryLoader, RegistryCache, RegistryError, RegistryLoader, TokenInfo, TokenMap,
};
