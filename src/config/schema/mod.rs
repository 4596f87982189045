mod core;
mod gateway;
mod observability;
mod store;

pub use core::Config;
pub use gateway::GatewayConfig;
pub use observability::ObservabilityConfig;
pub use store::{StoreBackendKind, StoreConfig};
