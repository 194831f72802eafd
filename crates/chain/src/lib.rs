pub mod abi;
pub mod decoder;
pub mod provider;
pub mod registry;

pub use decoder::decode_log;
pub use provider::{ChainProvider, create_provider};
pub use registry::{ContractKind, ContractRegistry};
