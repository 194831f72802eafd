pub mod bigint;
pub mod config;
pub mod error;
pub mod events;
pub mod telemetry;

pub use bigint::BigInt;
pub use config::{ContractAddresses, Settings, StoreBackend};
pub use error::AppError;
pub use events::{ChainEvent, EventKind, EventMeta, EventPayload, EventPosition, TokenType};
