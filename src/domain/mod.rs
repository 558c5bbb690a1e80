//! Domain entities. No framework or storage types in here.

pub mod event;
pub mod order;
pub mod transaction;

pub use event::{Event, EventType};
pub use order::{OrderFields, OrderRequest, OrderResponse, OrderState};
pub use transaction::{
    NewTransaction, Transaction, TransactionStatus, TransactionUpdate, UnknownVariant,
};
