//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod partner;
pub mod payment;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use partner::{
    Column as PartnerColumn, Entity as Partner, Model as PartnerModel, PartnerKind,
};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use transaction::{
    Column as TransactionColumn, Direction, Entity as Transaction, LineItem, LineItems,
    Model as TransactionModel,
};
