//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust structs without hand-written SQL. On top of the tables, a
//! compound (partner_id, date) index is created for transactions and for
//! payments; the balance engine's range scans lean on it.

use crate::entities::{Partner, Payment, Transaction};
use crate::errors::Result;
use sea_orm::sea_query::{Alias, Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/debtbook.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

fn partner_date_index(table: &str, name: &str) -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name(name)
        .table(Alias::new(table))
        .col(Alias::new("partner_id"))
        .col(Alias::new("date"))
        .to_owned()
}

/// Creates all tables and the compound indexes the balance engine relies on.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let partner_table = schema.create_table_from_entity(Partner);
    let transaction_table = schema.create_table_from_entity(Transaction);
    let payment_table = schema.create_table_from_entity(Payment);

    db.execute(builder.build(&partner_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;
    db.execute(builder.build(&payment_table)).await?;

    let transaction_index =
        partner_date_index("transactions", "idx_transactions_partner_date");
    let payment_index = partner_date_index("payments", "idx_payments_partner_date");
    db.execute(builder.build(&transaction_index)).await?;
    db.execute(builder.build(&payment_index)).await?;

    Ok(())
}
