//! Database connection and schema bootstrap.
//!
//! Tables are created at startup from the entity definitions via SeaORM's
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust structs without hand-written SQL or separate migration files.

use crate::entities::{Announcement, Category, Reagent, Request, Submission, Task, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, skipping ones that
/// already exist so repeated startups are safe.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = vec![
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Reagent),
        schema.create_table_from_entity(Request),
        schema.create_table_from_entity(Task),
        schema.create_table_from_entity(Submission),
        schema.create_table_from_entity(Announcement),
    ];

    for mut statement in statements {
        statement.if_not_exists();
        db.execute(builder.build(&statement)).await?;
    }

    Ok(())
}
