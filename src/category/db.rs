//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryBuilder, CategoryName},
};

/// The columns selected for a category, in the order [map_category_row] expects.
pub const CATEGORY_COLUMNS: &str = "id, name, icon, color, is_pet_related";

/// Create a category and return it with its generated ID.
pub fn create_category(builder: CategoryBuilder, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO category (name, icon, color, is_pet_related) VALUES (?1, ?2, ?3, ?4)
             RETURNING {CATEGORY_COLUMNS}"
        ))?
        .query_row(
            (
                builder.name.as_ref(),
                builder.icon,
                builder.color,
                builder.is_pet_related,
            ),
            map_category_row,
        )
        .map_err(|error| error.into())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            icon TEXT,
            color TEXT,
            is_pet_related INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

/// Map a database row to a [Category].
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category {
        id,
        name,
        icon: row.get(2)?,
        color: row.get(3)?,
        is_pet_related: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::category::{Category, CategoryName, create_category};

    use super::create_category_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_category_table(&connection).expect("Could not create category table");
        connection
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Food & Treats").unwrap();

        let category = create_category(
            Category::build(name.clone()).icon("🦴").color("amber"),
            &connection,
        )
        .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, name);
        assert_eq!(category.icon.as_deref(), Some("🦴"));
        assert!(category.is_pet_related);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Grooming");
        create_category(Category::build(name.clone()), &connection).unwrap();

        let duplicate = create_category(Category::build(name), &connection);

        assert!(duplicate.is_err());
    }
}
