//! Database operations for pets.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{list_from_json_column, list_to_json},
    pet::{Pet, PetBuilder, PetName},
    user::UserId,
};

/// The columns selected for a pet, in the order [map_pet_row] expects.
pub const PET_COLUMNS: &str =
    "id, name, species, breed, age, weight, medical_conditions, dietary_requirements";

/// Create a pet owned by `owner` and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::JSONSerializationError] if the list fields cannot be encoded,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_pet(builder: PetBuilder, owner: UserId, connection: &Connection) -> Result<Pet, Error> {
    let medical_conditions = list_to_json(&builder.medical_conditions)?;
    let dietary_requirements = list_to_json(&builder.dietary_requirements)?;

    connection
        .prepare(&format!(
            "INSERT INTO pet (user_id, name, species, breed, age, weight, medical_conditions, dietary_requirements)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {PET_COLUMNS}"
        ))?
        .query_row(
            (
                owner.as_i64(),
                builder.name.as_ref(),
                builder.species,
                builder.breed,
                builder.age,
                builder.weight,
                medical_conditions,
                dietary_requirements,
            ),
            map_pet_row,
        )
        .map_err(|error| error.into())
}

/// Overwrite the stored fields of `pet`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingRecord] if `pet` does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_pet(pet: &Pet, owner: UserId, connection: &Connection) -> Result<Pet, Error> {
    let medical_conditions = list_to_json(&pet.medical_conditions)?;
    let dietary_requirements = list_to_json(&pet.dietary_requirements)?;

    connection
        .prepare(&format!(
            "UPDATE pet
             SET name = ?1, species = ?2, breed = ?3, age = ?4, weight = ?5,
                 medical_conditions = ?6, dietary_requirements = ?7
             WHERE id = ?8 AND user_id = ?9
             RETURNING {PET_COLUMNS}"
        ))?
        .query_row(
            (
                pet.name.as_ref(),
                &pet.species,
                &pet.breed,
                pet.age,
                pet.weight,
                medical_conditions,
                dietary_requirements,
                pet.id,
                owner.as_i64(),
            ),
            map_pet_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingRecord,
            error => error.into(),
        })
}

/// Initialize the pet table and indexes.
pub fn create_pet_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS pet (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            species TEXT NOT NULL,
            breed TEXT,
            age REAL,
            weight REAL,
            medical_conditions TEXT NOT NULL DEFAULT '[]',
            dietary_requirements TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_pet_user ON pet(user_id);",
    )?;

    Ok(())
}

/// Map a database row to a [Pet].
pub fn map_pet_row(row: &Row) -> Result<Pet, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Pet {
        id: row.get(0)?,
        name: PetName::new_unchecked(&raw_name),
        species: row.get(2)?,
        breed: row.get(3)?,
        age: row.get(4)?,
        weight: row.get(5)?,
        medical_conditions: list_from_json_column(row, 6)?,
        dietary_requirements: list_from_json_column(row, 7)?,
    })
}
