//! Pet profiles, the entities that expenses, budgets and quotes belong to.

mod db;
mod domain;

pub use db::{PET_COLUMNS, create_pet, create_pet_table, map_pet_row, update_pet};
pub use domain::{Pet, PetBuilder, PetId, PetName, parse_list};
