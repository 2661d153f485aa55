use rusqlite::Connection;
use time::Date;

use crate::{
    category::{Category, CategoryId, CategoryName, create_category},
    db::initialize,
    insurance::{InsuranceProvider, InsuranceQuote, create_provider, create_quote},
    pet::{Pet, PetId, PetName, create_pet},
    transaction::Transaction,
    user::UserId,
};

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    connection
}

/// Creates "Food & Treats" and "Veterinary Care", in that order.
pub(crate) fn seed_categories(connection: &Connection) -> Vec<Category> {
    ["Food & Treats", "Veterinary Care"]
        .into_iter()
        .map(|name| {
            create_category(Category::build(CategoryName::new_unchecked(name)), connection)
                .expect("Could not create category")
        })
        .collect()
}

/// Creates Max the dog and Luna the cat for `owner`, in that order.
pub(crate) fn seed_pets(owner: UserId, connection: &Connection) -> Vec<Pet> {
    [("Max", "dog"), ("Luna", "cat")]
        .into_iter()
        .map(|(name, species)| {
            create_pet(
                Pet::build(PetName::new_unchecked(name), species),
                owner,
                connection,
            )
            .expect("Could not create pet")
        })
        .collect()
}

/// Creates one quote for each monthly premium: none, 30.00, 60.00 and 60.01.
pub(crate) fn seed_quotes(owner: UserId, connection: &Connection) {
    let pet = create_pet(
        Pet::build(PetName::new_unchecked("Max"), "dog"),
        owner,
        connection,
    )
    .expect("Could not create pet");
    let provider = create_provider(
        &InsuranceProvider {
            id: 0,
            name: "Paws Protect".to_owned(),
            rating: Some(4.5),
            reviews_count: 10,
            coverage_types: vec!["lifetime".to_owned()],
            is_active: true,
        },
        connection,
    )
    .expect("Could not create provider");

    for monthly_premium in [None, Some(30.0), Some(60.0), Some(60.01)] {
        create_quote(
            &InsuranceQuote {
                id: 0,
                pet_id: pet.id,
                provider_id: provider.id,
                coverage_type: "lifetime".to_owned(),
                monthly_premium,
                annual_premium: None,
                deductible: None,
                coverage_limit: None,
                status: "active".to_owned(),
            },
            owner,
            connection,
        )
        .expect("Could not create quote");
    }
}

/// An in-memory transaction that has not been saved.
pub(crate) fn transaction(
    id: i64,
    amount: f64,
    date: Date,
    category_id: Option<CategoryId>,
    pet_id: Option<PetId>,
) -> Transaction {
    Transaction {
        id,
        pet_id,
        category_id,
        amount,
        date,
        description: format!("transaction {id}"),
        merchant_name: None,
        is_pet_expense: true,
        bank_account_id: None,
    }
}
