use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use pawfolio::{
    Budget, BudgetPeriod, Category, CategoryName, InsuranceProvider, InsuranceQuote,
    OpportunityStatus, Pet, PetName, SavingsOpportunity, Transaction, UserId, count_transactions,
    create_budget, create_category, create_opportunity, create_pet, create_provider, create_quote,
    create_transaction, initialize_db,
};

/// A utility for creating a demo database for the pawfolio dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user that owns the demo pets and expenses.
    #[arg(long, default_value_t = 1)]
    user_id: i64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let owner = UserId::new(args.user_id);
    let today = OffsetDateTime::now_utc().date();

    println!("Creating categories...");
    let mut category_ids = Vec::new();
    for (name, icon, color) in [
        ("Food & Treats", "🦴", "amber"),
        ("Veterinary Care", "🩺", "red"),
        ("Grooming", "✂️", "purple"),
        ("Insurance", "🛡️", "blue"),
        ("Toys & Accessories", "🎾", "green"),
    ] {
        let category = create_category(
            Category::build(CategoryName::new(name)?)
                .icon(icon)
                .color(color),
            &conn,
        )?;
        category_ids.push(category.id);
    }
    let [food, vet, grooming, insurance, toys] = category_ids[..] else {
        return Err("expected five categories".into());
    };

    println!("Creating pets...");
    let max = create_pet(
        Pet::build(PetName::new("Max")?, "dog")
            .breed(Some("Golden Retriever".to_owned()))
            .age(Some(3.0))
            .weight(Some(32.5))
            .medical_conditions(vec!["hip dysplasia".to_owned()]),
        owner,
        &conn,
    )?;
    let luna = create_pet(
        Pet::build(PetName::new("Luna")?, "cat")
            .breed(Some("British Shorthair".to_owned()))
            .age(Some(0.5))
            .weight(Some(3.1))
            .dietary_requirements(vec!["grain free".to_owned()]),
        owner,
        &conn,
    )?;

    println!("Creating transactions...");
    let transactions = [
        (-45.99, 1, "Premium Pet Food", "Pets at Home", food, max.id),
        (-120.00, 4, "Veterinary Consultation", "City Vets", vet, luna.id),
        (-35.00, 9, "Full Groom", "Pampered Paws", grooming, max.id),
        (-24.99, 12, "Monthly Insurance Premium", "Paws Protect", insurance, max.id),
        (-12.50, 20, "Catnip Mouse Set", "Pets at Home", toys, luna.id),
        (-18.75, 35, "Dental Chews", "Zooplus", food, max.id),
        (-89.00, 60, "Annual Vaccinations", "City Vets", vet, max.id),
        (-52.40, 95, "Cat Litter and Food", "Zooplus", food, luna.id),
    ];
    for (amount, days_ago, description, merchant, category_id, pet_id) in transactions {
        create_transaction(
            Transaction::build(amount, today - Duration::days(days_ago), description)
                .merchant_name(Some(merchant.to_owned()))
                .category_id(Some(category_id))
                .pet_id(Some(pet_id)),
            owner,
            &conn,
        )?;
    }

    println!("Creating budgets...");
    for (name, limit, period, category_id) in [
        ("Food", 150.0, BudgetPeriod::Monthly, Some(food)),
        ("Vet fund", 100.0, BudgetPeriod::Monthly, Some(vet)),
        ("Grooming", 60.0, BudgetPeriod::Monthly, Some(grooming)),
        ("Insurance", 30.0, BudgetPeriod::Monthly, Some(insurance)),
        ("Toys", 50.0, BudgetPeriod::Quarterly, Some(toys)),
    ] {
        create_budget(
            Budget::build(name, limit, period).category_id(category_id),
            owner,
            &conn,
        )?;
    }

    println!("Creating savings opportunities...");
    for (title, savings, status, category_id, pet_id) in [
        (
            "Buy food in bulk",
            Some(15.0),
            OpportunityStatus::Pending,
            food,
            max.id,
        ),
        (
            "Switch to a vet health plan",
            Some(40.0),
            OpportunityStatus::Pending,
            vet,
            luna.id,
        ),
        (
            "Groom at home between visits",
            None,
            OpportunityStatus::Applied,
            grooming,
            max.id,
        ),
    ] {
        create_opportunity(
            &SavingsOpportunity {
                id: 0,
                pet_id: Some(pet_id),
                category_id: Some(category_id),
                title: title.to_owned(),
                potential_savings: savings,
                status,
            },
            owner,
            &conn,
        )?;
    }

    println!("Creating insurance providers and quotes...");
    for (name, rating, reviews_count, premium) in [
        ("Paws Protect", Some(4.6), 1250, Some(24.99)),
        ("Whisker Cover", Some(4.2), 830, Some(42.50)),
        ("Tail Guard", None, 0, Some(71.00)),
    ] {
        let provider = create_provider(
            &InsuranceProvider {
                id: 0,
                name: name.to_owned(),
                rating,
                reviews_count,
                coverage_types: vec!["accident-only".to_owned(), "lifetime".to_owned()],
                is_active: true,
            },
            &conn,
        )?;

        create_quote(
            &InsuranceQuote {
                id: 0,
                pet_id: max.id,
                provider_id: provider.id,
                coverage_type: "lifetime".to_owned(),
                monthly_premium: premium,
                annual_premium: premium.map(|premium| premium * 12.0),
                deductible: Some(99.0),
                coverage_limit: Some(7000.0),
                status: "active".to_owned(),
            },
            owner,
            &conn,
        )?;
    }

    println!(
        "Success! Created {} transactions for user {owner}.",
        count_transactions(owner, &conn)?
    );

    Ok(())
}
