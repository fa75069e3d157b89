use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, Month};

use spend_tracker::{NewItem, PasswordHash, UserID, add_item, initialize_db, register};

/// A utility for creating a test database for the spend_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const TEST_USER_ID: &str = "test";
const TEST_PASSWORD: &str = "test";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {TEST_USER_ID:?} with password {TEST_PASSWORD:?}...");
    register(
        TEST_USER_ID,
        "Test User",
        TEST_PASSWORD,
        PasswordHash::DEFAULT_COST,
        &conn,
    )?;

    println!("Adding spends...");
    let user_id = UserID::new(TEST_USER_ID);
    let spends = [
        ("Groceries", 82.40, "Card"),
        ("Coffee", 4.50, "Cash"),
        ("Bus fare", 2.75, "Card"),
        ("Electricity", 120.00, "Bank transfer"),
        ("Lunch", 15.20, "UPI"),
    ];

    let mut count = 0;
    for month in [Month::March, Month::April, Month::May] {
        let first_of_month = Date::from_calendar_date(2024, month, 1)?;

        for (day, (name, price, payment_mode)) in spends.iter().enumerate() {
            add_item(
                &NewItem {
                    user_id: user_id.clone(),
                    name: (*name).to_owned(),
                    price: *price,
                    payment_mode: (*payment_mode).to_owned(),
                    date: first_of_month + Duration::days(day as i64 * 5),
                },
                &conn,
            )?;
            count += 1;
        }
    }

    println!("Added {count} spends.");
    println!("Success!");

    Ok(())
}
