//! Defines the core data models and database queries for spend items.

use rusqlite::{Connection, Row};
use time::{Date, Month};

use crate::{Error, auth::UserID};

// ============================================================================
// MODELS
// ============================================================================

/// The database ID of a spend item.
pub type ItemId = i64;

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// The ID of the item.
    pub id: ItemId,
    /// The user who recorded the item.
    pub user_id: UserID,
    /// What the money was spent on.
    pub name: String,
    /// How much was spent.
    pub price: f64,
    /// How it was paid for, e.g. "Cash" or "Card".
    pub payment_mode: String,
    /// When the money was spent.
    pub date: Date,
}

/// The fields needed to record a new spend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    /// The user recording the spend.
    pub user_id: UserID,
    /// What the money was spent on.
    pub name: String,
    /// How much was spent.
    pub price: f64,
    /// How it was paid for.
    pub payment_mode: String,
    /// When the money was spent.
    pub date: Date,
}

/// The fields that replace an item's contents when it is edited.
///
/// The owner of an item cannot be changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    /// The new name, which must not be empty.
    pub name: String,
    /// The new price.
    pub price: f64,
    /// The new payment mode.
    pub payment_mode: String,
    /// The new date.
    pub date: Date,
}

/// The number of rows changed by an update or delete.
pub type RowsAffected = usize;

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the items table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                userId TEXT NOT NULL,
                nameOfItem TEXT NOT NULL,
                price REAL NOT NULL,
                paymentMode TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_user_date ON items(userId, date);",
        (),
    )?;

    Ok(())
}

/// Record a new spend in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn add_item(item: &NewItem, connection: &Connection) -> Result<Item, Error> {
    let item = connection
        .prepare(
            "INSERT INTO items (userId, nameOfItem, price, paymentMode, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, userId, nameOfItem, price, paymentMode, date",
        )?
        .query_row(
            (
                item.user_id.as_str(),
                &item.name,
                item.price,
                &item.payment_mode,
                item.date,
            ),
            map_item_row,
        )?;

    Ok(item)
}

/// Retrieve an item from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid item,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_item(id: ItemId, connection: &Connection) -> Result<Item, Error> {
    let item = connection
        .prepare(
            "SELECT id, userId, nameOfItem, price, paymentMode, date FROM items WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_item_row)?;

    Ok(item)
}

/// Get every item recorded by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn list_items_by_user(user_id: &UserID, connection: &Connection) -> Result<Vec<Item>, Error> {
    connection
        .prepare(
            "SELECT id, userId, nameOfItem, price, paymentMode, date FROM items WHERE userId = ?1",
        )?
        .query_map((user_id.as_str(),), map_item_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Replace every editable field of the item `id`.
///
/// Returns the number of rows changed, which is zero when `id` does not exist.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyField] if the new name is empty, in which case nothing is written,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_item(
    id: ItemId,
    update: &ItemUpdate,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    if update.name.is_empty() {
        return Err(Error::EmptyField("nameOfItem"));
    }

    connection
        .execute(
            "UPDATE items
            SET \
                nameOfItem = ?1, \
                price = ?2, \
                paymentMode = ?3, \
                date = ?4 \
            WHERE id = ?5",
            (
                &update.name,
                update.price,
                &update.payment_mode,
                update.date,
                id,
            ),
        )
        .map_err(Error::from)
}

/// Delete the item `id`.
///
/// Returns the number of rows deleted.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_item(id: ItemId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM items WHERE id = ?1", (id,))
        .map_err(Error::from)
}

/// The total spent by `user_id` in the given month, zero if nothing was recorded.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn sum_by_month(
    user_id: &UserID,
    year: i32,
    month: Month,
    connection: &Connection,
) -> Result<f64, Error> {
    let year_month = format!("{year:04}-{:02}", month as u8);

    connection
        .query_row(
            "SELECT COALESCE(SUM(price), 0.0) FROM items
             WHERE userId = ?1 AND strftime('%Y-%m', date) = ?2",
            (user_id.as_str(), year_month),
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Get the total number of items recorded by all users.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_items(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM items;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Parse the year and month typed into the monthly sum form.
///
/// # Errors
/// Returns [Error::InvalidYearMonth] if either part is not a number or the
/// month is outside 1 to 12.
pub fn parse_year_month(raw_year: &str, raw_month: &str) -> Result<(i32, Month), Error> {
    let invalid = || Error::InvalidYearMonth(raw_year.to_owned(), raw_month.to_owned());

    let year = raw_year
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (0..=9999).contains(year))
        .ok_or_else(invalid)?;
    let month = raw_month
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .ok_or_else(invalid)?;

    Ok((year, month))
}

/// Parse an item ID taken from a URL path, `None` if it is not a number.
pub fn parse_item_id(raw_item_id: &str) -> Option<ItemId> {
    raw_item_id.parse().ok()
}

/// Map a database row to an [Item].
fn map_item_row(row: &Row) -> Result<Item, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_user_id: String = row.get(1)?;
    let name = row.get(2)?;
    let price = row.get(3)?;
    let payment_mode = row.get(4)?;
    let date = row.get(5)?;

    Ok(Item {
        id,
        user_id: UserID::new(&raw_user_id),
        name,
        price,
        payment_mode,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Date, Month, macros::date};

    use crate::{
        Error,
        auth::UserID,
        db::initialize,
        item::{
            ItemUpdate, NewItem, add_item, count_items, delete_item, get_item,
            list_items_by_user, sum_by_month, update_item,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_item(user_id: &str, name: &str, price: f64, date: Date) -> NewItem {
        NewItem {
            user_id: UserID::new(user_id),
            name: name.to_owned(),
            price,
            payment_mode: "Card".to_owned(),
            date,
        }
    }

    #[test]
    fn add_succeeds() {
        let conn = get_test_connection();
        let want = new_item("1234567890", "Coffee", 4.5, date!(2024 - 05 - 02));

        let got = add_item(&want, &conn).unwrap();

        assert!(got.id > 0);
        assert_eq!(got.user_id, want.user_id);
        assert_eq!(got.name, want.name);
        assert_eq!(got.price, want.price);
        assert_eq!(got.payment_mode, want.payment_mode);
        assert_eq!(got.date, want.date);
        assert_eq!(get_item(got.id, &conn), Ok(got));
    }

    #[test]
    fn get_missing_item_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_item(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn list_returns_only_users_items() {
        let conn = get_test_connection();
        let coffee = add_item(&new_item("alice", "Coffee", 4.5, date!(2024 - 05 - 02)), &conn)
            .unwrap();
        add_item(&new_item("bob", "Lunch", 15.0, date!(2024 - 05 - 02)), &conn).unwrap();
        let bus = add_item(&new_item("alice", "Bus", 3.0, date!(2024 - 06 - 01)), &conn).unwrap();

        let got = list_items_by_user(&UserID::new("alice"), &conn).unwrap();

        assert_eq!(got, vec![coffee, bus]);
    }

    #[test]
    fn list_for_user_without_items_is_empty() {
        let conn = get_test_connection();

        let got = list_items_by_user(&UserID::new("alice"), &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn update_replaces_fields() {
        let conn = get_test_connection();
        let item = add_item(&new_item("alice", "Coffee", 4.5, date!(2024 - 05 - 02)), &conn)
            .unwrap();
        let update = ItemUpdate {
            name: "Tea".to_owned(),
            price: 3.25,
            payment_mode: "Cash".to_owned(),
            date: date!(2024 - 05 - 03),
        };

        let rows_affected = update_item(item.id, &update, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        let got = get_item(item.id, &conn).unwrap();
        assert_eq!(got.name, "Tea");
        assert_eq!(got.price, 3.25);
        assert_eq!(got.payment_mode, "Cash");
        assert_eq!(got.date, date!(2024 - 05 - 03));
        assert_eq!(got.user_id, item.user_id);
    }

    #[test]
    fn update_with_empty_name_leaves_item_unchanged() {
        let conn = get_test_connection();
        let item = add_item(&new_item("alice", "Coffee", 4.5, date!(2024 - 05 - 02)), &conn)
            .unwrap();
        let update = ItemUpdate {
            name: String::new(),
            price: 100.0,
            payment_mode: "Cash".to_owned(),
            date: date!(2024 - 05 - 03),
        };

        let result = update_item(item.id, &update, &conn);

        assert_eq!(result, Err(Error::EmptyField("nameOfItem")));
        assert_eq!(get_item(item.id, &conn), Ok(item));
    }

    #[test]
    fn update_missing_item_changes_nothing() {
        let conn = get_test_connection();
        let update = ItemUpdate {
            name: "Tea".to_owned(),
            price: 3.25,
            payment_mode: "Cash".to_owned(),
            date: date!(2024 - 05 - 03),
        };

        assert_eq!(update_item(42, &update, &conn), Ok(0));
    }

    #[test]
    fn delete_removes_exactly_one_row() {
        let conn = get_test_connection();
        let coffee = add_item(&new_item("alice", "Coffee", 4.5, date!(2024 - 05 - 02)), &conn)
            .unwrap();
        let bus = add_item(&new_item("alice", "Bus", 3.0, date!(2024 - 05 - 03)), &conn).unwrap();

        let rows_affected = delete_item(coffee.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_item(coffee.id, &conn), Err(Error::NotFound));
        assert_eq!(list_items_by_user(&UserID::new("alice"), &conn).unwrap(), vec![bus]);
    }

    #[test]
    fn sum_by_month_adds_prices_for_user_and_month() {
        let conn = get_test_connection();
        add_item(&new_item("alice", "Coffee", 4.5, date!(2024 - 05 - 02)), &conn).unwrap();
        add_item(&new_item("alice", "Rent", 500.25, date!(2024 - 05 - 31)), &conn).unwrap();
        add_item(&new_item("alice", "Bus", 3.0, date!(2024 - 06 - 01)), &conn).unwrap();
        add_item(&new_item("alice", "Gift", 20.0, date!(2023 - 05 - 15)), &conn).unwrap();
        add_item(&new_item("bob", "Lunch", 15.0, date!(2024 - 05 - 02)), &conn).unwrap();

        let got = sum_by_month(&UserID::new("alice"), 2024, Month::May, &conn).unwrap();

        assert_eq!(got, 504.75);
    }

    #[test]
    fn sum_by_month_without_items_is_zero() {
        let conn = get_test_connection();

        let got = sum_by_month(&UserID::new("alice"), 2024, Month::May, &conn).unwrap();

        assert_eq!(got, 0.0);
    }

    #[test]
    fn count_includes_all_users() {
        let conn = get_test_connection();
        add_item(&new_item("alice", "Coffee", 4.5, date!(2024 - 05 - 02)), &conn).unwrap();
        add_item(&new_item("bob", "Lunch", 15.0, date!(2024 - 05 - 02)), &conn).unwrap();

        assert_eq!(count_items(&conn), Ok(2));
    }
}

#[cfg(test)]
mod parse_year_month_tests {
    use time::Month;

    use crate::{Error, item::parse_year_month};

    #[test]
    fn parses_padded_and_unpadded_months() {
        assert_eq!(parse_year_month("2024", "05"), Ok((2024, Month::May)));
        assert_eq!(parse_year_month("2024", "5"), Ok((2024, Month::May)));
        assert_eq!(parse_year_month("2024", "12"), Ok((2024, Month::December)));
    }

    #[test]
    fn rejects_invalid_input() {
        for (year, month) in [("2024", "13"), ("2024", "0"), ("abcd", "05"), ("2024", ""), ("", "05")] {
            assert_eq!(
                parse_year_month(year, month),
                Err(Error::InvalidYearMonth(year.to_owned(), month.to_owned()))
            );
        }
    }
}
