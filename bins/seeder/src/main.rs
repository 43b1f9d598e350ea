//! Database seeder for Fintrack development and testing.
//!
//! Seeds the default category set and a development admin user. Categories
//! are created here (or by admin endpoints), never by end users.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use fintrack_core::auth::hash_password;
use fintrack_db::entities::{
    categories,
    sea_orm_active_enums::{TransactionKind, UserRole},
    users,
};

/// Development admin login.
const ADMIN_EMAIL: &str = "admin@fintrack.dev";
/// Development admin password; for local use only.
const ADMIN_PASSWORD: &str = "admin-dev-password";

/// Default expense categories.
const EXPENSE_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Food", "utensils", "#e76f51"),
    ("Transportation", "bus", "#2a9d8f"),
    ("Housing", "home", "#264653"),
    ("Utilities", "plug", "#e9c46a"),
    ("Healthcare", "heart-pulse", "#d62828"),
    ("Entertainment", "film", "#9b5de5"),
    ("Shopping", "bag", "#f4a261"),
    ("Other Expenses", "ellipsis", "#8d99ae"),
];

/// Default income categories.
const INCOME_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Salary", "briefcase", "#2a9d8f"),
    ("Freelance", "laptop", "#457b9d"),
    ("Investments", "chart-line", "#1d3557"),
    ("Other Income", "ellipsis", "#8d99ae"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = fintrack_db::connect(&database_url, 5, 1)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin_user(&db).await;

    println!("Seeding categories...");
    for (name, icon, color) in EXPENSE_CATEGORIES {
        seed_category(&db, name, TransactionKind::Expense, icon, color).await;
    }
    for (name, icon, color) in INCOME_CATEGORIES {
        seed_category(&db, name, TransactionKind::Income, icon, color).await;
    }

    println!("Seeding complete!");
}

/// Seeds the development admin user.
async fn seed_admin_user(db: &DatabaseConnection) {
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(ADMIN_EMAIL))
        .one(db)
        .await
        .ok()
        .flatten();

    if existing.is_some() {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let password_hash = hash_password(ADMIN_PASSWORD).expect("Failed to hash admin password");

    let now = Utc::now().into();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(ADMIN_EMAIL.to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Fintrack Admin".to_string()),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert admin user: {e}");
    } else {
        println!("  Created admin user: {ADMIN_EMAIL}");
    }
}

/// Seeds one category if it does not already exist.
async fn seed_category(
    db: &DatabaseConnection,
    name: &str,
    kind: TransactionKind,
    icon: &str,
    color: &str,
) {
    let existing = categories::Entity::find()
        .filter(categories::Column::Name.eq(name))
        .one(db)
        .await
        .ok()
        .flatten();

    if existing.is_some() {
        println!("  Category '{name}' already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        kind: Set(kind),
        icon: Set(Some(icon.to_string())),
        color: Set(Some(color.to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = category.insert(db).await {
        eprintln!("Failed to insert category '{name}': {e}");
    } else {
        println!("  Created category: {name}");
    }
}
