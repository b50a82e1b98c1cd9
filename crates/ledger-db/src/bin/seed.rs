//! # Seed Data Generator
//!
//! Populates the database with clients, courses and lessons for development.
//!
//! ## Usage
//! ```bash
//! # 10 clients (default)
//! cargo run -p ledger-db --bin seed
//!
//! # Custom amount and database
//! cargo run -p ledger-db --bin seed -- --clients 50 --db ./data/ledger.db
//! ```
//!
//! ## Generated Data
//! - The lesson types below, with their base values
//! - `--clients` clients; every third one gets a discounted hourly rate
//! - One to three courses per client, each with a handful of lessons

use std::env;

use ledger_core::{NewClient, NewCourse, NewLesson, NewLessonType, UnitType};
use ledger_db::{Database, DbConfig};
use rust_decimal::Decimal;

/// (name, unit type, base value in cents)
const LESSON_TYPES: &[(&str, UnitType, i64)] = &[
    ("Private lesson", UnitType::Hour, 5000),
    ("Group lesson", UnitType::Hour, 3000),
    ("Conversation club", UnitType::Hour, 2000),
    ("Exam preparation", UnitType::Unit, 2500),
    ("Workbook", UnitType::Unit, 1250),
];

const COMPANIES: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbrella", "Hooli", "Stark", "Wayne", "Wonka", "Tyrell",
    "Cyberdyne",
];

const SUBJECTS: &[&str] = &["English", "German", "Spanish", "French", "Italian"];

const STATUSES: &[&str] = &["Not started", "Scheduled", "Done", "Cancelled"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut clients: usize = 10;
    let mut db_path = String::from("./ledger_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--clients" | "-c" => {
                if i + 1 < args.len() {
                    clients = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("ProjectLedger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --clients <N>  Number of clients to generate (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./ledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("ProjectLedger Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Clients:  {}", clients);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.clients().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} clients", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let mut type_ids = Vec::with_capacity(LESSON_TYPES.len());
    for (name, unit_type, cents) in LESSON_TYPES {
        let created = db
            .lesson_types()
            .create(&NewLessonType {
                name: name.to_string(),
                unit_type: *unit_type,
                value: Decimal::new(*cents, 2),
            })
            .await?;
        type_ids.push(created.id);
    }
    println!("✓ Created {} lesson types", type_ids.len());

    let mut courses = 0;
    let mut lessons = 0;

    for n in 0..clients {
        let company = COMPANIES[n % COMPANIES.len()];
        let name = if n < COMPANIES.len() {
            company.to_string()
        } else {
            format!("{} {}", company, n / COMPANIES.len() + 1)
        };

        let client = db.clients().create(&NewClient { name }).await?;

        if n % 3 == 0 {
            // 20% off private lessons
            db.client_prices()
                .set_client_price(&client.id, &type_ids[0], Decimal::new(4000, 2))
                .await?;
        }

        for c in 0..(n % 3 + 1) {
            let subject = SUBJECTS[(n + c) % SUBJECTS.len()];
            let course = db
                .courses()
                .create(&NewCourse {
                    name: format!("{} for {}", subject, client.name),
                    client_id: client.id.clone(),
                })
                .await?;
            courses += 1;

            for l in 0..(2 + (n + c) % 4) {
                let seed = n * 31 + c * 7 + l;
                db.lessons()
                    .create(&NewLesson {
                        name: format!("{} lesson {}", subject, l + 1),
                        // 0.5 to 3.0 in half steps
                        quantity: Decimal::new(5 * (1 + (seed % 6) as i64), 1),
                        status: STATUSES[seed % STATUSES.len()].to_string(),
                        course_id: course.id.clone(),
                        type_id: type_ids[seed % type_ids.len()].clone(),
                    })
                    .await?;
                lessons += 1;
            }
        }
    }

    println!(
        "✓ Generated {} clients, {} courses, {} lessons in {:?}",
        clients,
        courses,
        lessons,
        start.elapsed()
    );

    println!();
    println!("Client totals:");
    for report in db.ledger().all_client_reports().await?.iter().take(5) {
        println!(
            "  {:<20} {:>3} courses {:>4} lessons {:>10}",
            report.client_name,
            report.courses_count,
            report.lessons_count,
            report.total_value.round_dp(2)
        );
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
