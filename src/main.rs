use anyhow::{bail, Context, Result};
use restaurant_records::{
    auth::Role,
    cli::{Cli, Commands},
    config::resolve_db_path,
    editable_table,
    parser::{ordered_values, parse_assignments, SqlValue},
    schema::{get_table, ALL_TABLES, ID_COLUMN},
    Database, DishQuery, Record,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let db_path = resolve_db_path(cli.db.clone())?;
    let (db, report) = Database::open(&db_path)
        .with_context(|| format!("Failed to open database {:?}", db_path))?;

    match &cli.command {
        Commands::Init => {
            for table in &report.created {
                println!("Created table {}", table);
            }
            for (table, rows) in &report.seeded {
                println!("Seeded {} with {} rows", table, rows);
            }
            println!("\nDatabase {:?}:", db_path);
            for schema in ALL_TABLES {
                println!("  {:<14}{} rows", schema.name, db.count(schema.name)?);
            }
        }

        Commands::Tables => {
            println!("Available tables:\n");
            for schema in ALL_TABLES {
                let access = if schema.editable { "" } else { " (login accounts)" };
                println!("  {}{}", schema.name, access);
                println!("    {}", schema.select_list());
            }
        }

        Commands::Whoami => {
            let session = cli.session(&db)?;
            println!("{} ({})", session.user().username, session.role());
        }

        Commands::List { table, json } => {
            cli.session(&db)?;
            let rows = db.list_all(table)?;
            print_records(table, &rows, *json)?;
        }

        Commands::Show { table, id, json } => {
            cli.session(&db)?;
            let Some(record) = db.get(table, *id)? else {
                bail!("No row with id {} in {}", id, table);
            };
            print_records(table, std::slice::from_ref(&record), *json)?;
        }

        Commands::Dishes {
            order_by,
            desc,
            category,
            json,
        } => {
            cli.session(&db)?;
            let mut query = DishQuery::sorted(*order_by, !desc);
            if let Some(categories) = category {
                query = query.with_categories(categories.iter().map(|c| c.trim()));
            }

            let dishes = db.list_dishes(&query)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&dishes)?);
            } else {
                for dish in &dishes {
                    println!(
                        "{:>4}  {:<24} {:>9.2}  {}",
                        dish.id,
                        dish.name,
                        dish.price,
                        dish.category.as_deref().unwrap_or("")
                    );
                }
                println!("\n{} dishes", dishes.len());
            }
        }

        Commands::Add { table, fields } => {
            let session = cli.session(&db)?;
            let schema = editable_table(table)?;
            let values = ordered_values(schema, parse_assignments(schema, fields)?)?;
            let id = db.insert(&session, table, &values)?;
            println!("Added row {} to {}", id, table);
        }

        Commands::Update { table, id, fields } => {
            let session = cli.session(&db)?;
            let schema = editable_table(table)?;
            let assignments = parse_assignments(schema, fields)?;
            if assignments.iter().any(|(name, _)| name == ID_COLUMN) {
                bail!("The id of a row cannot be changed");
            }

            let mut update = vec![(ID_COLUMN.to_string(), SqlValue::Integer(*id))];
            update.extend(assignments);
            db.update(&session, table, &update)?;
            println!("Updated row {} in {}", id, table);
        }

        Commands::Delete { table, id } => {
            let session = cli.session(&db)?;
            if db.delete(&session, table, *id)? {
                println!("Deleted row {} from {}", id, table);
            } else {
                println!("No row with id {} in {}", id, table);
            }
        }

        Commands::AddUser {
            new_username,
            new_password,
            role,
        } => {
            let session = cli.session(&db)?;
            let role: Role = role.parse()?;
            let id = db.add_user(&session, new_username, new_password, role)?;
            println!("Added user {} ({}) with id {}", new_username, role, id);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "restaurant_records=info"
    } else {
        "restaurant_records=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_records(table: &str, records: &[Record], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    let schema = get_table(table).context("Unknown table")?;
    println!("{}", schema.select_list());
    for record in records {
        let mut cells = vec![record.id.to_string()];
        cells.extend(record.fields.iter().map(|(_, v)| v.to_string()));
        println!("{}", cells.join(" | "));
    }
    println!("\n{} rows", records.len());

    Ok(())
}
