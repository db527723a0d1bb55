use anyhow::Result;
use datadeck::api::AuthClient;
use datadeck::app::AppShell;
use datadeck::config::Config;
use datadeck::data::row_model::{rows_from_json, Column, Row, SortDirection};
use datadeck::session::{FileCredentialStore, SessionContext};

fn print_help() {
    println!("datadeck - terminal data browser");
    println!();
    println!("Usage:");
    println!("  datadeck [OPTIONS] [FILE.json]");
    println!();
    println!("Options:");
    println!("  --generate-config - Generate config file with defaults");
    println!("  --help            - Show this help");
    println!();
    println!("Keys:");
    println!("  /       - Search          s      - Toggle sort on column");
    println!("  e/Enter - Edit cell       g      - Go to page");
    println!("  [ ]     - Prev/next page  z      - Cycle page size");
    println!("  Tab     - Page size select Ctrl+L - Log out");
    println!("  Ctrl+C  - Quit");
    println!();
    println!("The login endpoint is taken from DATADECK_API_URL");
    println!("(default: http://localhost:5000).");
}

/// Column layout of the records view
fn record_columns() -> Vec<Column> {
    vec![
        Column::new("id", "Id")
            .with_width(6)
            .with_sort_hint(SortDirection::Ascending),
        Column::new("name", "Name").editable(),
        Column::new("amount", "Amount").with_width(12),
        Column::new("active", "Active").with_width(8),
        Column::new("created", "Created").with_width(20),
    ]
}

/// Built-in records shown when no data file is given
fn sample_rows(columns: &[Column]) -> Result<Vec<Row>> {
    let sample = serde_json::json!([
        {"id": 1,  "name": "Alice",   "amount": 120.5,  "active": true,  "created": "2024-01-15"},
        {"id": 2,  "name": "Bob",     "amount": 80.0,   "active": false, "created": "2024-02-02"},
        {"id": 3,  "name": "Carol",   "amount": 240.75, "active": true,  "created": "2024-02-20"},
        {"id": 4,  "name": "Dave",    "amount": 15.25,  "active": true,  "created": "2024-03-01"},
        {"id": 5,  "name": "Erin",    "amount": 310.0,  "active": false, "created": "2024-03-18"},
        {"id": 6,  "name": "Frank",   "amount": 55.5,   "active": true,  "created": "2024-04-05"},
        {"id": 7,  "name": "Grace",   "amount": 199.99, "active": true,  "created": "2024-04-22"},
        {"id": 8,  "name": "Heidi",   "amount": 12.0,   "active": false, "created": "2024-05-09"},
        {"id": 9,  "name": "Ivan",    "amount": 420.1,  "active": true,  "created": "2024-05-27"},
        {"id": 10, "name": "Judy",    "amount": 77.3,   "active": true,  "created": "2024-06-11"},
        {"id": 11, "name": "Mallory", "amount": 260.0,  "active": false, "created": "2024-06-30"},
        {"id": 12, "name": "Niaj",    "amount": 31.45,  "active": true,  "created": "2024-07-14"},
        {"id": 13, "name": "Olivia",  "amount": 505.0,  "active": true,  "created": "2024-07-29"},
        {"id": 14, "name": "Peggy",   "amount": 90.9,   "active": false, "created": "2024-08-06"}
    ]);
    rows_from_json(columns, &sample)
}

fn load_rows(columns: &[Column], path: &str) -> Result<Vec<Row>> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    rows_from_json(columns, &value)
}

fn main() -> Result<()> {
    datadeck::utils::logging::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--help".to_string()) {
        print_help();
        return Ok(());
    }

    if args.contains(&"--generate-config".to_string()) {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Config::create_default_with_comments())?;
        println!("Configuration file created at: {:?}", path);
        println!("Edit this file to customize datadeck.");
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Could not load config ({}), using defaults", e);
        Config::default()
    });

    let data_file = args
        .iter()
        .skip(1)
        .find(|arg| !arg.starts_with("--") && arg.ends_with(".json"))
        .cloned();

    let api_url =
        std::env::var("DATADECK_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());

    let columns = record_columns();
    // A load failure is routed to the fallback error view, not a crash
    let rows = match &data_file {
        Some(path) => load_rows(&columns, path).map_err(|e| e.to_string()),
        None => sample_rows(&columns).map_err(|e| e.to_string()),
    };

    let store = FileCredentialStore::open_default()?;
    let session = SessionContext::new(Box::new(store));
    let client = AuthClient::new(&api_url)?;

    let mut shell = AppShell::new(&config, session, client, columns, rows);
    if let Err(e) = shell.run() {
        eprintln!("datadeck error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
