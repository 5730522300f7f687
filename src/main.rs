mod config;
mod matcher;
mod model;
mod normalizer;
mod parser;
mod report;
mod storage;
mod utils;

use clap::Parser;
use config::{AppConfig, load_config_or_builtin};
use matcher::{BrandCleanCache, Matcher, MatchingEngine};
use model::{CatalogError, ConfigError, ReportError};
use normalizer::{ColorCanonicalizer, Vocabulary};
use parser::{CatalogParser, StoreCatalogNormalizer, StoreTable, SupplierListingParser, build_color_map};
use report::{REPORT_FILE, build_report};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};

const CONFIG_FILE: &str = "config.json";
const USAGE: &str = "Usage: price-matcher <supplier_filename>.csv <store_filename>.csv";

/// Matches a free-text supplier price list against the store catalog.
#[derive(Parser, Debug)]
#[command(name = "price-matcher")]
struct Cli {
    /// Supplier price list: description and supplier label per row.
    supplier_file: Option<PathBuf>,
    /// Store catalog export with a header row.
    store_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();
    let (Some(supplier_file), Some(store_file)) = (cli.supplier_file, cli.store_file) else {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    };
    info!("Supplier file: {}", supplier_file.display());
    info!("Store file: {}", store_file.display());

    // Load configuration from file, then run the pipeline
    let result = load_config_or_builtin(Path::new(CONFIG_FILE))
        .map_err(AppError::from)
        .and_then(|config| run(&config, &supplier_file, &store_file, Path::new(REPORT_FILE)));

    match result {
        Ok(rows) => {
            info!("✅ Report with {} products saved as {}", rows, REPORT_FILE);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads both catalogs, matches them and writes the report. Nothing is written
/// unless every earlier step succeeded. Returns the number of report rows.
fn run(
    config: &AppConfig,
    supplier_path: &Path,
    store_path: &Path,
    report_path: &Path,
) -> Result<usize, AppError> {
    info!("Reading store catalog...");
    let store_records = storage::read_records(store_path)?;
    let table = StoreTable::from_records(&store_records, &config.store_columns)?;
    let colors = build_color_map(&table, &ColorCanonicalizer::new(&config.color_groups));
    let vocabulary = Vocabulary::new(Vocabulary::brands_from_config(config), colors);

    let store = StoreCatalogNormalizer::new(&vocabulary, &config.store_columns).parse(&store_records)?;

    info!("Reading supplier price list...");
    let supplier_records = storage::read_records(supplier_path)?;
    let suppliers = SupplierListingParser::new(&vocabulary).parse(&supplier_records)?;

    info!("Matching...");
    let mut engine = MatchingEngine::new(&vocabulary.brands, config.scoring.clone(), BrandCleanCache::new());
    let matches = engine.match_products(&suppliers, &store);

    info!("Building report...");
    let report = build_report(&matches);
    storage::write_report(report_path, &report)?;
    Ok(report.rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const STORE_CSV: &str = "\
Наименование;Производитель;Модель;Оперативная память (Gb);Встроенная память;Цвет;Внешний код
iphone 13 синий (blue) 128gb;Apple;iPhone 13;4;128 ГБ;синий;A1
iphone 13 черный (black) 256gb;Apple;iPhone 13;4;256 ГБ;черный;A2
Samsung Galaxy A54 8/256;Samsung;Galaxy A54;8;256 ГБ;;S1
";

    const SUPPLIER_CSV: &str = "\
📱APPLE📱,
iphone 13 blue 4/128 12990,VendorX
скидки до конца недели,VendorX
iphone 13 blue 4/128 12490,VendorY
";

    #[test]
    fn end_to_end_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store.csv");
        let supplier = dir.path().join("supplier.csv");
        let report = dir.path().join("final_prices.csv");
        fs::write(&store, STORE_CSV).unwrap();
        fs::write(&supplier, SUPPLIER_CSV).unwrap();

        let config = AppConfig::builtin().unwrap();
        let rows = run(&config, &supplier, &store, &report).unwrap();
        assert_eq!(rows, 1);

        let written = fs::read_to_string(&report).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert!(lines[0].starts_with("Код;Название;Поставщик 1;Цена 1"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "A1;iphone 13 синий (blue) 128gb;VendorY;12490;VendorX;12990");
    }

    #[test]
    fn missing_store_column_aborts_without_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store.csv");
        let supplier = dir.path().join("supplier.csv");
        let report = dir.path().join("final_prices.csv");
        fs::write(&store, "Наименование;Цвет\niphone 13;синий\n").unwrap();
        fs::write(&supplier, SUPPLIER_CSV).unwrap();

        let config = AppConfig::builtin().unwrap();
        let err = run(&config, &supplier, &store, &report).unwrap_err();
        assert!(matches!(err, AppError::Catalog(CatalogError::MissingColumn(_))));
        assert!(!report.exists());
    }

    #[test]
    fn unreadable_supplier_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store.csv");
        fs::write(&store, STORE_CSV).unwrap();

        let config = AppConfig::builtin().unwrap();
        let err = run(&config, &dir.path().join("missing.csv"), &store, &dir.path().join("out.csv"))
            .unwrap_err();
        assert!(matches!(err, AppError::Catalog(CatalogError::Io { .. })));
    }
}
