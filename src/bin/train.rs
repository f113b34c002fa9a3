use anyhow::{Context, Result};
use clap::Parser;
use pricecast::application::ml::feature_engineering::derive_features;
use pricecast::application::ml::labeling::label;
use pricecast::application::ml::smartcore_classifier::ForestParams;
use pricecast::application::ml::trainer::{TrainOutcome, TrainerConfig, train};
use pricecast::domain::ml::feature_registry::LabeledRow;
use pricecast::domain::repositories::TickRepository;
use pricecast::infrastructure::{Database, SqliteTickRepository};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "One-shot training run against the tick store", long_about = None)]
struct Args {
    /// Tick store URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://data/ticks.db")]
    database_url: String,

    /// Only use ticks of this symbol
    #[arg(long, env = "TICK_SYMBOL")]
    symbol: Option<String>,

    /// Rows ahead used for the label
    #[arg(long, default_value_t = 10)]
    look_ahead: usize,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 100)]
    n_trees: u16,

    /// Maximum depth of trees
    #[arg(long)]
    max_depth: Option<u16>,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Share of rows held out for evaluation (taken from the tail)
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Write the labeled dataset to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,
}

fn export_csv(path: &Path, rows: &[LabeledRow]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory {:?}", parent))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    writer.write_record(LabeledRow::COLUMNS)?;
    for row in rows {
        let mut record = vec![row.features.timestamp.to_rfc3339()];
        for column in &LabeledRow::COLUMNS[1..] {
            record.push(row.value(column).map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    anyhow::ensure!(args.look_ahead > 0, "--look-ahead must be at least 1");
    anyhow::ensure!(
        args.test_fraction > 0.0 && args.test_fraction < 1.0,
        "--test-fraction must be between 0 and 1"
    );

    let db = Database::new(&args.database_url).await?;
    let repository = SqliteTickRepository::new(db.pool.clone()).with_symbol(args.symbol.clone());

    println!("Loading ticks from {}", args.database_url);
    let ticks = repository.fetch_all().await?;
    if ticks.is_empty() {
        println!("No ticks found. Run seed_ticks or feed the price_ticks table first.");
        return Ok(());
    }

    let features = derive_features(&ticks);
    let rows = label(&features, args.look_ahead);
    println!(
        "Ticks: {}  Feature rows: {}  Labeled rows: {}",
        ticks.len(),
        features.len(),
        rows.len()
    );

    if !rows.is_empty() {
        let ups = rows.iter().filter(|r| r.target == 1).count();
        println!(
            "Target distribution: UP {} ({:.1}%), DOWN {} ({:.1}%)",
            ups,
            ups as f64 / rows.len() as f64 * 100.0,
            rows.len() - ups,
            (rows.len() - ups) as f64 / rows.len() as f64 * 100.0
        );
    }

    if let Some(path) = &args.export {
        export_csv(path, &rows)?;
        println!("Labeled dataset written to {:?}", path);
    }

    let config = TrainerConfig {
        forest: ForestParams {
            n_trees: args.n_trees,
            max_depth: args.max_depth,
            seed: args.seed,
        },
        test_fraction: args.test_fraction,
    };

    println!(
        "Training Random Forest Classifier (Trees: {}, Depth: {:?}, Seed: {})...",
        args.n_trees, args.max_depth, args.seed
    );
    match train(&rows, &config) {
        TrainOutcome::Trained(model) => println!(
            "OOS Test (n={}): accuracy={:.4} [{}; trained on {} rows]",
            model.test_rows,
            model.accuracy,
            model.classifier_name(),
            model.train_rows
        ),
        TrainOutcome::NoModel => println!("Not enough data to train the model."),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pricecast-{}-{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn test_export_creates_nested_directories() {
        let dir = scratch_dir("export-ok");
        let path = dir.join("nested").join("rows.csv");

        export_csv(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), LabeledRow::COLUMNS.join(","));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_reports_unwritable_directory() {
        let dir = scratch_dir("export-err");
        std::fs::create_dir_all(&dir).unwrap();
        // A regular file where the export directory should go
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let err = export_csv(&blocker.join("sub").join("rows.csv"), &[]).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to create export directory"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
