use anyhow::Context;
use clap::Parser;
use saizeriya_gacha::adapters::source::{EmbeddedMenuSource, FileMenuSource, RemoteMenuSource};
use saizeriya_gacha::core::formatter::format_reply;
use saizeriya_gacha::core::MenuSource;
use saizeriya_gacha::domain::model::Budget;
use saizeriya_gacha::utils::logger;
use saizeriya_gacha::{Gacha, MenuStore};

#[derive(Parser)]
#[command(name = "gacha-draw")]
#[command(about = "Draw a Saizeriya order locally and print the reply text")]
struct Args {
    /// Budget in yen
    #[arg(short, long, default_value_t = 1000)]
    budget: u64,

    /// Read the menu from a hosted JSON document instead of the bundled one
    #[arg(long, conflicts_with = "menu_file")]
    menu_url: Option<String>,

    /// Read the menu from a local JSON document instead of the bundled one
    #[arg(long)]
    menu_file: Option<String>,

    /// Number of draws to print
    #[arg(short, long, default_value_t = 1)]
    times: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let source: Box<dyn MenuSource> = match (&args.menu_url, &args.menu_file) {
        (Some(url), _) => Box::new(RemoteMenuSource::new(url.clone())?),
        (None, Some(path)) => Box::new(FileMenuSource::new(path)),
        (None, None) => Box::new(EmbeddedMenuSource),
    };

    let store = MenuStore::new();
    store
        .try_load(source.as_ref())
        .await
        .with_context(|| format!("failed to load menu from {}", source.describe()))?;

    let gacha = Gacha::new();
    let snapshot = store.snapshot();
    for round in 0..args.times {
        if round > 0 {
            println!("----");
        }
        let selection = gacha.draw(Budget::new(args.budget), &snapshot);
        println!("{}", format_reply(&selection));
        tracing::info!("💴 Spent {} of {} yen", selection.spent, args.budget);
    }

    Ok(())
}
