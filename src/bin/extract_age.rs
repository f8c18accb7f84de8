use std::path::PathBuf;

use age_mon::{
    extract::ExtractionStrategy,
    fetch::{FileFetcher, Fetcher},
};
use clap::{Parser, ValueEnum};

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
#[command(author, version, about)]
/// Runs the age extraction against a saved copy of the page
struct Cli {
    /// HTML file to read
    #[arg(value_name = "PATH")]
    html_filename: PathBuf,

    /// How to look for the age
    #[arg(long, short, value_enum, default_value_t = Strategy::SelectorDigits)]
    strategy: Strategy,

    /// CSS selector used by `selector-digits`
    #[arg(long)]
    selector: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum Strategy {
    /// Digits of the first selected element mentioning "Age"
    SelectorDigits,
    /// "<n> years old" near the text "Age"
    YearsOld,
}

impl Cli {
    fn extraction_strategy(&self) -> ExtractionStrategy {
        match (self.strategy, &self.selector) {
            (Strategy::SelectorDigits, Some(selector)) => ExtractionStrategy::SelectorDigits {
                selector: selector.clone(),
            },
            (Strategy::SelectorDigits, None) => ExtractionStrategy::default(),
            (Strategy::YearsOld, _) => ExtractionStrategy::YearsOld,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let html = FileFetcher::new(&cli.html_filename).fetch()?;
    let strategy = cli.extraction_strategy();
    match strategy.build()?.extract_age(&html) {
        Ok(age) => println!("{age}"),
        Err(e) => println!("No age found using {strategy}: {e}"),
    }
    Ok(())
}
