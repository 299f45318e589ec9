mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use pfs_pricer::{DataPaths, ReferenceData};

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = cli::Args::parse();

    match args.cmd {
        cli::Command::Price(cmd) => {
            let paths = DataPaths::new(&cmd.data_dir);
            if !paths.all_present() {
                bail!(
                    "Reference files missing under {}. Expected Zip-County.csv, 25LOCCO1.csv, GPCI2025.csv, PPRRVU25_JAN1.csv, national_county.txt",
                    cmd.data_dir
                );
            }
            let data = ReferenceData::load(&paths).context("Failed loading reference data")?;
            let price = data.price(&cmd.code, &cmd.zip)?;
            println!(
                "The Medicare price for {} in ZIP {} is: ${price:.2}",
                cmd.code.trim().to_uppercase(),
                cmd.zip.trim()
            );
            Ok(())
        }
    }
}
