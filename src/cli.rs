use clap::{Parser, Subcommand};

const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

#[derive(Parser, Debug)]
#[command(name = "pfs-pricer")]
#[command(about = "Medicare physician fee schedule pricer", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the fee-schedule price for a billing code at a ZIP code.
    Price(PriceArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct PriceArgs {
    /// CPT/HCPCS billing code (e.g., 99285).
    #[arg(long)]
    pub code: String,

    /// 5-digit ZIP code (e.g., 00601).
    #[arg(long)]
    pub zip: String,

    /// Directory holding the reference CSV files.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,
}
