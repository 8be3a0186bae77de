//! CLI argument definitions for ValueMaster.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `risk-free-rate` | 10-year Treasury average as a decimal |
//! | `market-return` | Annualized S&P 500 return as a decimal |
//! | `beta` | Unlevered beta for an industry sector |
//! | `country-premium` | Country risk premium for one or more countries |
//! | `estimate` | CAPM expected return with every input |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--offline` | `false` | Use built-in sample tables |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! valuemaster beta --sector "Advertising"
//! valuemaster country-premium --country Brazil --country India --pretty
//! valuemaster estimate --sector "Drugs (Pharmaceutical)" --country Germany
//! valuemaster --offline estimate --sector Advertising
//! ```

use clap::{Args, Parser, Subcommand};

/// ValueMaster - CAPM inputs from public market data
#[derive(Debug, Parser)]
#[command(
    name = "valuemaster",
    author,
    version,
    about = "CAPM inputs from public market data",
    long_about = "ValueMaster fetches the inputs of the capital asset pricing model from public \
sources and prints them as JSON:\n\
\n\
  • Risk-free rate from the FRED 10-year Treasury series\n\
  • Market return from the FRED S&P 500 series\n\
  • Unlevered betas and country risk premiums from Damodaran's tables\n\
\n\
Set VALUEMASTER_FRED_API_KEY (or FRED_API_KEY) for the FRED-backed commands."
)]
pub struct Cli {
    /// Serve every input from built-in sample tables instead of the network.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Average 10-year Treasury yield over the lookback window.
    RiskFreeRate,

    /// Annualized S&P 500 return over the trailing window.
    MarketReturn,

    /// Unlevered beta for an industry sector.
    ///
    /// The sector name must match the published table exactly.
    ///
    ///   valuemaster beta --sector "Banks (Regional)"
    Beta(BetaArgs),

    /// Country risk premium lookup.
    ///
    /// Several countries are looked up together; the command fails if any is unknown.
    ///
    ///   valuemaster country-premium --country Brazil --country India
    CountryPremium(CountryPremiumArgs),

    /// CAPM expected return for a sector and optional country.
    Estimate(EstimateArgs),
}

#[derive(Debug, Args)]
pub struct BetaArgs {
    /// Industry sector name as published (e.g. "Advertising").
    #[arg(long)]
    pub sector: String,
}

#[derive(Debug, Args)]
pub struct CountryPremiumArgs {
    /// Country name; repeat for a batch lookup.
    #[arg(long = "country", required = true, num_args = 1)]
    pub countries: Vec<String>,
}

#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// Industry sector name as published.
    #[arg(long)]
    pub sector: String,

    /// Country whose risk premium is added to the estimate.
    #[arg(long)]
    pub country: Option<String>,
}
