mod beta;
mod country_premium;
mod estimate;
mod rates;

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use valuemaster_core::{AcquirerSet, AcquirerSetBuilder, SourceId};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::{Envelope, Metadata};

pub struct CommandResult {
    pub data: Value,
    pub sources: Vec<SourceId>,
}

impl CommandResult {
    pub fn from_serialize<T: Serialize>(
        data: &T,
        sources: Vec<SourceId>,
    ) -> Result<Self, CliError> {
        Ok(Self {
            data: serde_json::to_value(data)?,
            sources,
        })
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let mut builder = AcquirerSetBuilder::from_env()?;
    if cli.offline {
        builder = builder.with_offline_mode();
    }

    execute(&cli.command, &builder.build()).await
}

pub async fn execute(command: &Command, acquirers: &AcquirerSet) -> Result<Envelope, CliError> {
    let started = Instant::now();

    let CommandResult { data, sources } = match command {
        Command::RiskFreeRate => rates::risk_free_rate(acquirers).await?,
        Command::MarketReturn => rates::market_return(acquirers).await?,
        Command::Beta(args) => beta::run(args, acquirers).await?,
        Command::CountryPremium(args) => country_premium::run(args, acquirers).await?,
        Command::Estimate(args) => estimate::run(args, acquirers).await?,
    };

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(Envelope {
        meta: Metadata::new(acquirers.mode(), &sources, latency_ms),
        data,
    })
}
