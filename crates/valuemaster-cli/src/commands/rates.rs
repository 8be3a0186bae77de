use valuemaster_core::AcquirerSet;

use crate::error::CliError;

use super::CommandResult;

pub async fn risk_free_rate(acquirers: &AcquirerSet) -> Result<CommandResult, CliError> {
    let source = acquirers.risk_free_rate();
    let rate = source.risk_free_rate().await?;
    CommandResult::from_serialize(&rate, vec![source.id()])
}

pub async fn market_return(acquirers: &AcquirerSet) -> Result<CommandResult, CliError> {
    let source = acquirers.market_return();
    let rate = source.market_return().await?;
    CommandResult::from_serialize(&rate, vec![source.id()])
}
