use valuemaster_core::{AcquirerSet, BetaRequest};

use crate::cli::BetaArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &BetaArgs, acquirers: &AcquirerSet) -> Result<CommandResult, CliError> {
    let request = BetaRequest::new(args.sector.as_str())?;

    let source = acquirers.unlevered_beta();
    let beta = source.unlevered_beta(request).await?;
    CommandResult::from_serialize(&beta, vec![source.id()])
}
