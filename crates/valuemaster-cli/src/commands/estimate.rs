use valuemaster_core::{AcquirerSet, CapmEstimator, CapmRequest};

use crate::cli::EstimateArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &EstimateArgs, acquirers: &AcquirerSet) -> Result<CommandResult, CliError> {
    let request = CapmRequest::new(args.sector.as_str(), args.country.clone())?;

    let mut sources = vec![
        acquirers.risk_free_rate().id(),
        acquirers.market_return().id(),
        acquirers.unlevered_beta().id(),
    ];
    if request.country().is_some() {
        sources.push(acquirers.country_risk_premium().id());
    }

    let estimate = CapmEstimator::new(acquirers.clone()).estimate(request).await?;
    tracing::info!(
        sector = estimate.sector.as_str(),
        expected_return = estimate.expected_return,
        "estimate computed"
    );
    CommandResult::from_serialize(&estimate, sources)
}
