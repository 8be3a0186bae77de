use valuemaster_core::{AcquirerSet, CountryBatchRequest, CountryRequest};

use crate::cli::CountryPremiumArgs;
use crate::error::CliError;

use super::CommandResult;

/// One country prints `{ risk }`; several print `{ risks: { name: risk } }`.
pub async fn run(
    args: &CountryPremiumArgs,
    acquirers: &AcquirerSet,
) -> Result<CommandResult, CliError> {
    let source = acquirers.country_risk_premium();

    if let [country] = args.countries.as_slice() {
        let premium = source
            .country_risk_premium(CountryRequest::new(country.as_str())?)
            .await?;
        return CommandResult::from_serialize(&premium, vec![source.id()]);
    }

    let request = CountryBatchRequest::new(args.countries.clone())?;
    let premiums = source.country_risk_premiums(request).await?;
    CommandResult::from_serialize(&premiums, vec![source.id()])
}
