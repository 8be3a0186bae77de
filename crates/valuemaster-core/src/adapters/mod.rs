pub mod damodaran;
pub mod fred;
pub mod offline;

pub use damodaran::{DamodaranBetas, DamodaranCountryPremiums};
pub use fred::{FredMarketReturn, FredRiskFreeRate, FredSeriesClient};
pub use offline::OfflineMarketData;
