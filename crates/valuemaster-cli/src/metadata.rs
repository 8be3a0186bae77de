use serde::{Deserialize, Serialize};
use serde_json::Value;
use valuemaster_core::{AcquisitionMode, SourceId};

/// Command metadata printed next to the result.
///
/// Field order is fixed to keep deterministic JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub mode: AcquisitionMode,
    pub source_chain: Vec<SourceId>,
    pub latency_ms: u64,
}

impl Metadata {
    /// Repeated sources are listed once, in first-seen order.
    pub fn new(mode: AcquisitionMode, sources: &[SourceId], latency_ms: u64) -> Self {
        let mut source_chain = Vec::with_capacity(sources.len());
        for source in sources {
            if !source_chain.contains(source) {
                source_chain.push(*source);
            }
        }

        Self {
            mode,
            source_chain,
            latency_ms,
        }
    }
}

/// Top-level JSON document printed by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub meta: Metadata,
    pub data: Value,
}
