use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ExecutionState mirrors the `state` field reported for an execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionState {
    #[serde(rename = "QUERY_STATE_PENDING")]
    Pending,
    #[serde(rename = "QUERY_STATE_EXECUTING")]
    Executing,
    #[serde(rename = "QUERY_STATE_COMPLETED")]
    Completed,
    #[serde(rename = "QUERY_STATE_COMPLETED_PARTIAL")]
    CompletedPartial,
    #[serde(rename = "QUERY_STATE_FAILED")]
    Failed,
    #[serde(rename = "QUERY_STATE_CANCELLED")]
    Cancelled,
    #[serde(rename = "QUERY_STATE_EXPIRED")]
    Expired,
    #[serde(other)]
    Unknown,
}

impl ExecutionState {
    /// Read the `state` field of a submit or status response
    pub fn from_response(value: &serde_json::Value) -> Option<Self> {
        let state = value.get("state")?;
        serde_json::from_value(state.clone()).ok()
    }

    /// True once the server will no longer change the state on its own
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Executing | Self::Unknown)
    }

    /// True when a result set can be fetched
    pub fn has_results(&self) -> bool {
        matches!(self, Self::Completed | Self::CompletedPartial)
    }
}

/// QueryParameters is the body accepted by the execute endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryParameters {
    #[serde(default)]
    pub query_parameters: BTreeMap<String, serde_json::Value>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.query_parameters.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query_parameters.is_empty()
    }
}
