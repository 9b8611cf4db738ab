//! Tool parameter types

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the ask_holds tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AskHoldsParams {
    /// Natural-language question about invoice holds, e.g. "how many price
    /// holds are open?"
    pub question: String,
}

/// Parameters for the list_holds tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListHoldsParams {
    /// Maximum number of holds to return (default 20, capped at 100)
    pub limit: Option<u32>,
}
