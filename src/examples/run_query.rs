//! Run a Query End to End
//!
//! Submits a stored query, polls its status until it settles, then prints the
//! first rows of the result set.
//!
//! Prerequisites:
//! 1. A Dune API key exported as DUNE_API_KEY
//! 2. Optionally DUNE_BASE_URL to route through a proxy
//!
//! Run with: cargo run --example run_query -- 1572338

use dune_rs::{Client, ClientConfig, Config, ExecutionState, QueryParameters, RequestOptions, TracingLogger};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: usize = 150;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dune_rs=debug")),
        )
        .init();

    let query_id: u64 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(1572338);

    let config: ClientConfig = Config::from_env()?.into();
    let client = Client::new(config.with_logger(Arc::new(TracingLogger)))?;

    let params = QueryParameters::new().with("grouping_parameter", 2);
    let submitted = client
        .query_with(query_id, RequestOptions::new().json_body(&params)?)
        .await?;
    let execution_id = submitted["execution_id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no execution_id in {submitted}"))?
        .to_string();
    println!("📤 Submitted query {query_id} as execution {execution_id}");

    let mut state = ExecutionState::from_response(&submitted).unwrap_or(ExecutionState::Unknown);
    let mut polls = 0;
    while !state.is_terminal() {
        if polls == MAX_POLLS {
            println!("⏱️  Giving up, cancelling {execution_id}");
            let cancelled = client.cancel(&execution_id).await?;
            println!("   {cancelled}");
            return Ok(());
        }
        tokio::time::sleep(POLL_INTERVAL).await;
        polls += 1;

        let status = client.execution_status(&execution_id).await?;
        state = ExecutionState::from_response(&status).unwrap_or(ExecutionState::Unknown);
        println!("   state: {state:?}");
    }

    if !state.has_results() {
        println!("❌ Execution ended in {state:?}");
        return Ok(());
    }

    let results = client
        .execution_with(&execution_id, RequestOptions::new().param("limit", 10))
        .await?;
    println!("✅ Results:");
    if let Some(rows) = results["result"]["rows"].as_array() {
        for row in rows {
            println!("   {row}");
        }
    }

    Ok(())
}
