//! Server startup utilities
//!
//! Tracing setup plus the `serve_stdio!` macro that every server's `main.rs`
//! reduces to.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for an MCP server.
///
/// Logs go to stderr - stdout is reserved for the MCP protocol. The filter
/// honors `RUST_LOG` and defaults the given crate to `info`. Setting
/// `LOG_FORMAT=json` switches to structured JSON lines for log aggregation.
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

/// Expand to a complete `#[tokio::main]` entrypoint for an MCP server.
///
/// The server type must provide `async fn connect() -> anyhow::Result<Self>`
/// so construction can do real work (open a database, resolve a schema)
/// before the transport starts. The macro then:
///
/// 1. initializes tracing to stderr
/// 2. constructs the server via `connect()`
/// 3. serves over stdio until the peer hangs up
///
/// ```rust,ignore
/// mod server;
/// use server::HoldsMcpServer;
///
/// mcp_common::serve_stdio!(HoldsMcpServer, "holds_mcp");
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr) => {
        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            use rmcp::ServiceExt;

            $crate::init_tracing($crate_name)?;

            tracing::info!(concat!("Starting ", $crate_name, " MCP Server"));

            let server = <$server_type>::connect().await?;
            let service = server.serve(rmcp::transport::stdio()).await?;

            tracing::info!("Server running, waiting for requests...");

            service.waiting().await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}
