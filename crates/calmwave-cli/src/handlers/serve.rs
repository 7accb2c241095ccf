//! Serve command handler.

use anyhow::Result;

use crate::commands::ServeArgs;

/// Run the HTTP server until interrupted.
pub async fn execute(args: &ServeArgs) -> Result<()> {
    calmwave_axum::start_server(args.server_config()).await
}
