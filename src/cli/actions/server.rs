use crate::cli::actions::Action;
use crate::proxy;
use anyhow::Result;
use tracing::debug;

/// Handle the server action
/// # Errors
/// Returns an error if the proxy cannot be configured or fails to start
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, backend_url } => {
            debug!(port, backend_url = %backend_url, "starting proxy");
            proxy::new(port, &backend_url).await?;
        }
    }

    Ok(())
}
