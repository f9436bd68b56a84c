//! TCP listener setup.

use tokio::net::TcpListener;

use crate::config::ListenerConfig;
use crate::error::ServerError;

/// Bind the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ServerError> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}
