use ferrous_relay_application::ports::QueryDispatcher;
use ferrous_relay_domain::Config;
use ferrous_relay_infrastructure::dns::{bind_tcp_listener, StreamServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn start_dns_server(
    config: &Config,
    dispatcher: Arc<dyn QueryDispatcher>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = config.server.listen_address().parse()?;
    let listener = bind_tcp_listener(socket_addr, config.server.backlog)?;

    let server = StreamServer::new(listener, &config.server.stream_config()).with_shutdown(shutdown);

    info!(
        bind_address = %socket_addr,
        read_timeout = ?server.read_timeout(),
        "DNS stream server listening"
    );

    server.run(dispatcher).await?;
    Ok(())
}
