use super::ResponseWriter;
use async_trait::async_trait;
use ferrous_relay_domain::QueryContext;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Resolution pipeline entry point.
///
/// Called once per decoded query on its own task. `scope` is cancelled when
/// the originating connection closes; honouring it is up to the implementor.
/// Outcomes are reported only through `writer`.
#[async_trait]
pub trait QueryDispatcher: Send + Sync {
    async fn serve(
        &self,
        scope: CancellationToken,
        ctx: QueryContext,
        writer: Arc<dyn ResponseWriter>,
    );
}
