use async_trait::async_trait;
use ferrous_relay_application::ports::{
    CancellationToken, QueryContext, QueryDispatcher, ResponseWriter,
};
use ferrous_relay_domain::DomainError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use super::builders::{echo_response, padded_response};

#[derive(Clone, Copy)]
pub enum DispatchMode {
    /// Record the context, write nothing.
    Silent,
    /// Answer with an empty response.
    Echo,
    /// Sleep `base * id` first, then answer with a padded response.
    DelayedById { base: Duration, padding: usize },
}

/// Records every dispatched context and optionally answers it.
pub struct MockDispatcher {
    mode: DispatchMode,
    seen: mpsc::UnboundedSender<QueryContext>,
    write_outcomes: Arc<Mutex<Vec<Result<usize, DomainError>>>>,
    scopes: Arc<Mutex<Vec<CancellationToken>>>,
}

impl MockDispatcher {
    pub fn new(mode: DispatchMode) -> (Arc<Self>, mpsc::UnboundedReceiver<QueryContext>) {
        let (seen, rx) = mpsc::unbounded_channel();
        let dispatcher = Arc::new(Self {
            mode,
            seen,
            write_outcomes: Arc::new(Mutex::new(vec![])),
            scopes: Arc::new(Mutex::new(vec![])),
        });
        (dispatcher, rx)
    }

    pub fn write_outcomes(&self) -> Vec<Result<usize, DomainError>> {
        self.write_outcomes.lock().unwrap().clone()
    }

    pub fn scopes(&self) -> Vec<CancellationToken> {
        self.scopes.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryDispatcher for MockDispatcher {
    async fn serve(
        &self,
        scope: CancellationToken,
        mut ctx: QueryContext,
        writer: Arc<dyn ResponseWriter>,
    ) {
        self.scopes.lock().unwrap().push(scope);
        let _ = self.seen.send(ctx.copy());

        let query = match ctx.query() {
            Some(query) => query.clone(),
            None => return,
        };

        let response = match self.mode {
            DispatchMode::Silent => return,
            DispatchMode::Echo => echo_response(&query),
            DispatchMode::DelayedById { base, padding } => {
                tokio::time::sleep(base * u32::from(query.id())).await;
                padded_response(&query, padding)
            }
        };

        ctx.set_response(response);
        let outcome = writer.write(ctx.response().unwrap()).await;
        self.write_outcomes.lock().unwrap().push(outcome);
    }
}
