use super::routes::{get_proposal, get_votes, health, list_proposals, AppState};
use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;

pub struct ApiServer {
    state: AppState,
    addr: String,
    cancel_token: CancellationToken,
}

impl ApiServer {
    pub fn new(state: AppState, addr: impl Into<String>) -> Self {
        Self {
            state,
            addr: addr.into(),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/proposals", get(list_proposals))
            .route("/proposals/{id}", get(get_proposal))
            .route("/votes/{proposal_id}", get(get_votes))
            .with_state(state)
    }

    pub async fn start(self) -> eyre::Result<()> {
        let app = Self::router(self.state);

        let listener = tokio::net::TcpListener::bind(self.addr.as_str()).await?;
        tracing::info!("API server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                self.cancel_token.cancelled().await;
            })
            .await?;

        Ok(())
    }
}
