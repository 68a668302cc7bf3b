use axum::Router;

use crate::AppState;

mod auth;
mod error;
mod handlers;
mod routes;

pub use auth::CallerRole;
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(routes::catalogue())
        .merge(routes::access())
        .merge(routes::notifications());

    Router::new()
        .merge(routes::health())
        .nest("/v1", v1)
        .with_state(state)
}
