use axum::{
    Router,
    routing::{get, post, put},
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::config::Config;
use crate::db::store::TodoStore;
use crate::error::HubError;
use crate::handlers::{auth, todos};
use crate::service::{SessionRegistry, TodoService, UserService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct HubState {
    pub todos: TodoService,
    pub users: UserService,
    pub sessions: Arc<SessionRegistry>,
    pub login_limiter: Arc<DefaultDirectRateLimiter>,
}

impl HubState {
    /// Fails when `cfg` carries an unusable session lifetime.
    pub fn new(store: Arc<TodoStore>, cfg: &Config) -> Result<Self, HubError> {
        let per_minute = NonZeroU32::new(cfg.login_per_minute).unwrap_or(NonZeroU32::MIN);
        Ok(Self {
            todos: TodoService::new(Arc::clone(&store)),
            users: UserService::new(store),
            sessions: Arc::new(SessionRegistry::new(cfg.session_ttl()?)),
            login_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
        })
    }
}

pub fn hub_router(state: HubState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", post(auth::register))
        .route("/me", get(auth::me))
        .route("/todos", get(todos::list_all).post(todos::create_list))
        .route(
            "/todos/{id}",
            get(todos::get_list)
                .put(todos::update_list)
                .delete(todos::delete_list),
        )
        .route("/todos/{id}/items", post(todos::create_item))
        .route(
            "/todos/{id}/items/{item_id}",
            put(todos::update_item).delete(todos::delete_item),
        )
        .with_state(state)
}
