//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see the
//! driving ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CommentCommand, CommentQuery, TaskCommand, TaskQuery, TokenAuthenticator,
    UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub authenticator: Arc<dyn TokenAuthenticator>,
    pub users: Arc<dyn UsersQuery>,
    pub tasks: Arc<dyn TaskCommand>,
    pub tasks_query: Arc<dyn TaskQuery>,
    pub comments: Arc<dyn CommentCommand>,
    pub comments_query: Arc<dyn CommentQuery>,
}

impl HttpState {
    /// Fan three services out to the ports they implement.
    ///
    /// Each service sits behind one `Arc`; the port fields share it.
    pub fn new<A, T, C>(accounts: Arc<A>, tasks: Arc<T>, comments: Arc<C>) -> Self
    where
        A: AccountCommand + TokenAuthenticator + UsersQuery + 'static,
        T: TaskCommand + TaskQuery + 'static,
        C: CommentCommand + CommentQuery + 'static,
    {
        Self {
            accounts: accounts.clone(),
            authenticator: accounts.clone(),
            users: accounts,
            tasks: tasks.clone(),
            tasks_query: tasks,
            comments: comments.clone(),
            comments_query: comments,
        }
    }
}
