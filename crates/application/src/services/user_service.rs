//! Users resource

use restcheck_domain::{Response, User, UserStatus};
use tracing::info;

use crate::client::RestClient;
use crate::context::WorkerContext;
use crate::error::ClientResult;

/// Collection endpoint.
pub const USERS_ENDPOINT: &str = "/public/v2/users";
/// Single-user endpoint template.
pub const USER_BY_ID_ENDPOINT: &str = "/public/v2/users/{userId}";

const USER_ID: &str = "userId";

/// Calls against `/public/v2/users`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserService;

impl UserService {
    /// Creates the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// `POST /users`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn create_user(&self, worker: &mut WorkerContext, user: &User) -> ClientResult<Response> {
        info!(worker = %worker.id(), name = %user.name, email = %user.email, "creating user");
        RestClient::new(worker).post(USERS_ENDPOINT, user).await
    }

    /// `GET /users/{userId}`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn get_user(&self, worker: &mut WorkerContext, user_id: u64) -> ClientResult<Response> {
        info!(worker = %worker.id(), user_id, "getting user");
        RestClient::new(worker)
            .add_path_param(USER_ID, user_id.to_string())
            .get(USER_BY_ID_ENDPOINT)
            .await
    }

    /// `GET /users`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn get_all_users(&self, worker: &mut WorkerContext) -> ClientResult<Response> {
        info!(worker = %worker.id(), "getting all users");
        RestClient::new(worker).get(USERS_ENDPOINT).await
    }

    /// `PUT /users/{userId}`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn update_user(
        &self,
        worker: &mut WorkerContext,
        user_id: u64,
        user: &User,
    ) -> ClientResult<Response> {
        info!(worker = %worker.id(), user_id, "updating user");
        RestClient::new(worker)
            .add_path_param(USER_ID, user_id.to_string())
            .put(USER_BY_ID_ENDPOINT, user)
            .await
    }

    /// `DELETE /users/{userId}`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn delete_user(&self, worker: &mut WorkerContext, user_id: u64) -> ClientResult<Response> {
        info!(worker = %worker.id(), user_id, "deleting user");
        RestClient::new(worker)
            .add_path_param(USER_ID, user_id.to_string())
            .delete(USER_BY_ID_ENDPOINT)
            .await
    }

    /// `GET /users?name=...`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn search_users_by_name(
        &self,
        worker: &mut WorkerContext,
        name: &str,
    ) -> ClientResult<Response> {
        info!(worker = %worker.id(), name, "searching users by name");
        RestClient::new(worker)
            .add_query_param("name", name)
            .get(USERS_ENDPOINT)
            .await
    }

    /// `GET /users?status=...`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn search_users_by_status(
        &self,
        worker: &mut WorkerContext,
        status: UserStatus,
    ) -> ClientResult<Response> {
        info!(worker = %worker.id(), %status, "searching users by status");
        RestClient::new(worker)
            .add_query_param("status", status.as_str())
            .get(USERS_ENDPOINT)
            .await
    }
}
