//! User API scenarios
//!
//! `create_user` opens a chain that every other stateful scenario hangs off;
//! the list and status-search scenarios run on their own.

use restcheck_application::scenario::{
    Scenario, ScenarioContext, ScenarioFuture, Suite, boxed, ensure, ensure_eq, ensure_status,
};
use restcheck_application::{ScenarioError, UserService};
use restcheck_domain::{Gender, User, UserStatus};
use uuid::Uuid;

use super::missing;

/// Report category of this suite.
pub const CATEGORY: &str = "User API Tests";

/// Values carried between the scenarios of one chain.
#[derive(Debug, Default)]
pub struct UserState {
    user: Option<User>,
}

impl UserState {
    fn created(&self) -> Result<(u64, &User), ScenarioError> {
        let user = self
            .user
            .as_ref()
            .ok_or_else(|| ScenarioError::Precondition("no user was created".to_string()))?;
        Ok((user.require_id()?, user))
    }
}

/// The user suite, in declaration order.
#[must_use]
pub fn suite() -> Suite<UserState> {
    Suite::new(CATEGORY)
        .with_scenario(Scenario::new("create_user", create_user).with_description("Create a new user"))
        .with_scenario(
            Scenario::new("get_user", get_user)
                .with_description("Get user by ID")
                .depends_on("create_user"),
        )
        .with_scenario(
            Scenario::new("update_user", update_user)
                .with_description("Update user")
                .depends_on("create_user"),
        )
        .with_scenario(
            Scenario::new("search_users_by_name", search_users_by_name)
                .with_description("Search users by name")
                .depends_on("create_user"),
        )
        .with_scenario(
            Scenario::new("delete_user", delete_user)
                .with_description("Delete user")
                .depends_on("get_user")
                .depends_on("update_user")
                .depends_on("search_users_by_name"),
        )
        .with_scenario(
            Scenario::new("get_all_users", get_all_users)
                .with_description("Get all users - independent test for parallel execution"),
        )
        .with_scenario(
            Scenario::new("search_users_by_status", search_users_by_status)
                .with_description("Search users by status - independent test"),
        )
}

fn unique_user(cx: &ScenarioContext<'_, UserState>) -> User {
    let tag = Uuid::now_v7().simple().to_string();
    User::new(
        format!("John Doe {}", cx.worker.id()),
        format!("john.doe.{tag}@test.com"),
        Gender::Male,
    )
}

fn create_user(cx: ScenarioContext<'_, UserState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let user = unique_user(&cx);
        cx.entry.info(format!("Creating new user: {}", user.name));

        let response = UserService::new().create_user(cx.worker, &user).await?;
        ensure_status(&response, 201)?;

        let created: User = response.json()?;
        let id = created.id.ok_or_else(|| missing("user id"))?;
        ensure_eq(&created.name, &user.name, "user name")?;

        cx.entry.pass(format!("User created successfully with ID: {id}"));
        cx.state.user = Some(User {
            id: Some(id),
            ..user
        });
        Ok(())
    })
}

fn get_user(cx: ScenarioContext<'_, UserState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let (id, expected) = cx.state.created()?;
        cx.entry.info(format!("Fetching user with ID: {id}"));

        let response = UserService::new().get_user(cx.worker, id).await?;
        ensure_status(&response, 200)?;

        let fetched: User = response.json()?;
        ensure_eq(&fetched.id, &Some(id), "user id")?;
        ensure_eq(&fetched.email, &expected.email, "user email")?;

        cx.entry.pass("User fetched successfully");
        Ok(())
    })
}

fn update_user(cx: ScenarioContext<'_, UserState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let (id, current) = cx.state.created()?;
        let mut user = current.clone();
        user.name = format!("John Doe Updated {}", cx.worker.id());
        cx.entry.info(format!("Updating user with ID: {id}"));

        let response = UserService::new().update_user(cx.worker, id, &user).await?;
        ensure_status(&response, 200)?;

        let updated: User = response.json()?;
        ensure(updated.name.contains("Updated"), || {
            format!("user name should contain 'Updated', got '{}'", updated.name)
        })?;

        cx.entry.pass("User updated successfully");
        cx.state.user = Some(user);
        Ok(())
    })
}

fn search_users_by_name(cx: ScenarioContext<'_, UserState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let (id, user) = cx.state.created()?;
        let name = user.name.clone();
        cx.entry.info(format!("Searching users with name: {name}"));

        let response = UserService::new().search_users_by_name(cx.worker, &name).await?;
        ensure_status(&response, 200)?;

        let found: Vec<User> = response.json()?;
        ensure(found.iter().any(|u| u.id == Some(id)), || {
            format!("user {id} not found among {} result(s)", found.len())
        })?;

        cx.entry.pass(format!("Users search by name returned {} result(s)", found.len()));
        Ok(())
    })
}

fn delete_user(cx: ScenarioContext<'_, UserState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let (id, _) = cx.state.created()?;
        cx.entry.info(format!("Deleting user with ID: {id}"));

        let service = UserService::new();
        let response = service.delete_user(cx.worker, id).await?;
        ensure_status(&response, 204)?;

        let response = service.get_user(cx.worker, id).await?;
        ensure_status(&response, 404)?;

        cx.entry.pass("User deleted successfully");
        cx.state.user = None;
        Ok(())
    })
}

fn get_all_users(cx: ScenarioContext<'_, UserState>) -> ScenarioFuture<'_> {
    boxed(async move {
        cx.entry.info("Fetching all users");

        let response = UserService::new().get_all_users(cx.worker).await?;
        ensure_status(&response, 200)?;

        let count = response.json_array_len()?.unwrap_or(0);
        ensure(count > 0, || "user list should not be empty".to_string())?;

        cx.entry.pass(format!("All users fetched successfully. Count: {count}"));
        Ok(())
    })
}

fn search_users_by_status(cx: ScenarioContext<'_, UserState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let status = UserStatus::Active;
        cx.entry.info(format!("Searching users with status: {status}"));

        let response = UserService::new().search_users_by_status(cx.worker, status).await?;
        ensure_status(&response, 200)?;

        let found: Vec<User> = response.json()?;
        ensure(found.iter().all(|u| u.status == status), || {
            format!("every listed user should be {status}")
        })?;

        cx.entry.pass("Users search by status completed successfully");
        Ok(())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_keeps_stateful_scenarios_on_one_chain() {
        let suite = suite();
        let plan = suite.plan().unwrap();
        let names = |chain: &[usize]| -> Vec<&str> {
            chain.iter().map(|&i| suite.scenarios()[i].name()).collect()
        };

        assert_eq!(plan.chains().len(), 3);
        assert_eq!(
            names(&plan.chains()[0]),
            vec![
                "create_user",
                "get_user",
                "update_user",
                "search_users_by_name",
                "delete_user"
            ]
        );
        assert_eq!(names(&plan.chains()[1]), vec!["get_all_users"]);
        assert_eq!(names(&plan.chains()[2]), vec!["search_users_by_status"]);
    }
}
