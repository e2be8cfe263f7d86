//! Registration, login, and the session record.
//!
//! Authentication is a plaintext string comparison by design; this is a
//! demo venue with no security posture.

use storage::{STARTING_BALANCE, Store};
use types::{SessionUser, Timestamp, User, UserId};

use crate::error::{DeskError, DeskResult};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 4;

/// Register a new account and open its session.
pub fn register(
    store: &Store,
    username: &str,
    password: &str,
    confirm: &str,
    now: Timestamp,
) -> DeskResult<SessionUser> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(DeskError::Validation(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DeskError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != confirm {
        return Err(DeskError::Validation(
            "password and confirmation do not match".to_string(),
        ));
    }

    let mut users = store.users()?;
    if users.iter().any(|u| u.username == username) {
        return Err(DeskError::UsernameTaken);
    }

    let id = next_user_id(&users);
    users.push(User::new(id, username, password, STARTING_BALANCE, now));
    store.save_users(&users)?;

    let session = SessionUser {
        user_id: Some(id),
        username: username.to_string(),
        is_admin: false,
    };
    store.set_session(&session)?;
    tracing::info!(username, "registered new account");
    Ok(session)
}

/// Log in as a user or, with the fixed admin credential, as the admin.
pub fn login(store: &Store, username: &str, password: &str) -> DeskResult<SessionUser> {
    if let Some(admin) = store.admin()?
        && admin.username == username
        && admin.password == password
    {
        let session = SessionUser {
            user_id: None,
            username: username.to_string(),
            is_admin: true,
        };
        store.set_session(&session)?;
        tracing::info!(username, "admin logged in");
        return Ok(session);
    }

    let Some(user) = store.user_by_username(username)? else {
        return Err(DeskError::InvalidCredentials);
    };
    if user.password != password {
        return Err(DeskError::InvalidCredentials);
    }

    let session = SessionUser {
        user_id: Some(user.id),
        username: user.username.clone(),
        is_admin: false,
    };
    store.set_session(&session)?;
    tracing::info!(username, "user logged in");
    Ok(session)
}

/// Clear the session record.
pub fn logout(store: &Store) -> DeskResult<()> {
    store.clear_session()?;
    Ok(())
}

fn next_user_id(users: &[User]) -> UserId {
    UserId(users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::init_defaults;

    fn store() -> Store {
        let store = Store::open_in_memory().unwrap();
        init_defaults(&store, 0).unwrap();
        store
    }

    #[test]
    fn test_register_and_login() {
        let store = store();
        let session = register(&store, "alice", "s3cret", "s3cret", 1).unwrap();
        assert!(!session.is_admin);
        assert_eq!(session.user_id, Some(UserId(2)));

        let user = store.user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.balance, STARTING_BALANCE);

        logout(&store).unwrap();
        assert!(store.session().unwrap().is_none());

        let session = login(&store, "alice", "s3cret").unwrap();
        assert_eq!(session.username, "alice");
    }

    #[test]
    fn test_register_validation() {
        let store = store();
        assert!(matches!(
            register(&store, "al", "s3cret", "s3cret", 0),
            Err(DeskError::Validation(_))
        ));
        assert!(matches!(
            register(&store, "alice", "abc", "abc", 0),
            Err(DeskError::Validation(_))
        ));
        assert!(matches!(
            register(&store, "alice", "s3cret", "other", 0),
            Err(DeskError::Validation(_))
        ));
        assert!(matches!(
            register(&store, "user1", "s3cret", "s3cret", 0),
            Err(DeskError::UsernameTaken)
        ));
        // No partial effects: only the seeded user remains.
        assert_eq!(store.users().unwrap().len(), 1);
    }

    #[test]
    fn test_admin_login() {
        let store = store();
        let session = login(&store, "acep", "17").unwrap();
        assert!(session.is_admin);
        assert_eq!(session.user_id, None);
    }

    #[test]
    fn test_wrong_credentials() {
        let store = store();
        assert!(matches!(
            login(&store, "user1", "wrong"),
            Err(DeskError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&store, "ghost", "1234"),
            Err(DeskError::InvalidCredentials)
        ));
    }
}
