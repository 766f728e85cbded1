//! Account lifecycle helpers on top of the user store.
//!
//! The store itself never interprets blobs or rejects keys; these helpers
//! implement the upstream policy around it: minting ids at signup and
//! checking payload well-formedness before a write is accepted.

use crate::{Error, Result, UserState, UserStore};
use uuid::Uuid;

/// Create a new user: mint an id, store the initial blob, return the id.
///
/// The id is a fresh v4 uuid, so an existing user is never overwritten by
/// signup.
pub fn create_user(store: &UserStore) -> Result<String> {
    let user_id = Uuid::new_v4().to_string();
    let blob = serde_json::to_string(&UserState::default())?;
    store.store(user_id.clone(), blob);
    tracing::info!("Created user {}", user_id);
    Ok(user_id)
}

/// Check that a raw payload decodes as a user-state blob.
///
/// Write paths call this before `store`; the store layer itself performs
/// no validation.
pub fn validate_payload(payload: &str) -> Result<UserState> {
    serde_json::from_str(payload)
        .map_err(|e| Error::Corrupt(format!("malformed user payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_mints_distinct_ids() {
        let store = UserStore::new();
        let a = create_user(&store).unwrap();
        let b = create_user(&store).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        // The initial blob is a valid, empty user state
        let blob = store.get(&a).unwrap();
        let state = validate_payload(&blob).unwrap();
        assert!(state.name.is_empty());
        assert!(state.workouts.is_empty());
    }

    #[test]
    fn test_validate_payload_rejects_malformed_json() {
        assert!(validate_payload("{ nope").is_err());
        let err = validate_payload("[1,2,3]").unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
    }

    #[test]
    fn test_validate_payload_accepts_partial_state() {
        let state = validate_payload(r#"{"name":"Alice"}"#).unwrap();
        assert_eq!(state.name, "Alice");
    }
}
