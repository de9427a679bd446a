//! Unit tests for the in-memory token repository

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{Identity, NewAccessToken};
use crate::errors::DomainError;
use crate::repositories::access_token::{AccessTokenRepository, InMemoryAccessTokenRepository};

fn new_token(user: &str, name: &str) -> NewAccessToken {
    NewAccessToken {
        name: name.to_string(),
        user_id: Identity::from(user),
        access_token: format!("access-{}-{}", user, name),
        refresh_token: format!("refresh-{}-{}", user, name),
        jti: Uuid::new_v4().to_string(),
    }
}

#[tokio::test]
async fn test_create_and_get() {
    let repo = InMemoryAccessTokenRepository::new();

    let created = repo.create(new_token("u1", "laptop")).await.unwrap();
    assert!(!created.revoked);

    let found = repo.get(created.id).await.unwrap();
    assert_eq!(found, Some(created));

    let missing = repo.get(Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_duplicate_name_for_same_user_conflicts() {
    let repo = InMemoryAccessTokenRepository::new();

    repo.create(new_token("u1", "laptop")).await.unwrap();
    let result = repo.create(new_token("u1", "laptop")).await;

    assert!(matches!(result, Err(DomainError::Conflict { .. })));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_same_name_for_different_users_is_allowed() {
    let repo = InMemoryAccessTokenRepository::new();

    repo.create(new_token("u1", "laptop")).await.unwrap();
    repo.create(new_token("u2", "laptop")).await.unwrap();

    assert_eq!(repo.len().await, 2);
}

#[tokio::test]
async fn test_duplicate_jti_conflicts() {
    let repo = InMemoryAccessTokenRepository::new();
    let first = new_token("u1", "laptop");
    let mut second = new_token("u2", "phone");
    second.jti = first.jti.clone();

    repo.create(first).await.unwrap();
    let result = repo.create(second).await;

    assert!(result.unwrap_err().is_conflict());
}

#[tokio::test]
async fn test_lookups_are_scoped_to_user() {
    let repo = InMemoryAccessTokenRepository::new();
    let created = repo.create(new_token("u1", "laptop")).await.unwrap();
    let u1 = Identity::from("u1");
    let u2 = Identity::from("u2");

    assert_eq!(repo.get_by_name(&u1, "laptop").await.unwrap().unwrap().id, created.id);
    assert!(repo.get_by_name(&u2, "laptop").await.unwrap().is_none());

    assert_eq!(repo.get_by_jti(&u1, &created.jti).await.unwrap().unwrap().id, created.id);
    assert!(repo.get_by_jti(&u2, &created.jti).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_by_user() {
    let repo = InMemoryAccessTokenRepository::new();
    for name in ["laptop", "phone", "ci"] {
        repo.create(new_token("u1", name)).await.unwrap();
    }
    repo.create(new_token("u2", "laptop")).await.unwrap();

    let tokens = repo.get_by_user(&Identity::from("u1")).await.unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| t.user_id.as_str() == "u1"));

    let none = repo.get_by_user(&Identity::from("nobody")).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let repo = InMemoryAccessTokenRepository::new();
    let created = repo.create(new_token("u1", "laptop")).await.unwrap();
    let u1 = Identity::from("u1");

    repo.revoke(&u1, created.id).await.unwrap();
    repo.revoke(&u1, created.id).await.unwrap();

    assert!(repo.get(created.id).await.unwrap().unwrap().revoked);
}

#[tokio::test]
async fn test_revoke_foreign_token_is_silent_noop() {
    let repo = InMemoryAccessTokenRepository::new();
    let created = repo.create(new_token("u1", "laptop")).await.unwrap();

    repo.revoke(&Identity::from("u2"), created.id).await.unwrap();
    repo.revoke(&Identity::from("u1"), Uuid::new_v4()).await.unwrap();

    assert!(!repo.get(created.id).await.unwrap().unwrap().revoked);
}

#[tokio::test]
async fn test_delete() {
    let repo = InMemoryAccessTokenRepository::new();
    let created = repo.create(new_token("u1", "laptop")).await.unwrap();

    repo.delete(&Identity::from("u2"), created.id).await.unwrap();
    assert!(repo.get(created.id).await.unwrap().is_some());

    repo.delete(&Identity::from("u1"), created.id).await.unwrap();
    assert!(repo.get(created.id).await.unwrap().is_none());
    assert!(repo.is_empty().await);

    // Name is free again once deleted
    repo.create(new_token("u1", "laptop")).await.unwrap();
}

#[tokio::test]
async fn test_touch_sets_last_used_on() {
    let repo = InMemoryAccessTokenRepository::new();
    let created = repo.create(new_token("u1", "laptop")).await.unwrap();
    let used_on = Utc::now();

    repo.touch(&created.jti, used_on).await.unwrap();
    repo.touch("unknown-jti", used_on).await.unwrap();

    let found = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(found.last_used_on, Some(used_on));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_have_single_winner() {
    let repo = Arc::new(InMemoryAccessTokenRepository::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.create(new_token("u1", "laptop")).await })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) if e.is_conflict() => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 15);
}

#[tokio::test]
async fn test_arc_delegates_to_inner_store() {
    let repo: Arc<dyn AccessTokenRepository> = Arc::new(InMemoryAccessTokenRepository::new());

    let created = repo.create(new_token("u1", "laptop")).await.unwrap();
    assert!(repo.get(created.id).await.unwrap().is_some());
}
