//! User store integration tests
//!
//! The same contract is exercised against every backend: the in-process
//! map store and SQLite (in-memory plus a file-backed reopen case).

use std::sync::Arc;

use warden::types::AppError;
use warden::users::{InMemoryUserRepository, NewUser, SqliteUserRepository, UserRepository};

// ============= Test Helpers =============

/// Every backend the contract applies to, labelled for assertion messages.
async fn all_backends() -> Vec<(&'static str, Box<dyn UserRepository>)> {
    let sqlite = SqliteUserRepository::new_memory()
        .await
        .expect("Failed to create in-memory SQLite store");

    vec![
        ("memory", Box::new(InMemoryUserRepository::new()) as Box<dyn UserRepository>),
        ("sqlite", Box::new(sqlite) as Box<dyn UserRepository>),
    ]
}

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=8,t=1,p=1$c29tZXNhbHQ$c3RvcmVkaGFzaA".to_string(),
        full_name: "Test User".to_string(),
        roles: vec!["user".to_string()],
    }
}

// ============= Contract Tests =============

#[tokio::test]
async fn test_create_then_find_by_each_key() {
    for (backend, repo) in all_backends().await {
        let created = repo
            .create(new_user("alice", "alice@example.com"))
            .await
            .expect("create should succeed");

        assert!(!created.id.is_empty(), "{backend}: id should be assigned");
        assert!(created.is_active, "{backend}: new accounts start active");
        assert!(created.created_at > 0, "{backend}: created_at should be set");

        let by_username = repo
            .find_by_username("alice")
            .await
            .expect("lookup should succeed")
            .expect("username lookup should hit");
        assert_eq!(by_username.email, "alice@example.com");
        assert_eq!(by_username.roles, vec!["user".to_string()]);

        let by_email = repo
            .find_by_email("alice@example.com")
            .await
            .expect("lookup should succeed")
            .expect("email lookup should hit");
        assert_eq!(by_email.id, created.id);

        let by_id = repo
            .find_by_id(&created.id)
            .await
            .expect("lookup should succeed")
            .expect("id lookup should hit");
        assert_eq!(by_id.username, "alice");
    }
}

#[tokio::test]
async fn test_unknown_lookups_return_none() {
    for (backend, repo) in all_backends().await {
        let by_username = repo
            .find_by_username("nobody")
            .await
            .expect("lookup should succeed");
        assert!(by_username.is_none(), "{backend}: unknown username");

        let by_email = repo
            .find_by_email("nobody@example.com")
            .await
            .expect("lookup should succeed");
        assert!(by_email.is_none(), "{backend}: unknown email");

        let by_id = repo.find_by_id("missing").await.expect("lookup should succeed");
        assert!(by_id.is_none(), "{backend}: unknown id");
    }
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    for (backend, repo) in all_backends().await {
        repo.create(new_user("bob", "bob@example.com"))
            .await
            .expect("first create should succeed");

        let err = repo
            .create(new_user("bob", "other@example.com"))
            .await
            .expect_err("duplicate username should be rejected");
        assert!(
            matches!(err, AppError::UsernameTaken),
            "{backend}: got {err:?}"
        );
    }
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    for (backend, repo) in all_backends().await {
        repo.create(new_user("carol", "carol@example.com"))
            .await
            .expect("first create should succeed");

        let err = repo
            .create(new_user("other", "carol@example.com"))
            .await
            .expect_err("duplicate email should be rejected");
        assert!(matches!(err, AppError::EmailTaken), "{backend}: got {err:?}");
    }
}

#[tokio::test]
async fn test_both_taken_reports_username_first() {
    for (backend, repo) in all_backends().await {
        repo.create(new_user("dave", "dave@example.com"))
            .await
            .expect("first create should succeed");

        // Exact duplicate: both keys collide, the username wins the report.
        let err = repo
            .create(new_user("dave", "dave@example.com"))
            .await
            .expect_err("full duplicate should be rejected");
        assert!(
            matches!(err, AppError::UsernameTaken),
            "{backend}: got {err:?}"
        );
    }
}

#[tokio::test]
async fn test_find_all_in_creation_order() {
    for (backend, repo) in all_backends().await {
        for name in ["first", "second", "third"] {
            repo.create(new_user(name, &format!("{name}@example.com")))
                .await
                .expect("create should succeed");
        }

        let all = repo.find_all().await.expect("find_all should succeed");
        let usernames: Vec<&str> = all.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(
            usernames,
            vec!["first", "second", "third"],
            "{backend}: creation order"
        );
    }
}

#[tokio::test]
async fn test_roles_survive_storage() {
    for (backend, repo) in all_backends().await {
        let mut user = new_user("erin", "erin@example.com");
        user.roles = vec![
            "admin".to_string(),
            "user".to_string(),
            "auditor".to_string(),
        ];
        repo.create(user).await.expect("create should succeed");

        let found = repo
            .find_by_username("erin")
            .await
            .expect("lookup should succeed")
            .expect("account should exist");
        assert_eq!(
            found.roles,
            vec!["admin", "user", "auditor"],
            "{backend}: roles round-trip"
        );
    }
}

#[tokio::test]
async fn test_concurrent_creates_have_one_winner() {
    for (backend, repo) in all_backends().await {
        let repo: Arc<dyn UserRepository> = Arc::from(repo);

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create(new_user("contended", &format!("racer{i}@example.com")))
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.expect("task should not panic") {
                Ok(_) => winners += 1,
                Err(err) => assert!(
                    matches!(err, AppError::UsernameTaken),
                    "{backend}: loser should see the username conflict, got {err:?}"
                ),
            }
        }
        assert_eq!(winners, 1, "{backend}: exactly one create wins");

        let all = repo.find_all().await.expect("find_all should succeed");
        assert_eq!(all.len(), 1, "{backend}: store holds exactly one record");
    }
}

// ============= File-Backed SQLite Tests =============

#[tokio::test]
async fn test_file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir
        .path()
        .join("users.db")
        .to_str()
        .expect("path should be valid UTF-8")
        .to_string();

    {
        let repo = SqliteUserRepository::new_local(&path)
            .await
            .expect("Failed to create file-backed store");
        repo.create(new_user("durable", "durable@example.com"))
            .await
            .expect("create should succeed");
    }

    // A fresh handle on the same file sees the account.
    let reopened = SqliteUserRepository::new_local(&path)
        .await
        .expect("Failed to reopen file-backed store");
    let found = reopened
        .find_by_username("durable")
        .await
        .expect("lookup should succeed")
        .expect("account should survive reopen");
    assert_eq!(found.email, "durable@example.com");
}

#[tokio::test]
async fn test_reopen_keeps_unique_constraints() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir
        .path()
        .join("users.db")
        .to_str()
        .expect("path should be valid UTF-8")
        .to_string();

    {
        let repo = SqliteUserRepository::new_local(&path)
            .await
            .expect("Failed to create file-backed store");
        repo.create(new_user("fixed", "fixed@example.com"))
            .await
            .expect("create should succeed");
    }

    let reopened = SqliteUserRepository::new_local(&path)
        .await
        .expect("Failed to reopen file-backed store");
    let err = reopened
        .create(new_user("fixed", "other@example.com"))
        .await
        .expect_err("reopened store should still enforce uniqueness");
    assert!(matches!(err, AppError::UsernameTaken));
}
