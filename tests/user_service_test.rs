//! User service tests against the real in-memory repository.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use users_api::domain::{CreateUser, UpdateUser};
use users_api::errors::AppError;
use users_api::infra::{InMemoryUserRepository, RecordStore};
use users_api::services::{UserManager, UserService};

fn service() -> UserManager {
    let store = Arc::new(RecordStore::new());
    UserManager::new(Arc::new(InMemoryUserRepository::new(store)))
}

fn create_data(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password: "Secret123".to_string(),
        is_active: None,
    }
}

#[tokio::test]
async fn created_user_is_immediately_readable() {
    let service = service();

    let created = service.create_user(create_data("a@x.com")).await.unwrap();
    let fetched = service.get_user(created.id).await.unwrap();

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.email, "a@x.com");
    assert_eq!(fetched.first_name, "Test");
    assert!(fetched.is_active);
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[tokio::test]
async fn each_create_assigns_a_previously_unseen_id() {
    let service = service();
    let mut seen = HashSet::new();

    for i in 0..10 {
        let user = service
            .create_user(create_data(&format!("user{}@x.com", i)))
            .await
            .unwrap();
        assert!(seen.insert(user.id));
    }
}

#[tokio::test]
async fn duplicate_email_create_is_rejected() {
    let service = service();
    service.create_user(create_data("a@x.com")).await.unwrap();

    let err = service
        .create_user(create_data("a@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(service.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn delete_then_get_fails_with_not_found() {
    let service = service();
    let created = service.create_user(create_data("a@x.com")).await.unwrap();

    service.delete_user(created.id).await.unwrap();

    let err = service.get_user(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn delete_unknown_id_fails_with_not_found() {
    let service = service();
    let err = service.delete_user(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn invalid_email_update_leaves_the_record_unchanged() {
    let service = service();
    let created = service.create_user(create_data("a@x.com")).await.unwrap();

    let err = service
        .update_email(created.id, "not-an-email".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let fetched = service.get_user(created.id).await.unwrap();
    assert_eq!(fetched.email, "a@x.com");
    assert_eq!(fetched.updated_at, created.updated_at);
}

#[tokio::test]
async fn update_email_bumps_updated_at() {
    let service = service();
    let created = service.create_user(create_data("a@x.com")).await.unwrap();

    let updated = service
        .update_email(created.id, "new@x.com".to_string())
        .await
        .unwrap();

    assert_eq!(updated.email, "new@x.com");
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn partial_update_keeps_unset_fields() {
    let service = service();
    let created = service.create_user(create_data("a@x.com")).await.unwrap();

    let updated = service
        .update_user(
            created.id,
            UpdateUser {
                last_name: Some("Updated".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.last_name, "Updated");
    assert_eq!(updated.first_name, "Test");
    assert_eq!(updated.email, "a@x.com");
}

#[tokio::test]
async fn update_with_empty_name_is_rejected() {
    let service = service();
    let created = service.create_user(create_data("a@x.com")).await.unwrap();

    let err = service
        .update_user(
            created.id,
            UpdateUser {
                first_name: Some("   ".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn concurrent_creates_with_distinct_emails_all_succeed() {
    let store = Arc::new(RecordStore::new());
    let service: Arc<dyn UserService> = Arc::new(UserManager::new(Arc::new(
        InMemoryUserRepository::new(store),
    )));

    let n = 32usize;
    let handles: Vec<_> = (0..n)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_user(create_data(&format!("user{}@x.com", i)))
                    .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let user = handle.await.unwrap().unwrap();
        ids.insert(user.id);
    }

    assert_eq!(ids.len(), n);
    assert_eq!(service.list_users().await.unwrap().len(), n);
}

#[tokio::test]
async fn concurrent_creates_with_the_same_email_admit_exactly_one() {
    let store = Arc::new(RecordStore::new());
    let service: Arc<dyn UserService> = Arc::new(UserManager::new(Arc::new(
        InMemoryUserRepository::new(store),
    )));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.create_user(create_data("dup@x.com")).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(service.count_users().await.unwrap(), 1);
}
