use membership_api::domain::entities::{NewCompany, NewUser, UserPatch};
use membership_api::domain::repositories::{CompanyRepository, UserRepository};
use membership_api::infrastructure::persistence::{PgCompanyRepository, PgUserRepository};
use sqlx::PgPool;
use std::sync::Arc;

fn repos(pool: PgPool) -> (PgUserRepository, PgCompanyRepository) {
    let pool = Arc::new(pool);
    (
        PgUserRepository::new(pool.clone()),
        PgCompanyRepository::new(pool),
    )
}

async fn company(repo: &PgCompanyRepository, name: &str) -> i64 {
    repo.create(NewCompany {
        name: name.to_string(),
        user_ids: None,
    })
    .await
    .unwrap()
    .id
}

async fn membership_pairs(pool: &PgPool) -> Vec<(i64, i64)> {
    sqlx::query_as("SELECT user_id, company_id FROM user_company ORDER BY user_id, company_id")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[sqlx::test]
async fn test_create_user(pool: PgPool) {
    let (users, _) = repos(pool);

    let user = users
        .create(NewUser {
            name: "Ada".to_string(),
            company_ids: None,
        })
        .await
        .unwrap();

    assert_eq!(user.name, "Ada");
    assert!(!user.is_deleted());
    assert_eq!(users.count().await.unwrap(), 1);
}

#[sqlx::test]
async fn test_create_user_with_companies(pool: PgPool) {
    let (users, companies) = repos(pool.clone());
    let acme = company(&companies, "Acme").await;
    let globex = company(&companies, "Globex").await;

    let user = users
        .create(NewUser {
            name: "Ada".to_string(),
            company_ids: Some(vec![acme, globex]),
        })
        .await
        .unwrap();

    assert_eq!(
        membership_pairs(&pool).await,
        vec![(user.id, acme), (user.id, globex)]
    );

    let related = users.companies_of(&[user.id]).await.unwrap();
    let names: Vec<&str> = related.iter().map(|(_, c)| c.name.as_str()).collect();
    assert_eq!(names, vec!["Acme", "Globex"]);
}

#[sqlx::test]
async fn test_update_without_companies_keeps_memberships(pool: PgPool) {
    let (users, companies) = repos(pool.clone());
    let acme = company(&companies, "Acme").await;
    let user = users
        .create(NewUser {
            name: "Ada".to_string(),
            company_ids: Some(vec![acme]),
        })
        .await
        .unwrap();

    let updated = users
        .update(
            user.id,
            UserPatch {
                name: Some("Ada Lovelace".to_string()),
                company_ids: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(membership_pairs(&pool).await, vec![(user.id, acme)]);
}

#[sqlx::test]
async fn test_update_missing_user(pool: PgPool) {
    let (users, _) = repos(pool);

    let result = users.update(404, UserPatch::default()).await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
async fn test_sync_companies_is_set_replacement(pool: PgPool) {
    let (users, companies) = repos(pool.clone());
    let a = company(&companies, "A").await;
    let b = company(&companies, "B").await;
    let c = company(&companies, "C").await;
    let user = users
        .create(NewUser {
            name: "Ada".to_string(),
            company_ids: Some(vec![a, b]),
        })
        .await
        .unwrap();

    assert!(users.sync_companies(user.id, &[b, c]).await.unwrap());
    assert_eq!(
        membership_pairs(&pool).await,
        vec![(user.id, b), (user.id, c)]
    );

    assert!(users.sync_companies(user.id, &[]).await.unwrap());
    assert!(membership_pairs(&pool).await.is_empty());
}

#[sqlx::test]
async fn test_sync_companies_on_missing_user(pool: PgPool) {
    let (users, _) = repos(pool);

    assert!(!users.sync_companies(12, &[]).await.unwrap());
}

#[sqlx::test]
async fn test_soft_delete_and_restore(pool: PgPool) {
    let (users, companies) = repos(pool.clone());
    let acme = company(&companies, "Acme").await;
    let user = users
        .create(NewUser {
            name: "Ada".to_string(),
            company_ids: Some(vec![acme]),
        })
        .await
        .unwrap();

    let deleted = users.soft_delete(user.id).await.unwrap().unwrap();
    assert!(deleted.is_deleted());
    assert_eq!(deleted.name, "Ada");

    assert!(users.find_by_id(user.id).await.unwrap().is_none());
    assert!(users.soft_delete(user.id).await.unwrap().is_none());
    assert!(users.existing_ids(&[user.id]).await.unwrap().is_empty());
    assert_eq!(membership_pairs(&pool).await, vec![(user.id, acme)]);

    let restored = users.restore(user.id).await.unwrap().unwrap();
    assert!(!restored.is_deleted());
    assert!(users.restore(user.id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_list_orders_by_id_and_skips_deleted(pool: PgPool) {
    let (users, _) = repos(pool);
    let mut ids = Vec::new();
    for name in ["a", "b", "c", "d"] {
        let user = users
            .create(NewUser {
                name: name.to_string(),
                company_ids: None,
            })
            .await
            .unwrap();
        ids.push(user.id);
    }
    users.soft_delete(ids[1]).await.unwrap();

    let page = users.list(0, 2).await.unwrap();
    let names: Vec<&str> = page.iter().map(|u| u.name.as_str()).collect();

    assert_eq!(names, vec!["a", "c"]);
    assert_eq!(users.count().await.unwrap(), 3);
}

#[sqlx::test]
async fn test_companies_of_hides_deleted_companies(pool: PgPool) {
    let (users, companies) = repos(pool);
    let acme = company(&companies, "Acme").await;
    let globex = company(&companies, "Globex").await;
    let user = users
        .create(NewUser {
            name: "Ada".to_string(),
            company_ids: Some(vec![acme, globex]),
        })
        .await
        .unwrap();

    companies.soft_delete(acme).await.unwrap();

    let related = users.companies_of(&[user.id]).await.unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].1.id, globex);
}
