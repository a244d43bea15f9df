//! Integration tests for discount code lookup and redemption.

use brnno_db::models::business::CreateBusiness;
use brnno_db::models::discount_code::CreateDiscountCode;
use brnno_db::repositories::{BusinessRepo, DiscountCodeRepo};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_business(pool: &PgPool, subdomain: &str) -> i64 {
    BusinessRepo::create(
        pool,
        &CreateBusiness {
            owner_user_id: Uuid::new_v4(),
            name: "Shine Co".into(),
            subdomain: subdomain.into(),
            plan: "pro".into(),
            billing_period: "monthly".into(),
            team_size: 2,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            stripe_checkout_session_id: None,
            signup_lead_id: None,
        },
    )
    .await
    .unwrap()
    .unwrap()
    .id
}

fn new_code(business_id: i64, code: &str, usage_limit: Option<i32>) -> CreateDiscountCode {
    CreateDiscountCode {
        business_id,
        code: code.into(),
        description: Some("Spring promo".into()),
        discount_percent: 10,
        usage_limit,
        valid_until: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn find_active_is_scoped_to_business(pool: PgPool) {
    let a = seed_business(&pool, "shine-a").await;
    let b = seed_business(&pool, "shine-b").await;
    DiscountCodeRepo::create(&pool, &new_code(a, "SPRING10", None))
        .await
        .unwrap();

    assert!(DiscountCodeRepo::find_active(&pool, a, "SPRING10").await.unwrap().is_some());
    assert!(DiscountCodeRepo::find_active(&pool, b, "SPRING10").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn inactive_code_is_not_found(pool: PgPool) {
    let a = seed_business(&pool, "shine").await;
    let code = DiscountCodeRepo::create(&pool, &new_code(a, "OLD", None))
        .await
        .unwrap();
    assert!(DiscountCodeRepo::deactivate(&pool, code.id).await.unwrap());
    assert!(DiscountCodeRepo::find_active(&pool, a, "OLD").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn redeem_stops_at_usage_limit(pool: PgPool) {
    let a = seed_business(&pool, "shine").await;
    DiscountCodeRepo::create(&pool, &new_code(a, "TWICE", Some(2)))
        .await
        .unwrap();
    let now = Utc::now();

    let first = DiscountCodeRepo::redeem(&pool, a, "TWICE", now).await.unwrap().unwrap();
    assert_eq!(first.usage_count, 1);
    let second = DiscountCodeRepo::redeem(&pool, a, "TWICE", now).await.unwrap().unwrap();
    assert_eq!(second.usage_count, 2);
    assert!(DiscountCodeRepo::redeem(&pool, a, "TWICE", now).await.unwrap().is_none());

    let stored = DiscountCodeRepo::find_active(&pool, a, "TWICE").await.unwrap().unwrap();
    assert_eq!(stored.usage_count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn redeem_rejects_expired_code(pool: PgPool) {
    let a = seed_business(&pool, "shine").await;
    let mut input = new_code(a, "LATE", None);
    input.valid_until = Some(Utc::now() - Duration::hours(1));
    DiscountCodeRepo::create(&pool, &input).await.unwrap();

    assert!(DiscountCodeRepo::redeem(&pool, a, "LATE", Utc::now()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_redeems_never_exceed_limit(pool: PgPool) {
    let a = seed_business(&pool, "shine").await;
    DiscountCodeRepo::create(&pool, &new_code(a, "LAST", Some(1)))
        .await
        .unwrap();
    let now = Utc::now();

    let (r1, r2) = tokio::join!(
        DiscountCodeRepo::redeem(&pool, a, "LAST", now),
        DiscountCodeRepo::redeem(&pool, a, "LAST", now),
    );
    let successes = [r1.unwrap(), r2.unwrap()]
        .iter()
        .filter(|r| r.is_some())
        .count();
    assert_eq!(successes, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_code_per_business_conflicts(pool: PgPool) {
    let a = seed_business(&pool, "shine").await;
    DiscountCodeRepo::create(&pool, &new_code(a, "DUP", None))
        .await
        .unwrap();
    let err = DiscountCodeRepo::create(&pool, &new_code(a, "DUP", None))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.constraint(), Some("uq_discount_codes_business_code"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}
