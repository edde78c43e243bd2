use super::*;
use rust_decimal_macros::dec;

fn dough(price: Decimal, available: bool) -> DoughRow {
    DoughRow {
        id: Uuid::new_v4(),
        name: "Chocolate".into(),
        description: Some("Dark cocoa base".into()),
        price,
        is_available: available,
        created_at: OffsetDateTime::now_utc(),
    }
}

#[test]
fn dough_row_serializes_price_and_availability() {
    let row = dough(dec!(2.50), true);
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["name"], "Chocolate");
    assert_eq!(json["price"], serde_json::json!("2.50"));
    assert_eq!(json["is_available"], true);
}

#[test]
fn frosting_row_carries_optional_color() {
    let row = FrostingRow {
        id: Uuid::new_v4(),
        name: "Vanilla Swirl".into(),
        color: Some("#FFF8DC".into()),
        description: None,
        price: dec!(1.50),
        is_available: true,
        created_at: OffsetDateTime::now_utc(),
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["color"], "#FFF8DC");
    assert!(json["description"].is_null());
}

#[test]
fn filling_row_serde_round_trip_keeps_decimal_exact() {
    let row = FillingRow {
        id: Uuid::new_v4(),
        name: "Raspberry".into(),
        description: None,
        price: dec!(0.50),
        is_available: false,
        created_at: OffsetDateTime::now_utc(),
    };
    let json = serde_json::to_string(&row).unwrap();
    assert!(json.contains("\"0.50\""));
}

// =============================================================================
// live DB — soft-delete semantics
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    async fn live_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
        let pool = PgPoolOptions::new().connect(&url).await.expect("connect");
        sqlx::migrate!("src/db/migrations").run(&pool).await.expect("migrate");
        pool
    }

    async fn seed_dough(pool: &PgPool, name: &str, available: bool) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO dough_types (name, price, is_available) VALUES ($1, 2.00, $2) RETURNING id",
        )
        .bind(name)
        .bind(available)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn listings_exclude_unavailable_components() {
        let pool = live_pool().await;
        let name = format!("test-dough-{}", Uuid::new_v4());
        let id = seed_dough(&pool, &name, false).await;

        let listed = list_doughs(&pool).await.unwrap();
        assert!(listed.iter().all(|d| d.id != id));
    }

    #[tokio::test]
    async fn find_resolves_unavailable_component_by_id() {
        let pool = live_pool().await;
        let name = format!("test-dough-{}", Uuid::new_v4());
        let id = seed_dough(&pool, &name, false).await;

        let found = find_dough(&pool, id).await.unwrap().expect("must resolve by id");
        assert_eq!(found.name, name);
        assert!(!found.is_available);
    }
}
