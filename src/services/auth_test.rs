use super::*;

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases() {
    assert_eq!(normalize_email("Alice@Example.COM").as_deref(), Some("alice@example.com"));
}

#[test]
fn normalize_email_trims_whitespace() {
    assert_eq!(normalize_email("  bob@example.com  ").as_deref(), Some("bob@example.com"));
}

#[test]
fn normalize_email_rejects_missing_at() {
    assert_eq!(normalize_email("not-an-email"), None);
}

#[test]
fn normalize_email_rejects_empty_local_part() {
    assert_eq!(normalize_email("@example.com"), None);
}

#[test]
fn normalize_email_rejects_empty_domain() {
    assert_eq!(normalize_email("alice@"), None);
}

#[test]
fn normalize_email_rejects_double_at() {
    assert_eq!(normalize_email("a@b@c"), None);
}

#[test]
fn normalize_email_rejects_empty() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("   "), None);
}

// =============================================================================
// password hashing
// =============================================================================

#[test]
fn hash_then_verify_round_trip() {
    let hash = hash_password("correct horse battery").unwrap();
    assert!(verify_password("correct horse battery", &hash));
}

#[test]
fn wrong_password_fails_verification() {
    let hash = hash_password("correct horse battery").unwrap();
    assert!(!verify_password("wrong password", &hash));
}

#[test]
fn hash_is_not_the_plaintext() {
    let hash = hash_password("hunter22").unwrap();
    assert_ne!(hash, "hunter22");
    assert!(!hash.contains("hunter22"));
}

#[test]
fn hash_is_phc_format_argon2() {
    let hash = hash_password("some password").unwrap();
    assert!(hash.starts_with("$argon2"));
}

#[test]
fn same_password_hashes_differ_by_salt() {
    let a = hash_password("repeat me").unwrap();
    let b = hash_password("repeat me").unwrap();
    assert_ne!(a, b);
    assert!(verify_password("repeat me", &a));
    assert!(verify_password("repeat me", &b));
}

#[test]
fn verify_against_malformed_hash_is_false() {
    assert!(!verify_password("anything", "not-a-phc-string"));
}

#[test]
fn dummy_hash_verifies_nothing_useful() {
    // The timing-equalizer hash must be a real argon2 hash that fails for
    // arbitrary user input.
    assert!(dummy_hash().starts_with("$argon2"));
    assert!(!verify_password("some user password", dummy_hash()));
}

// =============================================================================
// error surface
// =============================================================================

#[test]
fn invalid_credentials_message_does_not_name_the_field() {
    // The same message covers unknown email and wrong password.
    let err = AuthError::InvalidCredentials;
    assert_eq!(err.to_string(), "invalid email or password");
}

#[test]
fn email_taken_has_distinct_message() {
    assert_eq!(AuthError::EmailTaken.to_string(), "email already registered");
}

// =============================================================================
// live DB — registration and login round trips
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

    fn unique_email(tag: &str) -> String {
        format!("{tag}-{}@example.com", uuid::Uuid::new_v4())
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let pool = live_pool().await;
        let email = unique_email("roundtrip");
        let req = RegisterRequest {
            name: "Alice".into(),
            email: email.clone(),
            password: "secret-password".into(),
            phone: Some("555-0100".into()),
        };
        let user = register(&pool, &req).await.unwrap();
        assert_eq!(user.email, email);

        let logged_in = login(
            &pool,
            &LoginRequest { email, password: "secret-password".into() },
        )
        .await
        .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn login_with_wrong_password_and_unknown_email_give_same_error() {
        let pool = live_pool().await;
        let email = unique_email("enum-resist");
        let req = RegisterRequest {
            name: "Bob".into(),
            email: email.clone(),
            password: "secret-password".into(),
            phone: None,
        };
        register(&pool, &req).await.unwrap();

        let wrong_password = login(
            &pool,
            &LoginRequest { email, password: "not the password".into() },
        )
        .await
        .unwrap_err();
        let unknown_email = login(
            &pool,
            &LoginRequest { email: unique_email("nobody"), password: "whatever".into() },
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn duplicate_email_is_email_taken() {
        let pool = live_pool().await;
        let email = unique_email("dup");
        let req = RegisterRequest {
            name: "Carol".into(),
            email: email.clone(),
            password: "secret-password".into(),
            phone: None,
        };
        register(&pool, &req).await.unwrap();

        let second = RegisterRequest {
            name: "Imposter".into(),
            email,
            password: "other-password".into(),
            phone: None,
        };
        assert!(matches!(register(&pool, &second).await, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn duplicate_email_is_case_insensitive() {
        let pool = live_pool().await;
        let email = unique_email("case");
        register(
            &pool,
            &RegisterRequest {
                name: "Dana".into(),
                email: email.clone(),
                password: "secret-password".into(),
                phone: None,
            },
        )
        .await
        .unwrap();

        let shouted = RegisterRequest {
            name: "Dana Again".into(),
            email: email.to_ascii_uppercase(),
            password: "secret-password".into(),
            phone: None,
        };
        assert!(matches!(register(&pool, &shouted).await, Err(AuthError::EmailTaken)));
    }
}
