use super::test_helpers;

#[tokio::test]
async fn app_state_clone_shares_config() {
    let state = test_helpers::test_app_state();
    let cloned = state.clone();
    assert_eq!(cloned.auth.issuer, state.auth.issuer);
    assert_eq!(cloned.auth.token_lifetime_hours, 24);
}

#[test]
fn test_auth_config_has_nonempty_key() {
    let cfg = test_helpers::test_auth_config();
    assert!(!cfg.signing_key.is_empty());
    assert_eq!(cfg.audience, "cupcake-shop-clients");
}
