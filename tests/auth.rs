use serde_json::json;
use store_builder_api::{
    error::AppError,
    middleware::auth::{AuthUser, Role, decode_token, ensure_admin, ensure_owner_or_admin, ensure_role},
    models::mask_credentials,
    services::{
        api_key_service::validate_service,
        auth_service::{hash_password, issue_token, verify_password},
        store_service::{merge_settings, validate_subdomain},
    },
};
use uuid::Uuid;

const SECRET: &str = "test-secret";

fn user(role: Role) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role,
    }
}

#[test]
fn role_hierarchy_is_ordered() {
    assert!(Role::SuperAdmin.at_least(Role::Admin));
    assert!(Role::Admin.at_least(Role::User));
    assert!(!Role::User.at_least(Role::Admin));
    assert_eq!(Role::parse("super_admin"), Some(Role::SuperAdmin));
    assert_eq!(Role::parse("root"), None);
    assert_eq!(Role::from_stored("root"), Role::User);
}

#[test]
fn role_guards() {
    assert!(ensure_admin(&user(Role::Admin)).is_ok());
    assert!(matches!(ensure_admin(&user(Role::User)), Err(AppError::Forbidden)));
    assert!(matches!(
        ensure_role(&user(Role::Admin), Role::SuperAdmin),
        Err(AppError::Forbidden)
    ));

    let owner = user(Role::User);
    assert!(ensure_owner_or_admin(&owner, owner.user_id).is_ok());
    assert!(ensure_owner_or_admin(&user(Role::Admin), owner.user_id).is_ok());
    assert!(matches!(
        ensure_owner_or_admin(&user(Role::User), owner.user_id),
        Err(AppError::Forbidden)
    ));
}

#[test]
fn issued_tokens_decode_to_the_same_user() {
    let user_id = Uuid::new_v4();
    let token = issue_token(user_id, Role::Admin, SECRET, 1).expect("token");

    let decoded = decode_token(&token, SECRET).expect("decode");
    assert_eq!(decoded.user_id, user_id);
    assert_eq!(decoded.role, Role::Admin);

    assert!(matches!(
        decode_token(&token, "other-secret"),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn expired_tokens_are_rejected() {
    let token = issue_token(Uuid::new_v4(), Role::User, SECRET, -2).expect("token");
    assert!(matches!(decode_token(&token, SECRET), Err(AppError::Unauthorized(_))));
}

#[test]
fn password_hashes_verify() {
    let hash = hash_password("correct horse").expect("hash");
    assert_ne!(hash, "correct horse");
    assert!(verify_password("correct horse", &hash).expect("verify"));
    assert!(!verify_password("battery staple", &hash).expect("verify"));
}

#[test]
fn subdomains_are_normalised_and_validated() {
    assert_eq!(validate_subdomain("  My-Shop1 ").expect("valid"), "my-shop1");
    let too_long = "a".repeat(64);
    for bad in ["ab", "-shop", "shop-", "my_shop", "shop.example", too_long.as_str()] {
        assert!(validate_subdomain(bad).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn service_names_are_validated() {
    assert_eq!(validate_service("Stripe").expect("valid"), "stripe");
    assert!(validate_service("open_ai-2").is_ok());
    assert!(validate_service("").is_err());
    assert!(validate_service("bad name").is_err());
    assert!(validate_service(&"x".repeat(65)).is_err());
}

#[test]
fn settings_merge_and_delete_keys() {
    let current = json!({ "tax_rate": "0.1", "logo": "a.png" });
    let merged = merge_settings(&current, json!({ "logo": null, "banner": "b.png" })).expect("merge");
    assert_eq!(merged, json!({ "tax_rate": "0.1", "banner": "b.png" }));
    assert!(merge_settings(&current, json!([1, 2])).is_err());
}

#[test]
fn credentials_are_masked() {
    let masked = mask_credentials(&json!({
        "secret_key": "sk_live_abcdef1234",
        "pin": "12",
        "nested": { "token": "tok_9876" },
        "port": 44321
    }));
    assert_eq!(masked["secret_key"], "****1234");
    assert_eq!(masked["pin"], "****");
    assert_eq!(masked["nested"]["token"], "****9876");
    assert_eq!(masked["port"], "****4321");
}
