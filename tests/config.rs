use std::env;

use store_builder_api::config::AppConfig;

// Single test in this binary: it mutates process-wide environment variables.
#[test]
fn numeric_settings_are_validated() {
    unsafe {
        env::set_var("DATABASE_URL", "postgres://localhost/store_builder");
        env::set_var("JWT_SECRET", "secret");
        env::remove_var("STRIPE_SECRET_KEY");
        env::set_var("APP_PORT", "8081");
    }
    let config = AppConfig::from_env().expect("valid config");
    assert_eq!(config.port, 8081);
    assert!(config.stripe.is_none());

    unsafe { env::remove_var("APP_PORT") };
    assert_eq!(AppConfig::from_env().expect("default port").port, 3000);

    unsafe { env::set_var("APP_PORT", "not-a-port") };
    let err = AppConfig::from_env().expect_err("invalid port");
    assert!(err.to_string().contains("APP_PORT"));

    unsafe {
        env::set_var("APP_PORT", "3000");
        env::set_var("TAX_RATE", "eight percent");
    }
    assert!(AppConfig::from_env().is_err());
    unsafe { env::remove_var("TAX_RATE") };
}
