//! Test helpers and utilities

use topicgate_core::{ConnectionContext, Principal};

/// Initialize tracing for tests (call once at start of test)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("topicgate_core=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

/// Context for a certificate-authenticated user, the way brokers present
/// project members: `User:CN=<project>__<user>,O=hops`
pub fn member_context(identity_key: &str) -> ConnectionContext {
    ConnectionContext::for_principal(Principal::user(format!("CN={},O=hops", identity_key)))
        .with_listener("SSL")
}
