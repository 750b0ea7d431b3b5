// SPDX-License-Identifier: MIT

use jelloverse_api::config::Config;
use jelloverse_api::db::FirestoreDb;
use jelloverse_api::routes::create_router;
use jelloverse_api::services::{ClassifierClient, PointsLedger, StorageClient};
use jelloverse_api::AppState;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Build shared state around a database handle.
#[allow(dead_code)]
pub fn build_state(db: FirestoreDb) -> Arc<AppState> {
    let config = Config::test_default();
    let ledger = PointsLedger::new(db.clone());
    let classifier = ClassifierClient::new(config.openai_api_key.clone());
    let storage = StorageClient::new(
        config.storage_url.clone(),
        config.storage_bucket.clone(),
        config.storage_api_key.clone(),
    );

    Arc::new(AppState {
        config,
        db,
        ledger,
        classifier,
        storage,
    })
}

/// Create a test app with an offline mock database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = build_state(test_db_offline());
    (create_router(state.clone()), state)
}

/// Create a test JWT for a subject, signed with the given key.
#[allow(dead_code)]
pub fn create_test_jwt(subject: &str, signing_key: &[u8]) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: subject.to_string(),
        exp: now + 86400,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}
