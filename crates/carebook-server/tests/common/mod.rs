#![allow(dead_code)]

use carebook_auth::password::hash_password;
use carebook_server::{AppConfig, AppState, build_router, build_state};
use carebook_storage::{NewUser, Role, User};
use serde_json::{Value, json};

pub const ADMIN_EMAIL: &str = "admin@carebook.test";
pub const ADMIN_PASSWORD: &str = "admin-pass";

pub struct TestApp {
    pub base_url: String,
    pub state: AppState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = "integration-test-secret".into();
    cfg
}

/// Serves the router on an ephemeral port with the in-memory backend.
pub async fn spawn_app(cfg: AppConfig) -> TestApp {
    let state = build_state(&cfg).await.expect("state");
    spawn_with_state(&cfg, state).await
}

/// Serves the router around a caller-assembled state.
pub async fn spawn_with_state(cfg: &AppConfig, state: AppState) -> TestApp {
    let app = build_router(cfg, state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    TestApp {
        base_url: format!("http://{addr}"),
        state,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client")
}

pub fn person(email: &str, role: Role) -> NewUser {
    NewUser {
        first_name: "Test".into(),
        last_name: "Person".into(),
        email: email.into(),
        phone: "5550100".into(),
        gender: "Female".into(),
        dob: "1990-01-01".into(),
        adhar_no: "123412341234".into(),
        role,
        doctor_department: None,
        doc_avatar: None,
        password_hash: String::new(),
    }
}

/// Stores an admin account directly; there is no public route that creates
/// the first admin.
pub async fn seed_admin(app: &TestApp) -> User {
    let mut admin = person(ADMIN_EMAIL, Role::Admin);
    admin.password_hash = hash_password(ADMIN_PASSWORD).expect("hash");
    app.state.users.create(admin).await.expect("seed admin")
}

/// Client holding an `adminToken` cookie.
pub async fn admin_client(app: &TestApp) -> reqwest::Client {
    seed_admin(app).await;
    let client = client();
    let resp = client
        .post(app.url("/user/login"))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD,
            "confirmPassword": ADMIN_PASSWORD,
            "role": "Admin"
        }))
        .send()
        .await
        .expect("admin login");
    assert_eq!(resp.status(), 200);
    client
}

pub fn registration(email: &str) -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": email,
        "phone": "5550199",
        "password": "patient-pass",
        "gender": "Female",
        "dob": "1815-12-10",
        "adharNo": "111122223333"
    })
}

pub async fn body(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let json = resp.json::<Value>().await.expect("json body");
    (status, json)
}
