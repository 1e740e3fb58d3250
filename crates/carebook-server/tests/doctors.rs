mod common;

use std::sync::Arc;

use async_trait::async_trait;
use carebook_storage::{
    Avatar, DynUserStorage, NewUser, Role, StorageError, StorageResult, User, UserStorage,
};
use common::*;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn cloudinary() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": "carebook/avatars/house",
            "secure_url": "https://res.cloudinary.com/demo/image/upload/house.png"
        })))
        .mount(&server)
        .await;
    server
}

fn config_with_media(server: &MockServer) -> carebook_server::AppConfig {
    let mut cfg = test_config();
    cfg.media.cloud_name = "demo".into();
    cfg.media.api_key = "key123".into();
    cfg.media.api_secret = "secret456".into();
    cfg.media.base_url = server.uri();
    cfg
}

fn doctor_form(email: &str, mime: &str) -> Form {
    let avatar = Part::bytes(b"PNGDATA".to_vec())
        .file_name("house.png")
        .mime_str(mime)
        .unwrap();
    Form::new()
        .text("firstName", "Gregory")
        .text("lastName", "House")
        .text("email", email.to_string())
        .text("phone", "5550100")
        .text("password", "vicodin-pass")
        .text("gender", "Male")
        .text("dob", "1959-06-11")
        .text("adharNo", "123412341234")
        .text("doctorDepartment", "Diagnostics")
        .part("docAvatar", avatar)
}

#[tokio::test]
async fn test_admin_creates_and_lists_doctor() {
    let server = cloudinary().await;
    let app = spawn_app(config_with_media(&server)).await;
    let admin = admin_client(&app).await;

    let (status, json) = body(
        admin
            .post(app.url("/user/doctor/addnew"))
            .multipart(doctor_form("house@x.com", "image/png"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200, "{json}");
    assert_eq!(json["message"], "New Doctor Registered!");
    assert_eq!(json["doctor"]["role"], "Doctor");
    assert_eq!(json["doctor"]["doctorDepartment"], "Diagnostics");
    assert_eq!(json["doctor"]["docAvatar"]["public_id"], "carebook/avatars/house");

    let (status, json) = body(client().get(app.url("/user/doctors")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    let doctors = json["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["email"], "house@x.com");

    let (status, json) = body(
        admin
            .post(app.url("/user/doctor/addnew"))
            .multipart(doctor_form("house@x.com", "image/png"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Doctor already registered with this email!");
}

#[tokio::test]
async fn test_rejects_unsupported_format() {
    let server = cloudinary().await;
    let app = spawn_app(config_with_media(&server)).await;
    let admin = admin_client(&app).await;

    for mime in ["image/gif", "application/pdf"] {
        let (status, json) = body(
            admin
                .post(app.url("/user/doctor/addnew"))
                .multipart(doctor_form("gif@x.com", mime))
                .send()
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, 400, "{mime}");
        assert_eq!(json["message"], "File Format Not Supported!");
    }
    assert!(app.state.users.find_by_email("gif@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_requires_avatar_and_details() {
    let server = cloudinary().await;
    let app = spawn_app(config_with_media(&server)).await;
    let admin = admin_client(&app).await;

    let no_avatar = Form::new().text("firstName", "Gregory").text("email", "x@x.com");
    let (status, json) = body(
        admin
            .post(app.url("/user/doctor/addnew"))
            .multipart(no_avatar)
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Doctor Avatar Required!");

    let avatar = Part::bytes(b"PNGDATA".to_vec())
        .file_name("a.png")
        .mime_str("image/png")
        .unwrap();
    let partial = Form::new().text("firstName", "Gregory").part("docAvatar", avatar);
    let (status, json) = body(
        admin
            .post(app.url("/user/doctor/addnew"))
            .multipart(partial)
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Please Provide Full Details!");
}

#[tokio::test]
async fn test_upload_failure_creates_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "Service unavailable" }
        })))
        .mount(&server)
        .await;
    let app = spawn_app(config_with_media(&server)).await;
    let admin = admin_client(&app).await;

    let (status, json) = body(
        admin
            .post(app.url("/user/doctor/addnew"))
            .multipart(doctor_form("fail@x.com", "image/jpeg"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(json["message"], "Failed To Upload Doctor Avatar To Cloudinary");
    assert!(app.state.users.find_by_email("fail@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_patient_cannot_add_doctor() {
    let server = cloudinary().await;
    let app = spawn_app(config_with_media(&server)).await;
    let patient = client();
    patient
        .post(app.url("/user/patient/register"))
        .json(&registration("p@x.com"))
        .send()
        .await
        .unwrap();

    let (status, json) = body(
        patient
            .post(app.url("/user/doctor/addnew"))
            .multipart(doctor_form("house@x.com", "image/png"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Admin Not Authenticated!");
}

#[tokio::test]
async fn test_delete_survives_blob_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/destroy"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "boom" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = spawn_app(config_with_media(&server)).await;
    let admin = admin_client(&app).await;

    let mut doctor = person("house@x.com", Role::Doctor);
    doctor.doctor_department = Some("Diagnostics".into());
    doctor.doc_avatar = Some(Avatar {
        public_id: "carebook/avatars/house".into(),
        url: "https://res.cloudinary.com/demo/house.png".into(),
    });
    let doctor = app.state.users.create(doctor).await.unwrap();

    let (status, json) = body(
        admin
            .delete(app.url(&format!("/user/doctor/{}", doctor.id)))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["message"], "Doctor deleted successfully!");
    assert!(app.state.users.find_by_id(doctor.id).await.unwrap().is_none());

    // Email is free again.
    let mut again = person("house@x.com", Role::Doctor);
    again.doctor_department = Some("Diagnostics".into());
    assert!(app.state.users.create(again).await.is_ok());
}

#[tokio::test]
async fn test_delete_unknown_or_non_doctor_is_not_found() {
    let server = cloudinary().await;
    let app = spawn_app(config_with_media(&server)).await;
    let admin = admin_client(&app).await;
    let admin_user = app.state.users.find_by_email(ADMIN_EMAIL).await.unwrap().unwrap();

    let ids = [
        uuid::Uuid::new_v4().to_string(),
        admin_user.id.to_string(),
        "not-an-id".to_string(),
    ];
    for id in ids {
        let (status, json) = body(
            admin
                .delete(app.url(&format!("/user/doctor/{id}")))
                .send()
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, 404, "{id}");
        assert_eq!(json["message"], "Doctor not found!");
    }
    assert!(app.state.users.find_by_id(admin_user.id).await.unwrap().is_some());
}

/// Users store where one email loses a creation race: the lookup sees no
/// account but the insert hits the unique index.
struct RacingUsers {
    inner: DynUserStorage,
    email: &'static str,
}

#[async_trait]
impl UserStorage for RacingUsers {
    async fn find_by_id(&self, id: uuid::Uuid) -> StorageResult<Option<User>> {
        self.inner.find_by_id(id).await
    }
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        if email == self.email {
            return Ok(None);
        }
        self.inner.find_by_email(email).await
    }
    async fn create(&self, user: NewUser) -> StorageResult<User> {
        if user.email == self.email {
            return Err(StorageError::already_exists("users", self.email));
        }
        self.inner.create(user).await
    }
    async fn list_by_role(&self, role: Role) -> StorageResult<Vec<User>> {
        self.inner.list_by_role(role).await
    }
    async fn find_doctors_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
    ) -> StorageResult<Vec<User>> {
        self.inner.find_doctors_by_name(first_name, last_name, department).await
    }
    async fn delete(&self, id: uuid::Uuid) -> StorageResult<()> {
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn test_lost_creation_race_discards_uploaded_avatar() {
    let server = cloudinary().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/destroy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config_with_media(&server);
    let mut state = carebook_server::build_state(&cfg).await.unwrap();
    state.users = Arc::new(RacingUsers {
        inner: state.users.clone(),
        email: "race@x.com",
    });
    let app = spawn_with_state(&cfg, state).await;
    let admin = admin_client(&app).await;

    let (status, json) = body(
        admin
            .post(app.url("/user/doctor/addnew"))
            .multipart(doctor_form("race@x.com", "image/png"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Doctor already registered with this email!");

    server.verify().await;
}
