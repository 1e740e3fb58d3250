mod common;

use carebook_storage::Role;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_register_duplicate_and_login() {
    let app = spawn_app(test_config()).await;
    let client = client();

    let resp = client
        .post(app.url("/user/patient/register"))
        .json(&registration("a@x.com"))
        .send()
        .await
        .unwrap();
    assert!(resp.headers()["set-cookie"].to_str().unwrap().starts_with("patientToken="));
    let (status, json) = body(resp).await;
    assert_eq!(status, 200);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "User Registered!");
    assert_eq!(json["user"]["role"], "Patient");
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(json["user"].get("password").is_none());

    let (status, json) = body(
        client
            .post(app.url("/user/patient/register"))
            .json(&registration("a@x.com"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "User Already Registered!");

    let login = |role: &str| {
        json!({
            "email": "a@x.com",
            "password": "patient-pass",
            "confirmPassword": "patient-pass",
            "role": role
        })
    };

    let fresh = common::client();
    let resp = fresh.post(app.url("/user/login")).json(&login("Patient")).send().await.unwrap();
    assert!(resp.headers()["set-cookie"].to_str().unwrap().starts_with("patientToken="));
    let (status, json) = body(resp).await;
    assert_eq!(status, 200);
    assert_eq!(json["message"], "User Login Successfully!");

    let (status, json) = body(fresh.get(app.url("/user/me")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(json["user"]["email"], "a@x.com");

    let (status, json) = body(
        common::client()
            .post(app.url("/user/login"))
            .json(&login("Admin"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "User With This Role Not found!");

    let (status, json) = body(
        common::client()
            .post(app.url("/user/login"))
            .json(&login("Superuser"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "User With This Role Not found!");
}

#[tokio::test]
async fn test_registration_requires_every_field() {
    let app = spawn_app(test_config()).await;
    let mut incomplete = registration("b@x.com");
    incomplete["adharNo"] = json!("");

    let (status, json) = body(
        client()
            .post(app.url("/user/patient/register"))
            .json(&incomplete)
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Please Fill Full Form!");
}

#[tokio::test]
async fn test_login_failures() {
    let app = spawn_app(test_config()).await;
    client()
        .post(app.url("/user/patient/register"))
        .json(&registration("c@x.com"))
        .send()
        .await
        .unwrap();

    let cases = [
        (json!({"email": "c@x.com", "password": "patient-pass", "role": "Patient"}), "Please Provide All Details!"),
        (
            json!({"email": "c@x.com", "password": "patient-pass", "confirmPassword": "other", "role": "Patient"}),
            "Password and Confirm Password Do Not Match !",
        ),
        (
            json!({"email": "nobody@x.com", "password": "patient-pass", "confirmPassword": "patient-pass", "role": "Patient"}),
            "Invalid Password or Email!",
        ),
        (
            json!({"email": "c@x.com", "password": "wrong", "confirmPassword": "wrong", "role": "Patient"}),
            "Invalid Password or Email!",
        ),
    ];

    for (payload, expected) in cases {
        let resp = client().post(app.url("/user/login")).json(&payload).send().await.unwrap();
        assert!(resp.headers().get("set-cookie").is_none());
        let (status, json) = body(resp).await;
        assert_eq!(status, 400, "{payload}");
        assert_eq!(json["message"], expected, "{payload}");
    }
}

#[tokio::test]
async fn test_mismatched_confirmation_fails_even_with_correct_password() {
    let app = spawn_app(test_config()).await;
    client()
        .post(app.url("/user/patient/register"))
        .json(&registration("d@x.com"))
        .send()
        .await
        .unwrap();

    let (status, json) = body(
        client()
            .post(app.url("/user/login"))
            .json(&json!({
                "email": "d@x.com",
                "password": "patient-pass",
                "confirmPassword": "patient-pass-typo",
                "role": "Patient"
            }))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Password and Confirm Password Do Not Match !");
}

#[tokio::test]
async fn test_session_guards() {
    let app = spawn_app(test_config()).await;
    let patient = client();
    patient
        .post(app.url("/user/patient/register"))
        .json(&registration("e@x.com"))
        .send()
        .await
        .unwrap();

    let (status, json) = body(client().get(app.url("/user/me")).send().await.unwrap()).await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "User Not Authenticated!");

    let (status, json) = body(client().get(app.url("/message/getall")).send().await.unwrap()).await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Admin Not Authenticated!");

    let (status, json) = body(patient.get(app.url("/user/patient/me")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(json["user"]["email"], "e@x.com");

    let (status, _) = body(patient.get(app.url("/user/admin/me")).send().await.unwrap()).await;
    assert_eq!(status, 400);

    let admin = admin_client(&app).await;
    let (status, json) = body(admin.get(app.url("/user/admin/me")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(json["user"]["role"], "Admin");

    // An admin token presented as the patient cookie fails the role check.
    let admin_user = app.state.users.find_by_email(ADMIN_EMAIL).await.unwrap().unwrap();
    let token = app.state.auth.jwt_service.issue(admin_user.id).unwrap();
    let (status, json) = body(
        reqwest::Client::new()
            .get(app.url("/user/patient/me"))
            .header("cookie", format!("patientToken={token}"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(json["message"], "Admin not authorized for this resource!");
}

#[tokio::test]
async fn test_stale_admin_cookie_does_not_hide_patient_session() {
    let app = spawn_app(test_config()).await;
    let resp = client()
        .post(app.url("/user/patient/register"))
        .json(&registration("stale@x.com"))
        .send()
        .await
        .unwrap();
    let (_, json) = body(resp).await;
    let patient_token = json["token"].as_str().unwrap().to_string();

    let (status, json) = body(
        reqwest::Client::new()
            .get(app.url("/user/me"))
            .header(
                "cookie",
                format!("adminToken=stale.garbage.token; patientToken={patient_token}"),
            )
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200, "{json}");
    assert_eq!(json["user"]["email"], "stale@x.com");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = spawn_app(test_config()).await;
    let patient = client();
    patient
        .post(app.url("/user/patient/register"))
        .json(&registration("f@x.com"))
        .send()
        .await
        .unwrap();

    let resp = patient.get(app.url("/user/patient/logout")).send().await.unwrap();
    let set_cookie = resp.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("patientToken=;"), "{set_cookie}");
    assert!(set_cookie.contains("Max-Age=0"), "{set_cookie}");
    let (status, json) = body(resp).await;
    assert_eq!(status, 201);
    assert_eq!(json["message"], "Patient Logged Out Successfully!");

    let (status, _) = body(patient.get(app.url("/user/me")).send().await.unwrap()).await;
    assert_eq!(status, 400);

    // Works without any session.
    let (status, json) = body(client().get(app.url("/user/admin/logout")).send().await.unwrap()).await;
    assert_eq!(status, 201);
    assert_eq!(json["message"], "Admin logged out Successfully!");
}

#[tokio::test]
async fn test_add_new_admin() {
    let app = spawn_app(test_config()).await;
    let admin = admin_client(&app).await;

    let (status, json) = body(
        admin
            .post(app.url("/user/admin/addnew"))
            .json(&registration("second-admin@x.com"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["message"], "New Admin Registered!");
    assert_eq!(json["admin"]["role"], "Admin");
    assert!(json.get("token").is_none());

    // Uniqueness spans roles; the message names the existing account's role.
    let mut patient = person("taken@x.com", Role::Patient);
    patient.password_hash = "unused".into();
    app.state.users.create(patient).await.unwrap();

    let (status, json) = body(
        admin
            .post(app.url("/user/admin/addnew"))
            .json(&registration("taken@x.com"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Patient Admin With This Email Already Exists!");

    let (status, json) = body(
        admin
            .post(app.url("/user/admin/addnew"))
            .json(&json!({"email": "partial@x.com"}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Please fill the full form!");
}

#[tokio::test]
async fn test_messages() {
    let app = spawn_app(test_config()).await;

    let (status, json) = body(
        client()
            .post(app.url("/message/send"))
            .json(&json!({
                "firstName": "Lisa",
                "lastName": "Cuddy",
                "email": "lisa@x.com",
                "phone": "5550111",
                "message": "Please call me back"
            }))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["message"], "Message Sent!");

    let (status, json) = body(
        client()
            .post(app.url("/message/send"))
            .json(&json!({"firstName": "Lisa"}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Please Fill Full Form!");

    let admin = admin_client(&app).await;
    let (status, json) = body(admin.get(app.url("/message/getall")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["message"], "Please call me back");
}

#[tokio::test]
async fn test_appointment_lifecycle() {
    let app = spawn_app(test_config()).await;

    let mut doctor = person("house@x.com", Role::Doctor);
    doctor.first_name = "Gregory".into();
    doctor.last_name = "House".into();
    doctor.doctor_department = Some("Diagnostics".into());
    let doctor = app.state.users.create(doctor).await.unwrap();

    let patient = client();
    patient
        .post(app.url("/user/patient/register"))
        .json(&registration("g@x.com"))
        .send()
        .await
        .unwrap();

    let booking = |first: &str| {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "g@x.com",
            "phone": "5550199",
            "adharNo": "111122223333",
            "dob": "1815-12-10",
            "gender": "Female",
            "appointment_date": "2026-11-02",
            "department": "Diagnostics",
            "doctor_firstName": first,
            "doctor_lastName": "House",
            "address": "221B Baker Street"
        })
    };

    let (status, json) = body(
        patient
            .post(app.url("/appointment/post"))
            .json(&booking("Gregory"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["message"], "Appointment Send!");
    assert_eq!(json["appointment"]["status"], "Pending");
    assert_eq!(json["appointment"]["hasVisited"], false);
    assert_eq!(json["appointment"]["doctorId"], doctor.id.to_string());
    let appointment_id = json["appointment"]["_id"].as_str().unwrap().to_string();

    let (status, json) = body(
        patient
            .post(app.url("/appointment/post"))
            .json(&booking("Wilson"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(json["message"], "Doctor not found!");

    // A second doctor with the same name makes the booking ambiguous.
    let mut twin = person("house2@x.com", Role::Doctor);
    twin.first_name = "Gregory".into();
    twin.last_name = "House".into();
    twin.doctor_department = Some("Diagnostics".into());
    app.state.users.create(twin).await.unwrap();

    let (status, json) = body(
        patient
            .post(app.url("/appointment/post"))
            .json(&booking("Gregory"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["message"], "Doctors Conflict! Please Contact Through Email Or Phone!");

    let admin = admin_client(&app).await;
    let (status, json) = body(admin.get(app.url("/appointment/getall")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(json["appointments"].as_array().unwrap().len(), 1);

    let update_url = app.url(&format!("/appointment/update/{appointment_id}"));
    let (status, json) = body(
        admin
            .put(&update_url)
            .json(&json!({"status": "Accepted"}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["message"], "Appointment Status Updated!");
    assert_eq!(json["appointment"]["status"], "Accepted");

    let (status, _) = body(
        admin
            .put(&update_url)
            .json(&json!({"status": "Maybe"}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);

    let delete_url = app.url(&format!("/appointment/delete/{appointment_id}"));
    let (status, json) = body(admin.delete(&delete_url).send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(json["message"], "Appointment Deleted!");

    let (status, json) = body(admin.delete(&delete_url).send().await.unwrap()).await;
    assert_eq!(status, 404);
    assert_eq!(json["message"], "Appointment not found!");
}

#[tokio::test]
async fn test_health_route() {
    let app = spawn_app(test_config()).await;
    let resp = client()
        .get(format!("{}/healthz", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().contains_key("x-request-id"));
    let (_, json) = body(resp).await;
    assert_eq!(json["status"], "ok");
}
