//! Client behaviour against the in-process fake backend.

use api_client::{
    AdminCredentials, AppointmentRequest, ClientConfig, ClinicApi, Doctor, DoctorCredentials,
    Patient, PatientCredentials, Prescription, RecordRef, TokenBody,
};
use chrono::{NaiveDate, NaiveDateTime};
use test_backend::{doctor_token, patient_token, FakeBackend, Seed, ADMIN_TOKEN};

fn client_for(base_url: &str) -> ClinicApi {
    ClinicApi::new(ClientConfig::new(base_url, None).expect("config")).expect("client")
}

async fn start() -> (FakeBackend, ClinicApi) {
    let backend = FakeBackend::start(Seed::clinic()).await.expect("start backend");
    let api = client_for(&backend.base_url());
    (backend, api)
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("datetime")
}

#[tokio::test]
async fn lists_every_doctor_with_a_single_get() {
    let (backend, api) = start().await;

    let doctors = api.doctors().list().await;

    assert_eq!(doctors.len(), 3);
    assert_eq!(doctors[0].name, "Meredith Grey");
    assert_eq!(doctors[0].specialty, "Cardiology");
    assert_eq!(doctors[0].available_times, vec!["09:00 AM", "10:00 AM"]);
    assert!(doctors[0].password.is_none());
    assert_eq!(backend.requests(), vec!["GET /doctor".to_string()]);
}

#[tokio::test]
async fn blank_filter_matches_full_listing() {
    let (backend, api) = start().await;

    let filtered = api.doctors().filter("", "", "").await;
    let listed = api.doctors().list().await;

    assert_eq!(filtered, listed);
    assert_eq!(
        backend.requests()[0],
        "GET /doctor/filter/null/null/null".to_string()
    );
}

#[tokio::test]
async fn filter_narrows_by_time_and_specialty() {
    let (_backend, api) = start().await;

    let doctors = api.doctors().filter("", "AM", "Cardiology").await;

    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].name, "Meredith Grey");
}

#[tokio::test]
async fn filter_name_with_spaces_is_encoded_as_one_segment() {
    let (backend, api) = start().await;

    let doctors = api.doctors().filter("Derek Shep", "", "").await;

    assert_eq!(doctors.len(), 1);
    assert_eq!(
        backend.requests()[0],
        "GET /doctor/filter/Derek%20Shep/null/null".to_string()
    );
}

#[tokio::test]
async fn non_ok_listing_yields_empty_list() {
    let (backend, api) = start().await;
    backend.fail_doctor_listing(500);

    assert!(api.doctors().list().await.is_empty());
    assert!(api.doctors().filter("Grey", "", "").await.is_empty());
    assert!(api.doctors().try_list().await.expect("not an error").is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_fail_soft_but_visible_to_try_variants() {
    let base = test_backend::unreachable_base_url().await.expect("port");
    let api = client_for(&base);

    assert!(api.doctors().list().await.is_empty());
    let err = api.doctors().try_filter("", "", "").await.unwrap_err();
    assert!(err.is_transport());

    let result = api.doctors().remove(1, ADMIN_TOKEN).await;
    assert!(!result.success);
    assert_eq!(result.message, "Failed to delete doctor. Please try again.");
}

#[tokio::test]
async fn create_doctor_reports_server_message() {
    let (backend, api) = start().await;
    let doctor = Doctor {
        name: "Cristina Yang".into(),
        specialty: "Cardiology".into(),
        email: "yang@clinic.test".into(),
        password: Some("pw".into()),
        phone: "5551234567".into(),
        available_times: vec!["11:00 AM".into()],
        ..Default::default()
    };

    let created = api.doctors().create(&doctor, ADMIN_TOKEN).await;
    assert!(created.success);
    assert_eq!(created.message, "Doctor added to db");
    assert_eq!(backend.doctors().len(), 4);

    let duplicate = api.doctors().create(&doctor, ADMIN_TOKEN).await;
    assert!(!duplicate.success);
    assert_eq!(duplicate.message, "Doctor already exists");

    let unauthorised = api.doctors().create(&doctor, "nope").await;
    assert!(!unauthorised.success);
    assert_eq!(unauthorised.message, "Invalid token");
}

#[tokio::test]
async fn update_doctor_replaces_record() {
    let (backend, api) = start().await;
    let mut doctor = api.doctors().list().await.remove(2);
    doctor.available_times = vec!["04:00 PM".into()];

    let result = api.doctors().update(&doctor, ADMIN_TOKEN).await;

    assert!(result.success, "{}", result.message);
    assert_eq!(backend.doctors()[2].available_times, vec!["04:00 PM"]);
}

#[tokio::test]
async fn remove_doctor_success_and_failure() {
    let (backend, api) = start().await;

    let removed = api.doctors().remove(2, ADMIN_TOKEN).await;
    assert!(removed.success);
    assert_eq!(removed.message, "Doctor deleted successfully");
    assert_eq!(backend.doctors().len(), 2);

    let missing = api.doctors().remove(2, ADMIN_TOKEN).await;
    assert!(!missing.success);
    assert_eq!(missing.message, "Doctor not found with id 2");

    backend.reject_mutations(true);
    let rejected = api.doctors().remove(1, ADMIN_TOKEN).await;
    assert!(!rejected.success);
    assert_eq!(rejected.message, "Some internal error occurred");
}

#[tokio::test]
async fn availability_lists_slots_for_a_patient_token() {
    let (_backend, api) = start().await;
    let date = NaiveDate::from_ymd_opt(2024, 1, 5).expect("date");

    let slots = api
        .doctors()
        .availability("patient", 2, date, &patient_token(1))
        .await;
    assert_eq!(slots, vec!["02:00 PM", "03:00 PM"]);

    let denied = api.doctors().availability("patient", 2, date, "bad").await;
    assert!(denied.is_empty());
}

#[tokio::test]
async fn patient_signup_login_and_lookup() {
    let (_backend, api) = start().await;
    let patient = Patient {
        name: "Carol White".into(),
        phone: "5559990000".into(),
        email: "carol@mail.test".into(),
        address: Some("1 Main St".into()),
        password: Some("secret3".into()),
        ..Default::default()
    };

    let signup = api.patients().signup(&patient).await;
    assert!(signup.success);
    assert_eq!(signup.message, "Signup successful");

    let again = api.patients().signup(&patient).await;
    assert!(!again.success);
    assert_eq!(
        again.message,
        "Patient with email id or phone no already exist"
    );

    let response = api
        .patients()
        .login(&PatientCredentials {
            email: "carol@mail.test".into(),
            password: "secret3".into(),
        })
        .await
        .expect("login request");
    assert!(response.status().is_success());
    let body: TokenBody = response.json().await.expect("token body");
    let token = body.token.expect("token issued");

    let me = api.patients().get_by_token(&token).await.expect("patient");
    assert_eq!(me.name, "Carol White");
    assert!(me.password.is_none());

    assert!(api.patients().get_by_token("stale").await.is_none());
}

#[tokio::test]
async fn rejected_patient_login_is_a_response_not_an_error() {
    let (_backend, api) = start().await;

    let response = api
        .patients()
        .login(&PatientCredentials {
            email: "alice@mail.test".into(),
            password: "wrong".into(),
        })
        .await
        .expect("login request");

    assert_eq!(response.status(), api_client::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_logins_issue_tokens() {
    let (_backend, api) = start().await;

    let admin: TokenBody = api
        .auth()
        .admin_login(&AdminCredentials {
            username: "admin".into(),
            password: "admin123".into(),
        })
        .await
        .expect("admin login")
        .json()
        .await
        .expect("body");
    assert_eq!(admin.token.as_deref(), Some(ADMIN_TOKEN));

    let doctor: TokenBody = api
        .auth()
        .doctor_login(&DoctorCredentials {
            identifier: "shepherd@clinic.test".into(),
            password: "doctor123".into(),
        })
        .await
        .expect("doctor login")
        .json()
        .await
        .expect("body");
    assert_eq!(doctor.token, Some(doctor_token(2)));
}

#[tokio::test]
async fn patient_appointment_listing_and_filtering() {
    let (_backend, api) = start().await;
    let token = patient_token(1);

    let all = api.patients().appointments(1, "patient", &token).await;
    assert_eq!(all.len(), 3);

    let past = api.patients().filter_appointments("past", "", &token).await;
    assert_eq!(past.len(), 1);
    assert_eq!(past[0].doctor_name, "Derek Shepherd");
    assert_eq!(past[0].status_label(), "Completed");

    let future_grey = api
        .patients()
        .filter_appointments("future", "grey", &token)
        .await;
    assert_eq!(future_grey.len(), 2);

    let wrong_owner = api.patients().appointments(2, "patient", &token).await;
    assert!(wrong_owner.is_empty());
}

#[tokio::test]
async fn doctor_appointments_for_date_and_name() {
    let (backend, api) = start().await;
    let token = doctor_token(1);
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");

    let all = api.appointments().for_doctor(day, "", &token).await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].patient().name, "Alice Smith");

    let bob = api.appointments().for_doctor(day, "Bob", &token).await;
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].patient().email, "bob@mail.test");

    assert_eq!(
        backend.requests(),
        vec![
            format!("GET /appointments/2024-01-01/null/{token}"),
            format!("GET /appointments/2024-01-01/Bob/{token}"),
        ]
    );
}

#[tokio::test]
async fn book_update_and_cancel_appointment() {
    let (backend, api) = start().await;
    let token = patient_token(2);
    let mut request = AppointmentRequest {
        id: None,
        doctor: RecordRef { id: 2 },
        patient: RecordRef { id: 2 },
        appointment_time: at("2024-02-01T14:00:00"),
        status: 0,
    };

    let booked = api.appointments().book(&request, &token).await;
    assert!(booked.success);
    assert_eq!(booked.message, "Appointment booked successfully");

    let clash = api.appointments().book(&request, &token).await;
    assert!(!clash.success);

    let id = backend.appointments().last().expect("booked").id;
    request.id = Some(id);
    request.appointment_time = at("2024-02-01T15:00:00");
    let updated = api.appointments().update(&request, &token).await;
    assert!(updated.success);
    assert_eq!(
        backend.appointments().last().expect("booked").appointment_time,
        "2024-02-01T15:00:00"
    );

    let cancelled = api.appointments().cancel(id, &token).await;
    assert!(cancelled.success);
    assert!(backend.appointments().iter().all(|a| a.id != id));
}

#[tokio::test]
async fn prescriptions_save_and_fetch() {
    let (backend, api) = start().await;
    let token = doctor_token(1);

    assert!(api.prescriptions().get(1, &token).await.is_none());

    let prescription = Prescription {
        id: None,
        patient_name: "Alice Smith".into(),
        appointment_id: 1,
        medication: "Amoxicillin".into(),
        dosage: "500mg".into(),
        doctor_notes: Some("Twice daily".into()),
    };
    let saved = api.prescriptions().save(&prescription, &token).await;
    assert!(saved.success);

    let fetched = api.prescriptions().get(1, &token).await.expect("prescription");
    assert_eq!(fetched, prescription);
    assert_eq!(backend.appointments()[0].status, 1);
}
