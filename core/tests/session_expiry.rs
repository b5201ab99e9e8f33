use core_test_support::STUDENT_ROLE;
use core_test_support::TestHome;
use core_test_support::mount_json;
use core_test_support::sign_in;
use oj_core::client::ApiError;
use oj_core::client::ClientConfig;
use oj_core::client::JudgeClient;
use oj_core::navigation::Location;
use oj_core::navigation::Notice;
use oj_core::navigation::RecordingNotices;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::MockServer;

#[tokio::test]
async fn expired_token_signs_out_and_next_navigation_requires_login() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/submissions",
        401,
        json!({"status": "error", "message": "token expired"}),
    )
    .await;

    let home = TestHome::new();
    let session = home.session();
    sign_in(&session, STUDENT_ROLE);

    let config = ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::default()
    };
    let client = JudgeClient::new(&config, session.clone()).expect("client");
    let err = client.get("/api/submissions", &[]).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)), "{err}");

    // The cleared session is persisted too.
    assert!(!home.session().is_authenticated());

    let mut nav = home.navigator();
    let mut notices = RecordingNotices::new();
    let report = nav
        .navigate(Location::parse("/submissions"), &mut notices)
        .expect("navigate");
    assert_eq!(report.to, Location::new("/login"));
    assert_eq!(notices.take(), vec![Notice::SignInRequired]);
}

#[tokio::test]
async fn submission_while_judging_reports_success() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/api/submissions",
        400,
        json!({"message": "正在评测，请稍后"}),
    )
    .await;

    let home = TestHome::new();
    let session = home.session();
    sign_in(&session, STUDENT_ROLE);
    let config = ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::default()
    };
    let client = JudgeClient::new(&config, session.clone()).expect("client");

    let envelope = client
        .post("/api/submissions", &json!({"problem_id": 1}))
        .await
        .expect("accepted");
    assert_eq!(envelope.status.as_deref(), Some("ok"));
    assert!(session.is_authenticated());
}
