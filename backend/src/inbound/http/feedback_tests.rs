//! End-to-end handler tests over the in-memory repository.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::ports::{FeedbackRepository, InMemoryFeedbackRepository, StaticTokenVerifier};
use crate::domain::{FeedbackService, NewFeedbackRecord, Rating};
use crate::inbound::http::feedback::{feedback_stats, submit_feedback, user_feedback};
use crate::inbound::http::health::health;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{json_config, not_found};
use crate::middleware::correlate::REQUEST_ID_HEADER;
use crate::middleware::{Correlate, RateLimit, RateLimitConfig};
use crate::test_support::MutableClock;

const ALICE_TOKEN: &str = "alice-token";
const BOB_TOKEN: &str = "bob-token";

struct Harness {
    repository: Arc<InMemoryFeedbackRepository>,
    clock: Arc<MutableClock>,
    state: web::Data<HttpState>,
    rate_limit: RateLimit,
}

fn harness_with_limit(max_requests: u32) -> Harness {
    let repository = Arc::new(InMemoryFeedbackRepository::new());
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).single().expect("valid timestamp"),
    ));
    let verifier = StaticTokenVerifier::from_pairs([(ALICE_TOKEN, "alice"), (BOB_TOKEN, "bob")])
        .expect("valid token pairs");
    let state = web::Data::new(HttpState::new(
        FeedbackService::new(repository.clone(), clock.clone()),
        Arc::new(verifier),
    ));
    let rate_limit = RateLimit::new(
        RateLimitConfig {
            max_requests,
            window: Duration::from_secs(900),
        },
        clock.clone(),
    );
    Harness {
        repository,
        clock,
        state,
        rate_limit,
    }
}

fn harness() -> Harness {
    // Generous limit so only the dedicated tests exercise 429s.
    harness_with_limit(1000)
}

fn api_app(
    harness: &Harness,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(harness.state.clone())
        .app_data(json_config())
        .wrap(Correlate)
        .service(health)
        .service(
            web::scope("/api/feedback")
                .service(
                    web::resource("")
                        .wrap(harness.rate_limit.clone())
                        .route(web::post().to(submit_feedback)),
                )
                .service(user_feedback)
                .service(feedback_stats),
        )
        .default_service(web::route().to(not_found))
}

fn post_feedback(token: Option<&str>, body: &Value) -> test::TestRequest {
    let mut req = test::TestRequest::post().uri("/api/feedback").set_json(body);
    if let Some(token) = token {
        req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    req
}

fn get_authed(path: &str, token: Option<&str>) -> test::TestRequest {
    let mut req = test::TestRequest::get().uri(path);
    if let Some(token) = token {
        req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    req
}

fn stored_record(user_key: &str, rating: i64) -> NewFeedbackRecord {
    NewFeedbackRecord {
        id: Uuid::new_v4(),
        user_key: user_key.to_owned(),
        session_id: "seed-session".to_owned(),
        request_id: "seed-request".to_owned(),
        rating: Rating::new(rating).expect("valid rating"),
        main_content: None,
        comment: None,
        ip_address: "127.0.0.1".to_owned(),
        user_agent: String::new(),
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
#[actix_web::test]
async fn create_round_trips_rating_and_content(#[case] rating: i64) {
    let harness = harness();
    let app = test::init_service(api_app(&harness)).await;

    let body = json!({
        "rating": rating,
        "main_content": "Отличный ответ — really helpful",
        "comment": "Thanks!"
    });
    let created = test::call_service(&app, post_feedback(Some(ALICE_TOKEN), &body).to_request())
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(created).await;
    assert_eq!(created.get("success"), Some(&Value::Bool(true)));
    assert_eq!(
        created.get("message").and_then(Value::as_str),
        Some("Feedback submitted successfully")
    );
    let data = created.get("data").expect("data present");
    assert_eq!(data.get("rating").and_then(Value::as_i64), Some(rating));
    let feedback_id = data
        .get("feedback_id")
        .and_then(Value::as_str)
        .expect("feedback id");
    Uuid::parse_str(feedback_id).expect("feedback id is a UUID");

    let listed = test::call_service(
        &app,
        get_authed("/api/feedback/user", Some(ALICE_TOKEN)).to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let listed: Value = test::read_body_json(listed).await;
    let data = listed.get("data").expect("data present");
    assert_eq!(data.get("total").and_then(Value::as_i64), Some(1));
    let record = &data.get("feedbacks").and_then(Value::as_array).expect("feedbacks")[0];
    assert_eq!(record.get("rating").and_then(Value::as_i64), Some(rating));
    assert_eq!(
        record.get("main_content").and_then(Value::as_str),
        Some("Отличный ответ — really helpful")
    );
    assert_eq!(record.get("comment").and_then(Value::as_str), Some("Thanks!"));
    assert_eq!(record.get("id").and_then(Value::as_str), Some(feedback_id));
}

#[actix_web::test]
async fn anonymous_creation_is_accepted_and_not_attributed() {
    let harness = harness();
    let app = test::init_service(api_app(&harness)).await;

    let res = test::call_service(
        &app,
        post_feedback(None, &json!({ "rating": 4 })).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let listed = test::call_service(
        &app,
        get_authed("/api/feedback/user", Some(ALICE_TOKEN)).to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(listed).await;
    assert_eq!(
        listed.pointer("/data/total").and_then(Value::as_i64),
        Some(0)
    );
}

#[actix_web::test]
async fn invalid_ratings_fail_naming_the_field() {
    let harness = harness();
    let app = test::init_service(api_app(&harness)).await;

    for body in [json!({}), json!({ "rating": 7 }), json!({ "rating": "five" })] {
        let res = test::call_service(&app, post_feedback(None, &body).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value.get("success"), Some(&Value::Bool(false)));
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("VALIDATION_ERROR")
        );
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("Validation failed")
        );
        let errors = value.get("errors").and_then(Value::as_array).expect("errors");
        assert_eq!(
            errors[0].get("field").and_then(Value::as_str),
            Some("rating")
        );
    }
}

#[actix_web::test]
async fn oversized_fields_are_reported_together() {
    let harness = harness();
    let app = test::init_service(api_app(&harness)).await;

    let body = json!({
        "rating": 5,
        "main_content": "x".repeat(5001),
        "comment": "y".repeat(1001)
    });
    let res = test::call_service(&app, post_feedback(None, &body).to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = test::read_body_json(res).await;
    let fields: Vec<&str> = value
        .get("errors")
        .and_then(Value::as_array)
        .expect("errors")
        .iter()
        .filter_map(|e| e.get("field").and_then(Value::as_str))
        .collect();
    assert_eq!(fields, vec!["main_content", "comment"]);
}

#[actix_web::test]
async fn malformed_json_yields_the_validation_envelope() {
    let harness = harness();
    let app = test::init_service(api_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/api/feedback")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("VALIDATION_ERROR")
    );
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("Invalid JSON payload")
    );
}

#[actix_web::test]
async fn eleventh_submission_in_the_window_is_rejected() {
    let harness = harness_with_limit(10);
    let app = test::init_service(api_app(&harness)).await;
    let caller: SocketAddr = "203.0.113.7:44123".parse().expect("socket addr");

    for _ in 0..10 {
        let res = test::call_service(
            &app,
            post_feedback(None, &json!({ "rating": 5 }))
                .peer_addr(caller)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let denied = test::call_service(
        &app,
        post_feedback(None, &json!({ "rating": 5 }))
            .peer_addr(caller)
            .to_request(),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    let value: Value = test::read_body_json(denied).await;
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("RATE_LIMIT_EXCEEDED")
    );
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("Too many feedback submissions, please try again later")
    );

    // A different caller is unaffected.
    let other: SocketAddr = "203.0.113.8:44123".parse().expect("socket addr");
    let res = test::call_service(
        &app,
        post_feedback(None, &json!({ "rating": 5 }))
            .peer_addr(other)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Reads are not rate limited.
    let listed = test::call_service(
        &app,
        get_authed("/api/feedback/user", Some(ALICE_TOKEN)).to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);

    // The window eventually expires.
    harness.clock.advance(Duration::from_secs(901));
    let res = test::call_service(
        &app,
        post_feedback(None, &json!({ "rating": 5 }))
            .peer_addr(caller)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[rstest]
#[case("/api/feedback/user")]
#[case("/api/feedback/stats")]
#[actix_web::test]
async fn protected_routes_require_a_valid_token(#[case] path: &str) {
    let harness = harness();
    let app = test::init_service(api_app(&harness)).await;

    for token in [None, Some("wrong-token")] {
        let res = test::call_service(&app, get_authed(path, token).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("AUTH_REQUIRED")
        );
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("User authentication required")
        );
    }
}

#[actix_web::test]
async fn user_listing_is_scoped_ordered_and_capped() {
    let harness = harness();

    for rating in [1, 2, 3] {
        harness
            .repository
            .insert(&stored_record("alice", rating))
            .await
            .expect("seed insert");
    }
    harness
        .repository
        .insert(&stored_record("bob", 5))
        .await
        .expect("seed insert");

    let app = test::init_service(api_app(&harness)).await;
    let listed = test::call_service(
        &app,
        get_authed("/api/feedback/user", Some(ALICE_TOKEN)).to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(listed).await;
    let ratings: Vec<i64> = listed
        .pointer("/data/feedbacks")
        .and_then(Value::as_array)
        .expect("feedbacks")
        .iter()
        .filter_map(|f| f.get("rating").and_then(Value::as_i64))
        .collect();
    // Newest first, bob's record absent.
    assert_eq!(ratings, vec![3, 2, 1]);

    for _ in 0..55 {
        harness
            .repository
            .insert(&stored_record("alice", 4))
            .await
            .expect("seed insert");
    }
    let listed = test::call_service(
        &app,
        get_authed("/api/feedback/user", Some(ALICE_TOKEN)).to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(listed).await;
    assert_eq!(
        listed.pointer("/data/total").and_then(Value::as_i64),
        Some(50)
    );
}

#[actix_web::test]
async fn stats_aggregate_all_records() {
    let harness = harness();
    for (user, rating) in [
        ("alice", 5),
        ("alice", 5),
        ("alice", 4),
        ("alice", 2),
        ("bob", 1),
    ] {
        harness
            .repository
            .insert(&stored_record(user, rating))
            .await
            .expect("seed insert");
    }

    let app = test::init_service(api_app(&harness)).await;
    let res = test::call_service(
        &app,
        get_authed("/api/feedback/stats", Some(BOB_TOKEN)).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let value: Value = test::read_body_json(res).await;
    let data = value.get("data").expect("data present");

    assert_eq!(data.get("total_feedbacks").and_then(Value::as_i64), Some(5));
    assert_eq!(data.get("five_star_count").and_then(Value::as_i64), Some(2));
    assert_eq!(data.get("positive_count").and_then(Value::as_i64), Some(3));
    assert_eq!(data.get("negative_count").and_then(Value::as_i64), Some(2));
    let average = data
        .get("average_rating")
        .and_then(Value::as_f64)
        .expect("average present");
    assert!((average - 3.4).abs() < 1e-9);
    assert!((1.0..=5.0).contains(&average));
}

#[rstest]
#[case::get_unknown("/api/unknown")]
#[case::deep_path("/api/feedback/nope/deeper")]
#[case::root("/nope")]
#[actix_web::test]
async fn unmatched_routes_return_the_not_found_envelope(#[case] path: &str) {
    let harness = harness();
    let app = test::init_service(api_app(&harness)).await;

    for method in ["GET", "POST"] {
        let req = match method {
            "GET" => test::TestRequest::get(),
            _ => test::TestRequest::post(),
        }
        .uri(path)
        .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value.get("code").and_then(Value::as_str), Some("NOT_FOUND"));
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("Endpoint not found")
        );
    }
}

#[actix_web::test]
async fn responses_echo_the_request_identifier() {
    let harness = harness();
    let app = test::init_service(api_app(&harness)).await;

    let req = post_feedback(None, &json!({ "rating": 3 }))
        .insert_header((REQUEST_ID_HEADER, "req-e2e-1"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some("req-e2e-1")
    );
}
