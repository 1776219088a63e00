//! HTTP-level tests for `POST /api/generate-trip`.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, japan_request_body, post_json, GeneratorMode};
use mapa_db::stores::SessionStore;

const URI: &str = "/api/generate-trip";

#[tokio::test]
async fn generates_both_itineraries_for_the_requested_duration() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;

    let response = post_json(&app.router, URI, japan_request_body(), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["tripName"].as_str().unwrap().contains("Japan"));
    for key in ["budgetItinerary", "experienceItinerary"] {
        let plans = json[key]["dailyPlans"].as_array().unwrap();
        assert_eq!(plans.len(), 5);
        let days: Vec<u64> = plans.iter().map(|p| p["day"].as_u64().unwrap()).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5]);
        assert!(json[key]["totalCost"].as_f64().unwrap() > 0.0);
    }
    // Returned unwrapped, not in a data envelope.
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn resolves_display_names_before_generating() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;

    post_json(&app.router, URI, japan_request_body(), Some(&token)).await;

    let calls = app.generator.calls();
    assert_eq!(calls.len(), 1);
    let (request, names) = &calls[0];
    assert_eq!(request.duration, 5);
    assert_eq!(names.origin_airport_name, "Ninoy Aquino International Airport");
    assert_eq!(names.destination_country_name, "Japan");
    assert!(names.city_names.is_empty());
}

#[tokio::test]
async fn unknown_cities_are_dropped_and_order_kept() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;

    let mut body = japan_request_body();
    body["selectedCities"] = serde_json::json!(["KYO", "XYZ", "TYO", "SEL"]);
    let response = post_json(&app.router, URI, body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (_, names) = &app.generator.calls()[0];
    // SEL exists, but in another country.
    assert_eq!(names.city_names, vec!["Kyoto", "Tokyo"]);
}

#[tokio::test]
async fn unknown_codes_fall_back_to_the_raw_code() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;

    let mut body = japan_request_body();
    body["originAirport"] = "CEB".into();
    body["destinationCountry"] = "TWN".into();
    let response = post_json(&app.router, URI, body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (_, names) = &app.generator.calls()[0];
    assert_eq!(names.origin_airport_name, "CEB");
    assert_eq!(names.destination_country_name, "TWN");
}

#[tokio::test]
async fn lowercase_codes_resolve_like_uppercase() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;

    let mut body = japan_request_body();
    body["originAirport"] = "mnl".into();
    body["destinationCountry"] = "jpn".into();
    body["selectedCities"] = serde_json::json!(["kyo", "Tyo"]);
    let response = post_json(&app.router, URI, body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (request, names) = &app.generator.calls()[0];
    assert_eq!(request.destination_country, "JPN");
    assert_eq!(names.origin_airport_name, "Ninoy Aquino International Airport");
    assert_eq!(names.destination_country_name, "Japan");
    assert_eq!(names.city_names, vec!["Kyoto", "Tokyo"]);
}

#[tokio::test]
async fn reference_outage_does_not_block_generation() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;
    app.reference.set_failing(true);

    let mut body = japan_request_body();
    body["selectedCities"] = serde_json::json!(["TYO"]);
    let response = post_json(&app.router, URI, body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (_, names) = &app.generator.calls()[0];
    assert_eq!(names.origin_airport_name, "MNL");
    assert_eq!(names.destination_country_name, "JPN");
    assert!(names.city_names.is_empty());
}

#[tokio::test]
async fn requires_authentication_before_anything_else() {
    let app = build_test_app();

    // Even an invalid body gets 401, not 400.
    let response = post_json(&app.router, URI, serde_json::json!({}), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(app.generator.calls().is_empty());
}

#[tokio::test]
async fn revoked_session_is_rejected() {
    let app = build_test_app();
    let (user, token) = app.signed_in_user("juan@example.com").await;
    app.sessions.revoke_all_for_user(user.id).await.unwrap();

    let response = post_json(&app.router, URI, japan_request_body(), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn every_field_violation_is_listed() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;

    let mut body = japan_request_body();
    body["duration"] = 0.into();
    body["preferences"] = serde_json::json!([]);
    body.as_object_mut().unwrap().remove("currency");

    let response = post_json(&app.router, URI, body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Validation failed");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"duration"), "{fields:?}");
    assert!(fields.contains(&"preferences"), "{fields:?}");
    assert!(fields.contains(&"currency"), "{fields:?}");
    assert!(app.generator.calls().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri(URI)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = common::send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn generation_failures_map_to_coarse_categories() {
    let cases = [
        (
            GeneratorMode::Unconfigured,
            StatusCode::SERVICE_UNAVAILABLE,
            "GENERATION_UNAVAILABLE",
        ),
        (
            GeneratorMode::ServiceDown,
            StatusCode::BAD_GATEWAY,
            "GENERATION_FAILED",
        ),
        (
            GeneratorMode::BadOutput,
            StatusCode::BAD_GATEWAY,
            "GENERATION_INVALID_OUTPUT",
        ),
    ];

    for (mode, status, code) in cases {
        let app = build_test_app();
        let (_user, token) = app.signed_in_user("juan@example.com").await;
        app.generator.set_mode(mode);

        let response = post_json(&app.router, URI, japan_request_body(), Some(&token)).await;
        assert_eq!(response.status(), status, "{mode:?}");

        let json = body_json(response).await;
        assert_eq!(json["code"], code);
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("try again"), "{message}");
        assert!(!message.contains("secret upstream detail"));
        assert!(!message.contains("GEMINI_API_KEY"));
    }
}

#[tokio::test]
async fn wrong_type_is_listed_with_the_other_violations() {
    let app = build_test_app();
    let (_user, token) = app.signed_in_user("juan@example.com").await;

    let mut body = japan_request_body();
    body["budget"] = "a lot".into();
    body["preferences"] = serde_json::json!([]);
    body["duration"] = 0.into();

    let response = post_json(&app.router, URI, body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["budget", "duration", "preferences"]);
    assert!(app.generator.calls().is_empty());
}
