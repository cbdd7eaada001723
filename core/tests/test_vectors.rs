//! Verify build/parse behaviour against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated outcomes,
//! and expected results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use urlscope_core::render::{error_view, result_rows};
use urlscope_core::{
    ApiClient, ApiError, DecomposeFailure, HttpMethod, HttpRequest, HttpResponse, LoginRequest,
    MessageResponse, Outcome, RegisterRequest, TokenResponse, TransportError,
};

const BASE_URL: &str = "http://localhost:8000";

fn client() -> ApiClient {
    ApiClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, expected["body"], "{name}: body");
}

/// A simulated response, or a simulated transport failure.
fn simulated_outcome(case: &Value) -> Outcome {
    if let Some(message) = case.get("simulated_transport_error") {
        return Err(TransportError::new(message.as_str().unwrap()));
    }
    let sim = &case["simulated_response"];
    Ok(HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    ))
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn assert_http_error(name: &str, err: ApiError, expected: &Value) {
    assert_eq!(expected["kind"], "Http", "{name}: only Http errors are vectored");
    match &err {
        ApiError::Http { status, .. } => {
            assert_eq!(u64::from(*status), expected["status"].as_u64().unwrap(), "{name}: status")
        }
        other => panic!("{name}: expected Http error, got {other:?}"),
    }
    assert_eq!(
        err.detail_message().as_deref(),
        expected["detail"].as_str(),
        "{name}: detail"
    );
}

// ---------------------------------------------------------------------------
// Decompose
// ---------------------------------------------------------------------------

#[test]
fn decompose_test_vectors() {
    let raw = include_str!("../../test-vectors/decompose.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        // Verify build
        let req = c.build_decompose(case["input_url"].as_str().unwrap()).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        // Verify parse + render
        let result = c.parse_decompose(simulated_outcome(case));
        if let Some(expected) = case.get("expected_error") {
            let failure = result.unwrap_err();
            let kind_matches = match expected["kind"].as_str().unwrap() {
                "Validation" => matches!(failure, DecomposeFailure::Validation(_)),
                "UnexpectedResponse" => {
                    matches!(failure, DecomposeFailure::UnexpectedResponse { .. })
                }
                "Transport" => matches!(failure, DecomposeFailure::Transport(_)),
                other => panic!("{name}: unknown expected_error kind: {other}"),
            };
            assert!(kind_matches, "{name}: got {failure:?}");

            let view = error_view(&failure);
            assert_eq!(view.title, expected["title"].as_str().unwrap(), "{name}: title");
            assert_eq!(view.rules, strings(&expected["rules"]), "{name}: rules");
            assert_eq!(view.examples, strings(&expected["examples"]), "{name}: examples");
        } else {
            let rows = result_rows(&result.unwrap());
            let expected: Vec<(String, String)> = case["expected_rows"]
                .as_array()
                .unwrap()
                .iter()
                .map(|pair| {
                    let pair = strings(pair);
                    (pair[0].clone(), pair[1].clone())
                })
                .collect();
            let actual: Vec<(String, String)> = rows
                .into_iter()
                .map(|row| (row.label.to_string(), row.value))
                .collect();
            assert_eq!(actual, expected, "{name}: rows");
        }
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn login_test_vectors() {
    let raw = include_str!("../../test-vectors/login.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: LoginRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_login(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_login(simulated_outcome(case));
        if let Some(expected) = case.get("expected_error") {
            assert_http_error(name, result.unwrap_err(), expected);
        } else {
            let expected: TokenResponse =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[test]
fn register_test_vectors() {
    let raw = include_str!("../../test-vectors/register.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: RegisterRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_register(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_register(simulated_outcome(case));
        if let Some(expected) = case.get("expected_error") {
            assert_http_error(name, result.unwrap_err(), expected);
        } else {
            let expected: MessageResponse =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
