use std::time::Duration;

use serde_json::json;
use serp_jobs::{BrightData, BrightDataConfig, FlightQuery, HotelQuery, JobPoller, PollPolicy};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn poller_for(server: &MockServer, max_retries: u32) -> JobPoller<BrightData> {
    let config =
        BrightDataConfig::new("test-key", "c_test", "serp_zone").with_base_url(server.uri());
    JobPoller::new(BrightData::new(config))
        .with_policy(PollPolicy::new(max_retries, Duration::from_millis(10)))
}

#[tokio::test]
async fn test_flight_search_submits_then_fetches_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/req"))
        .and(query_param("customer", "c_test"))
        .and(query_param("zone", "serp_zone"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({
            "url": "https://www.google.com/travel/flights/search?tfs=CBwQ&hl=en&curr=USD",
            "brd_json": "json"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response_id": "resp-42"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/get_result"))
        .and(query_param("customer", "c_test"))
        .and(query_param("zone", "serp_zone"))
        .and(query_param("response_id", "resp-42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"flights": [{"price": 410}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = poller_for(&server, 3)
        .search_flights(&FlightQuery::new("CBwQ"))
        .await;

    assert_eq!(result, Some(json!({"flights": [{"price": 410}]})));
}

#[tokio::test]
async fn test_pending_job_is_polled_max_retries_times() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/req"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response_id": "slow"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/get_result"))
        .respond_with(ResponseTemplate::new(202).set_body_string("Request is pending"))
        .expect(3)
        .mount(&server)
        .await;

    let result = poller_for(&server, 3)
        .search_hotels(&HotelQuery::new("London"))
        .await;

    assert!(result.is_none(), "Exhausted budget should yield no result");
}

#[tokio::test]
async fn test_non_success_submission_never_polls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/req"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/get_result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let poller = poller_for(&server, 3);
    let err = poller
        .try_submit("https://example.com", &[("q", "x")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("401"), "unexpected error: {err}");

    let result = poller.search_flights(&FlightQuery::new("CBwQ")).await;
    assert!(result.is_none());
}
