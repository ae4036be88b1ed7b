use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::{AvailabilityQuery, AvailabilityService, ScheduleError, SlotBoard, SlotOutcome};
use shared_backend::BackendError;
use shared_utils::test_utils::TestConfig;

fn june(day: u32) -> AvailabilityQuery {
    AvailabilityQuery {
        professional_id: 7,
        company_id: 1,
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
    }
}

fn service_for(server: &MockServer) -> AvailabilityService {
    AvailabilityService::new(&TestConfig::with_backend(&server.uri()).to_app_config())
}

#[tokio::test]
async fn test_fetch_sends_professional_company_and_date() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/available-slots"))
        .and(query_param("professionalId", "7"))
        .and(query_param("companyId", "1"))
        .and(query_param("date", "2024-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["09:00", "09:30"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let slots = service_for(&mock_server).fetch_time_slots(&june(10), None).await.unwrap();
    assert_eq!(slots, vec!["09:00".to_string(), "09:30".to_string()]);
}

#[tokio::test]
async fn test_wrapped_payload_is_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/available-slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "availableSlots": ["14:00"]
        })))
        .mount(&mock_server)
        .await;

    let slots = service_for(&mock_server).fetch_time_slots(&june(11), None).await.unwrap();
    assert_eq!(slots, vec!["14:00".to_string()]);
}

#[tokio::test]
async fn test_backend_failure_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/available-slots"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = service_for(&mock_server).fetch_time_slots(&june(12), None).await.unwrap_err();
    assert_matches!(err, ScheduleError::Backend(BackendError::Unavailable { .. }));
}

#[tokio::test]
async fn test_board_keeps_only_latest_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/available-slots"))
        .and(query_param("date", "2024-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["09:00"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appointments/available-slots"))
        .and(query_param("date", "2024-06-11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["15:00", "15:30"])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let mut board = SlotBoard::new();

    let older = board.begin(june(10));
    let newer = board.begin(june(11));

    // newer response lands first, older one afterwards
    let newer_result = service.fetch_time_slots(&newer.query, None).await.map_err(|e| e.to_string());
    assert_eq!(board.apply(&newer, newer_result), SlotOutcome::Loaded(2));

    let older_result = service.fetch_time_slots(&older.query, None).await.map_err(|e| e.to_string());
    assert_eq!(board.apply(&older, older_result), SlotOutcome::Stale);

    assert_eq!(board.slots, vec!["15:00".to_string(), "15:30".to_string()]);
}
