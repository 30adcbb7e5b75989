use std::sync::Arc;

use modpanel::core::action::ActionRequest;
use modpanel::core::outcome::Transition;
use modpanel::fixture::{EventSpec, parse_fixture};
use modpanel::panel::{Panel, Settled};
use modpanel::transport::{HttpTransport, Transport, TransportError};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

const MOD_PAGE: &str = r#"
path = "/s/news/mods"

[[element]]
name = "mods"
tag = "ul"

[[element]]
parent = "mods"
tag = "a"
class = ["revoke-mod2"]
label = "remove"
data = { user = "bob", sub = "news" }

[[element]]
parent = "mods"
tag = "a"
class = ["revoke-ban"]
data = { user = "mallory", sub = "news" }

[[element]]
name = "row"
tag = "div"
data = { sid = "17" }

[[element]]
parent = "row"
tag = "button"
class = ["unsub"]
data = { ac = "unsubscribe" }
"#;

fn request(path: &str) -> ActionRequest {
    ActionRequest {
        path: path.to_string(),
        payload: Default::default(),
    }
}

fn json_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

fn panel_for(server: &MockServer) -> Panel {
    let state = parse_fixture(MOD_PAGE).expect("fixture parses");
    let transport = Arc::new(HttpTransport::new(Some(server.uri())));
    Panel::moderation(state, "/do", transport).expect("bindings register")
}

async fn fire(panel: &mut Panel, spec: &str) -> Vec<Settled> {
    let spec: EventSpec = spec.parse().expect("event spec parses");
    let event = spec.resolve(panel.state_mut()).expect("event target exists");
    panel.fire(event).await
}

// ============================================================================
// HttpTransport Tests
// ============================================================================

#[tokio::test]
async fn test_http_transport_sends_session_cookie_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/login"))
        .respond_with(json_response(r#"{"status":"ok"}"#).insert_header("set-cookie", "session=abc123; Path=/"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/do/remove_sub_ban/news/mallory"))
        .and(header("cookie", "session=abc123"))
        .respond_with(json_response(r#"{"status":"ok"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(Some(mock_server.uri()));
    transport.post(&request("/do/login")).await.expect("login succeeds");
    let result = transport
        .post(&request("/do/remove_sub_ban/news/mallory"))
        .await
        .expect("cookie is sent back");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_http_transport_decodes_ok_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/remove_sub_ban/news/mallory"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(json_response(r#"{"status":"ok"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(Some(mock_server.uri()));
    let result = transport
        .post(&request("/do/remove_sub_ban/news/mallory"))
        .await
        .expect("request succeeds");

    assert!(result.is_ok());
    assert!(result.extra.is_empty());
}

#[tokio::test]
async fn test_http_transport_keeps_extra_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/remove_mod2/news/bob"))
        .respond_with(json_response(r#"{"status":"ok","resign":true}"#))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(Some(mock_server.uri()));
    let result = transport
        .post(&request("/do/remove_mod2/news/bob"))
        .await
        .expect("request succeeds");

    assert!(result.flag("resign"));
}

#[tokio::test]
async fn test_http_transport_reports_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/subscribe/17"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(Some(mock_server.uri()));
    let result = transport.post(&request("/do/subscribe/17")).await;

    match result {
        Err(TransportError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("Internal Server Error"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_transport_reports_undecodable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/subscribe/17"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(Some(mock_server.uri()));
    let result = transport.post(&request("/do/subscribe/17")).await;

    assert!(matches!(result, Err(TransportError::Decode(_))));
}

#[tokio::test]
async fn test_http_transport_reports_network_error() {
    // Nothing listens on port 1.
    let transport = HttpTransport::new(Some("http://127.0.0.1:1".to_string()));
    let result = transport.post(&request("/do/subscribe/17")).await;

    assert!(matches!(result, Err(TransportError::Network(_))));
}

// ============================================================================
// Panel Flow Tests
// ============================================================================

#[tokio::test]
async fn test_confirmed_removal_with_resign_navigates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/remove_mod2/news/bob"))
        .respond_with(json_response(r#"{"status":"ok","resign":true}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut panel = panel_for(&mock_server);

    // First click only asks for confirmation.
    assert!(fire(&mut panel, "click:.revoke-mod2").await.is_empty());
    let settled = fire(&mut panel, "click:.revoke-mod2").await;

    assert_eq!(
        settled,
        vec![Settled::Transitioned {
            path: "/do/remove_mod2/news/bob".to_string(),
            transition: Transition::Navigate("/s/news".to_string()),
        }]
    );
    assert_eq!(panel.state().location.path, "/s/news");
    assert_eq!(panel.state().location.reloads, 0);
}

#[tokio::test]
async fn test_subscription_toggle_reloads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/unsubscribe/17"))
        .respond_with(json_response(r#"{"status":"ok"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut panel = panel_for(&mock_server);
    let settled = fire(&mut panel, "click:button.unsub").await;

    assert_eq!(settled.len(), 1);
    assert_eq!(panel.state().location.reloads, 1);
    assert_eq!(panel.state().location.path, "/s/news/mods");
}

#[tokio::test]
async fn test_rejected_action_leaves_page_alone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/remove_sub_ban/news/mallory"))
        .respond_with(json_response(r#"{"status":"error","error":["Not authorized"]}"#))
        .mount(&mock_server)
        .await;

    let mut panel = panel_for(&mock_server);
    let settled = fire(&mut panel, "click:.revoke-ban").await;

    assert!(matches!(settled.as_slice(), [Settled::Rejected { .. }]));
    assert_eq!(panel.state().location.transitions(), 0);
}

#[tokio::test]
async fn test_server_error_restores_confirm_label() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/do/remove_mod2/news/bob"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut panel = panel_for(&mock_server);
    fire(&mut panel, "click:.revoke-mod2").await;
    let settled = fire(&mut panel, "click:.revoke-mod2").await;

    assert!(matches!(
        settled.as_slice(),
        [Settled::Failed {
            error: TransportError::Api { status: 503, .. },
            ..
        }]
    ));
    assert_eq!(panel.state().location.transitions(), 0);

    let state = panel.state();
    let link = state
        .document
        .query(&modpanel::core::selector::SelectorList::parse(".revoke-mod2").unwrap())
        .unwrap();
    assert_eq!(state.document.get(link).unwrap().label, "remove");
}
