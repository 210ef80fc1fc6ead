#![allow(clippy::unwrap_used)]
// Integration tests for `Controller` against a mocked Ryu REST API.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sdnview_core::{
    Canvas, ChannelSink, Controller, ControllerConfig, CoreError, Entity, FlowCommand, Phase,
    RenderFrame, SwitchId, TopologyEndpoint, parse_dpid,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let config = ControllerConfig {
        url: Url::parse(&server.uri()).unwrap(),
        timeout: Duration::from_secs(2),
        ..ControllerConfig::default()
    };
    let controller = Controller::new(config).unwrap();
    (server, controller)
}

async fn mount_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_topology(server: &MockServer) {
    mount_get(
        server,
        "/v1.0/topology/switches",
        json!([{ "dpid": "0000000000000002" }, { "dpid": "0000000000000001" }]),
    )
    .await;
    mount_get(
        server,
        "/v1.0/topology/links",
        json!([
            { "src": { "dpid": "0000000000000001", "port_no": "00000002" },
              "dst": { "dpid": "0000000000000002", "port_no": "00000002" } },
            { "src": { "dpid": "0000000000000002" },
              "dst": { "dpid": "0000000000000002" } }
        ]),
    )
    .await;
    mount_get(
        server,
        "/v1.0/topology/hosts",
        json!([
            { "mac": "00:00:00:00:00:01", "ipv4": ["10.0.0.1"],
              "port": { "dpid": "0000000000000001", "port_no": "00000001" } },
            { "mac": "00:00:00:00:00:02", "ipv4": [],
              "port": { "dpid": "0000000000000002", "port_no": "00000001" } }
        ]),
    )
    .await;
}

// ── Topology ────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_sorts_switches_and_drops_self_loops() {
    let (server, controller) = setup().await;
    mount_topology(&server).await;

    let snapshot = controller.snapshot().await.unwrap();

    let names: Vec<String> = snapshot
        .switches()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, vec!["0000000000000001", "0000000000000002"]);
    assert_eq!(snapshot.links().len(), 1);
    assert_eq!(snapshot.links()[0].src_port, Some(2));
    assert_eq!(snapshot.hosts()[0].display_name, "h1");
    assert_eq!(snapshot.hosts()[1].display_name, "h2");
    assert_eq!(snapshot.hosts()[1].ipv4, "");
}

#[tokio::test]
async fn unparseable_dpid_is_decode_error() {
    let (server, controller) = setup().await;
    mount_get(
        &server,
        "/v1.0/topology/switches",
        json!([{ "dpid": "s1" }]),
    )
    .await;

    let err = controller.fetch_switches().await.unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_field_is_decode_error() {
    let (server, controller) = setup().await;
    mount_get(
        &server,
        "/v1.0/topology/hosts",
        json!([{ "mac": "00:00:00:00:00:01" }]),
    )
    .await;

    let err = controller.fetch_hosts().await.unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn raw_fetch_is_verbatim() {
    let (server, controller) = setup().await;
    let body = r#"[{"src": {"dpid": "0000000000000001"}, "dst": {"dpid": "0000000000000002"}}]"#;
    Mock::given(method("GET"))
        .and(path("/v1.0/topology/links"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let raw = controller.fetch_raw(TopologyEndpoint::Links).await.unwrap();
    assert_eq!(raw, body);
}

#[tokio::test]
async fn closed_port_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{addr}")).unwrap();
    let controller = Controller::new(ControllerConfig::new(url)).unwrap();
    let err = controller.fetch_switches().await.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}

// ── Flow rules ──────────────────────────────────────────────────────

#[tokio::test]
async fn delete_by_match_sends_exact_body() {
    let (server, controller) = setup().await;
    let expected = json!({ "dpid": 1, "table_id": 0, "match": { "in_port": 3 } });
    Mock::given(method("POST"))
        .and(path("/stats/flowentry/delete"))
        .and(body_json(expected))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = controller
        .delete_flow_by_match(SwitchId::new(1), 3)
        .await
        .unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn add_flow_from_hex_operator_input() {
    let (server, controller) = setup().await;
    Mock::given(method("POST"))
        .and(path("/stats/flowentry/add"))
        .and(body_json(json!({
            "dpid": 26,
            "cookie": 1,
            "priority": 100,
            "match": { "in_port": 1 },
            "actions": [{ "type": "OUTPUT", "port": 2 }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dpid = parse_dpid("1A").unwrap();
    controller.add_flow(dpid, 1, 2).await.unwrap();
}

#[tokio::test]
async fn clear_flows_posts_dpid() {
    let (server, controller) = setup().await;
    Mock::given(method("POST"))
        .and(path("/stats/flowentry/clear"))
        .and(body_json(json!({ "dpid": 2 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let clear = FlowCommand::clear(SwitchId::new(2));
    let outcome = controller.execute(clear).await.unwrap();
    assert_eq!(outcome.status, 200);
}

#[tokio::test]
async fn rejected_flow_is_reported_verbatim() {
    let (server, controller) = setup().await;
    Mock::given(method("POST"))
        .and(path("/stats/flowentry/add"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid syntax"))
        .mount(&server)
        .await;

    let outcome = controller.add_flow(SwitchId::new(1), 1, 2).await.unwrap();
    assert_eq!(outcome.status, 400);
    assert_eq!(outcome.body, "Invalid syntax");
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn invalid_dpid_never_reaches_the_network() {
    let (server, _controller) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = CoreError::from(parse_dpid("0xZZ").unwrap_err());
    assert!(matches!(err, CoreError::InvalidDpid(_)));
}

// ── Scheduler over HTTP ─────────────────────────────────────────────

#[tokio::test]
async fn refresh_renders_ring_on_900x600() {
    let (server, controller) = setup().await;
    mount_topology(&server).await;

    let (sink, mut frames) = ChannelSink::new();
    let scheduler = controller.scheduler(Arc::new(sink));
    scheduler.set_canvas(Canvas::new(900.0, 600.0));
    let report = scheduler.refresh_now().await;
    assert!(report.complete_applied);

    let mut last = frames.recv().await.unwrap();
    while let Ok(next) = frames.try_recv() {
        last = next;
    }
    assert_eq!(last.phase, Phase::Complete);
    assert!(last.failures.is_empty());

    let layout = &last.layout;
    assert!((layout.radius - 210.0).abs() < 1e-9);
    let first = layout.switch_position(SwitchId::new(1)).unwrap();
    let second = layout.switch_position(SwitchId::new(2)).unwrap();
    assert!(first.x > 450.0, "switch 0 should be right of centre");
    assert!(second.x < 450.0, "switch 1 should be left of centre");
    assert_eq!(layout.edges.len(), 1);
    assert_eq!(layout.hosts.len(), 2);
}

#[tokio::test]
async fn host_failure_degrades_to_no_hosts() {
    let (server, controller) = setup().await;
    mount_get(
        &server,
        "/v1.0/topology/switches",
        json!([{ "dpid": "0000000000000001" }]),
    )
    .await;
    mount_get(&server, "/v1.0/topology/links", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/topology/hosts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let scheduler = controller.scheduler(Arc::new(|_frame: Arc<RenderFrame>| {}));
    scheduler.refresh_now().await;

    let frame = scheduler.current().unwrap();
    assert_eq!(frame.phase, Phase::Complete);
    assert_eq!(frame.snapshot.switches().len(), 1);
    assert!(frame.snapshot.hosts().is_empty());
    assert!(frame.failed(Entity::Hosts));
    assert!(!frame.failed(Entity::Switches));
}
