use actix_web::{dev::ServerHandle, web, App, HttpRequest, HttpResponse, HttpServer};
use std::net::SocketAddr;
use std::time::Duration;

use thisisafrica_api::config::TourPlanConfig;
use thisisafrica_api::services::tourplan::{HostConnect, TourPlanClient, TourPlanError};

const OPTION_REPLY: &str =
    "<?xml version=\"1.0\"?><Reply><OptionInfoReply><Option><Opt>BBKCRCHO018TIACP2</Opt></Option></OptionInfoReply></Reply>";

async fn unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().body("maintenance")
}

async fn slow() -> HttpResponse {
    actix_rt::time::sleep(Duration::from_secs(5)).await;
    HttpResponse::Ok().body(OPTION_REPLY)
}

/// Answers only well-formed HostConnect posts.
async fn hostconnect(req: HttpRequest, body: String) -> HttpResponse {
    let content_type = req
        .headers()
        .get("Content-Type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if content_type != "text/xml; charset=utf-8" || !body.contains("<AgentID>SAMAGT</AgentID>") {
        return HttpResponse::BadRequest().finish();
    }
    HttpResponse::Ok().content_type("text/xml").body(OPTION_REPLY)
}

fn start_server() -> (SocketAddr, ServerHandle) {
    let server = HttpServer::new(|| {
        App::new()
            .route("/unavailable", web::post().to(unavailable))
            .route("/slow", web::post().to(slow))
            .route("/hostconnect", web::post().to(hostconnect))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);
    (addr, handle)
}

fn client(addr: SocketAddr, path: &str, timeout: Duration) -> TourPlanClient {
    TourPlanClient::new(TourPlanConfig {
        endpoint: format!("http://{}{}", addr, path),
        agent_id: "SAMAGT".to_string(),
        password: "test-password".to_string(),
        timeout,
    })
    .unwrap()
}

#[actix_rt::test]
async fn test_non_2xx_is_transport_error() {
    let (addr, handle) = start_server();
    let client = client(addr, "/unavailable", Duration::from_secs(30));

    let result = client.send("<Request/>".to_string()).await;
    match result {
        Err(TourPlanError::Transport(message)) => assert!(message.starts_with("HTTP 503"), "{}", message),
        other => panic!("expected transport error, got {:?}", other.map(|node| node.name)),
    }

    handle.stop(false).await;
}

#[actix_rt::test]
async fn test_configured_timeout_is_applied() {
    let (addr, handle) = start_server();
    let client = client(addr, "/slow", Duration::from_millis(200));

    let result = client.send("<Request/>".to_string()).await;
    assert!(matches!(result, Err(TourPlanError::Transport(_))));

    handle.stop(false).await;
}

#[actix_rt::test]
async fn test_successful_exchange_is_parsed() {
    let (addr, handle) = start_server();
    let client = client(addr, "/hostconnect", Duration::from_secs(30));

    let root = client
        .send("<Request><OptionInfoRequest><AgentID>SAMAGT</AgentID></OptionInfoRequest></Request>".to_string())
        .await
        .unwrap();
    assert_eq!(root.name, "Reply");
    assert_eq!(
        root.path(&["OptionInfoReply", "Option"]).unwrap().child_text("Opt"),
        Some("BBKCRCHO018TIACP2")
    );
    assert_eq!(client.credentials(), ("SAMAGT", "test-password"));

    handle.stop(false).await;
}
