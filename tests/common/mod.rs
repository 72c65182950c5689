#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use thisisafrica_api::config::TourPlanConfig;
use thisisafrica_api::routes;
use thisisafrica_api::services::tourplan::xml_parser::parse_response;
use thisisafrica_api::services::tourplan::{HostConnect, TourPlanError, XmlNode};

/// HostConnect stand-in: answers with scripted XML in order and keeps every
/// request body it was sent.
pub struct FakeHostConnect {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeHostConnect {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, xml: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(xml.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HostConnect for FakeHostConnect {
    async fn send(&self, request_xml: String) -> Result<XmlNode, TourPlanError> {
        self.requests.lock().unwrap().push(request_xml);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(xml)) => parse_response(&xml),
            Some(Err(message)) => Err(TourPlanError::Transport(message)),
            None => Err(TourPlanError::Transport("connection refused".to_string())),
        }
    }

    fn credentials(&self) -> (&str, &str) {
        ("SAMAGT", "test-password")
    }
}

pub fn test_config() -> TourPlanConfig {
    TourPlanConfig {
        endpoint: "https://pa-thisis.nx.tourplan.net/hostconnect/api/hostConnectApi".to_string(),
        agent_id: "SAMAGT".to_string(),
        password: "test-password".to_string(),
        timeout: Duration::from_secs(30),
    }
}

pub fn create_app(
    client: web::Data<FakeHostConnect>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(client)
        .app_data(web::Data::new(test_config()))
        .wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
        .wrap(Logger::default())
        .route("/health", web::get().to(routes::health::health_check))
        .service(
            web::scope("/api/tourplan")
                .route(
                    "/pricing/{productCode}",
                    web::get().to(routes::pricing::get_pricing_calendar::<FakeHostConnect>),
                )
                .route(
                    "/products/{productCode}",
                    web::get().to(routes::product::get_product_details::<FakeHostConnect>),
                ),
        )
}

/// `OptionInfoReply` with one `Option` wrapping `inner`.
pub fn option_reply(inner: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?><Reply><OptionInfoReply><Option>{}</Option></OptionInfoReply></Reply>",
        inner
    )
}

pub const EMPTY_REPLY: &str = "<Reply><OptionInfoReply/></Reply>";
