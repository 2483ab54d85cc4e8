use actix_web::{
    App,
    body::MessageBody,
    http::StatusCode,
    test::{self, TestRequest},
    web,
};
use log::debug;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

use crate::{
    api::RatesApi,
    config::FeedConfig,
    feed::RateFetcher,
    routes,
    store::MemoryRateStore,
};

/// Starts a fake rate feed that answers every request with `status` and `body`.
pub async fn mock_feed(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

pub async fn send(
    req: TestRequest,
    feed: &MockServer,
    store: &MemoryRateStore,
) -> (StatusCode, String) {
    let fetcher = RateFetcher::new(FeedConfig::new(&feed.uri())).expect("Could not create fetcher");
    let api = RatesApi::new(fetcher, store.clone());
    let app = App::new().app_data(web::Data::new(api)).configure(routes::configure::<MemoryRateStore>);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("Response was not JSON")
}
