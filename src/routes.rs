//! Request handlers.
//!
//! The handlers are generic over the snapshot store, so they are registered by hand in [`configure`] rather than
//! with the attribute macros.
use actix_web::{
    HttpResponse,
    Responder,
    get,
    http::header::ContentType,
    web::{self, ServiceConfig},
};
use log::*;
use serde_json::Value;

use crate::{
    api::RatesApi,
    data_objects::{ConversionResult, ConvertRequest, EmptyResult, LastUpdateResult, UpdateResult},
    errors::{ConversionError, ServerError},
    store::RateStore,
};

const INDEX_HTML: &str = include_str!("../static/index.html");
const APP_JS: &str = include_str!("../static/app.js");

/// Registers the API routes and the conversion page against a `RatesApi<S>` held in app data.
pub fn configure<S: RateStore + 'static>(cfg: &mut ServiceConfig) {
    cfg.service(index)
        .service(app_js)
        .service(health)
        .service(web::resource("/api/update_rates").route(web::post().to(update_rates::<S>)))
        .service(web::resource("/api/last_update").route(web::get().to(last_update::<S>)))
        .service(web::resource("/api/convert").route(web::post().to(convert::<S>)));
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().content_type(ContentType::html()).body(INDEX_HTML)
}

#[get("/static/app.js")]
pub async fn app_js() -> impl Responder {
    HttpResponse::Ok().content_type("application/javascript; charset=utf-8").body(APP_JS)
}

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

pub async fn update_rates<S: RateStore>(api: web::Data<RatesApi<S>>) -> Result<HttpResponse, ServerError> {
    debug!("Received rate update request");
    let snapshot = api.update_rates().await?;
    Ok(HttpResponse::Ok().json(UpdateResult::from(&snapshot)))
}

pub async fn last_update<S: RateStore>(api: web::Data<RatesApi<S>>) -> Result<HttpResponse, ServerError> {
    let response = match api.last_update().await? {
        Some(snapshot) => HttpResponse::Ok().json(LastUpdateResult::from(&snapshot)),
        None => HttpResponse::NotFound().json(EmptyResult::no_rates()),
    };
    Ok(response)
}

pub async fn convert<S: RateStore>(
    body: web::Bytes,
    api: web::Data<RatesApi<S>>,
) -> Result<HttpResponse, ServerError> {
    let request = parse_convert_request(&body)?;
    let conversion = api.convert(&request).await?;
    Ok(HttpResponse::Ok().json(ConversionResult::from(conversion)))
}

// An empty or `null` body is read as `{}`.
fn parse_convert_request(body: &[u8]) -> Result<ConvertRequest, ConversionError> {
    let invalid = |e: serde_json::Error| ConversionError::InvalidRequest(format!("Could not read request body: {e}"));
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ConvertRequest::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(invalid)?;
    if value.is_null() {
        return Ok(ConvertRequest::default());
    }
    if !value.is_object() {
        return Err(ConversionError::InvalidRequest("Request body must be a JSON object.".to_string()));
    }
    serde_json::from_value(value).map_err(invalid)
}
