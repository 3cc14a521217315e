use crate::services::aggregator::StatusAggregator;
use actix_web::{web, HttpResponse, Responder};
use log::info;

pub async fn api_status(aggregator: web::Data<StatusAggregator>) -> impl Responder {
    let report = aggregator.collect().await;
    HttpResponse::Ok().json(report)
}

/// Same payload as `/api/status`; kept for pages that ask for an explicit refresh.
pub async fn api_refresh(aggregator: web::Data<StatusAggregator>) -> impl Responder {
    info!("Refresh requested");
    let report = aggregator.collect().await;
    HttpResponse::Ok().json(report)
}
