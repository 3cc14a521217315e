use crate::models::{
    errors::SystemError,
    templates::{DashboardTemplate, MiniDashboardTemplate},
};
use crate::services::aggregator::StatusAggregator;
use actix_web::{http::header, web, HttpResponse, Responder};
use askama::Template;
use chrono::{Datelike, Local};
use log::{error, info};

pub async fn index(aggregator: web::Data<StatusAggregator>) -> impl Responder {
    let template = DashboardTemplate {
        report: aggregator.collect().await,
        current_year: Local::now().year(),
    };
    render(&template)
}

pub async fn mini(aggregator: web::Data<StatusAggregator>) -> impl Responder {
    let template = MiniDashboardTemplate {
        report: aggregator.collect().await,
    };
    render(&template)
}

/// Old bookmark path for the mini view.
pub async fn mini_legacy() -> impl Responder {
    HttpResponse::Found()
        .append_header((header::LOCATION, "/mini"))
        .finish()
}

fn render(template: &impl Template) -> HttpResponse {
    match template.render() {
        Ok(html) => {
            info!("Page rendered successfully");
            HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html)
        }
        Err(e) => {
            error!("{} ({})", SystemError::TemplateRenderFailed, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
