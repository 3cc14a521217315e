use crate::models::templates::BackgroundsTemplate;
use crate::services::backgrounds::ImageLibrary;
use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use log::{error, info};
use serde::Serialize;

#[derive(Serialize)]
struct BackgroundList {
    backgrounds: Vec<String>,
}

pub async fn api_backgrounds(library: web::Data<ImageLibrary>) -> impl Responder {
    let backgrounds = library.list().await;
    info!("/api/backgrounds: found {} files", backgrounds.len());
    HttpResponse::Ok().json(BackgroundList { backgrounds })
}

/// Bare directory listing, one link per image.
pub async fn list_backgrounds(library: web::Data<ImageLibrary>) -> impl Responder {
    let template = BackgroundsTemplate {
        files: library.list().await,
    };
    match template.render() {
        Ok(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
        Err(e) => {
            error!("Failed to render background listing: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn background_image(
    library: web::Data<ImageLibrary>,
    file: web::Path<String>,
) -> impl Responder {
    match library.read(&file).await {
        Some((bytes, content_type)) => HttpResponse::Ok().content_type(content_type).body(bytes),
        None => HttpResponse::NotFound().finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::routes;
    use actix_web::{
        http::StatusCode,
        middleware::{NormalizePath, TrailingSlash},
        test, App,
    };
    use std::path::Path;

    #[actix_web::test]
    async fn test_backgrounds_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let backgrounds = dir.path().join("backgrounds");
        std::fs::create_dir(&backgrounds).unwrap();
        std::fs::write(backgrounds.join("harbor.jpg"), b"jpeg").unwrap();
        std::fs::write(backgrounds.join("readme.md"), b"text").unwrap();

        let app = test::init_service(
            App::new()
                .wrap(NormalizePath::new(TrailingSlash::Trim))
                .app_data(web::Data::new(ImageLibrary::new(dir.path())))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/backgrounds").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({ "backgrounds": ["harbor.jpg"] }));

        let req = test::TestRequest::get().uri("/images/backgrounds/").to_request();
        let html = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains(r#"<a href="harbor.jpg">harbor.jpg</a>"#));
        assert!(!html.contains("readme.md"));

        let req = test::TestRequest::get().uri("/images/backgrounds/harbor.jpg").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "image/jpeg");

        let req = test::TestRequest::get().uri("/images/backgrounds/readme.md").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_missing_directory_lists_nothing() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ImageLibrary::new(Path::new("/definitely/not/here"))))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/backgrounds").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["backgrounds"], serde_json::json!([]));

        let req = test::TestRequest::get().uri("/images/backgrounds").to_request();
        let html = test::call_and_read_body(&app, req).await;
        assert!(String::from_utf8(html.to_vec()).unwrap().contains("No backgrounds found"));
    }
}
