use crate::app_state::{AppConfig, AppState};
use crate::error::PredictError;
use crate::io_struct::PredictionOutput;
use actix_web::{HttpRequest, HttpResponse, HttpServer, get, post, web};
use serde_json::json;

/// Liveness only: answers while the process runs, Ready or not.
#[get("/")]
pub async fn root(_req: HttpRequest, _: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "Waste Classifier API is running." }))
}

/// Readiness, as opposed to `/`: reports whether the model handle is
/// actually usable.
#[get("/health")]
pub async fn health(_req: HttpRequest, app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "model_ready": app_state.is_ready(),
    }))
}

/// One image per request, raw bytes body. Inference blocks the worker
/// for its duration; that is expected, no timeout is imposed here.
#[post("/predict")]
pub async fn predict(
    _req: HttpRequest,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, PredictError> {
    let prediction = app_state.predict(&body)?;
    Ok(HttpResponse::Ok().json(PredictionOutput::from(&prediction)))
}

pub async fn startup(config: AppConfig, app_state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(app_state);
    let max_body_bytes = config.max_body_bytes;

    println!("Starting server at {}:{}", config.host, config.port);

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::new(max_body_bytes))
            .service(root)
            .service(health)
            .service(predict)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    std::io::Result::Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ConstModel;
    use actix_web::{App, http::StatusCode, test};
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::io::Cursor;
    use std::sync::Arc;

    fn white_png() -> Vec<u8> {
        let img =
            DynamicImage::ImageRgb8(ImageBuffer::from_pixel(300, 300, Rgb([255u8, 255, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn ready_state(scores: Vec<f32>) -> AppState {
        AppState::with_model(Arc::new(ConstModel(scores)))
    }

    #[actix_web::test]
    async fn test_root_reports_running_even_when_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::unavailable()))
                .service(root),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_health_reports_model_readiness() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::unavailable()))
                .service(health),
        )
        .await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["model_ready"], false);
    }

    #[actix_web::test]
    async fn test_predict_without_model_is_503() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::unavailable()))
                .service(predict),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_payload(white_png())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_predict_bad_payload_is_400() {
        let state = ready_state(vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(predict),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_payload(&b"truncated garbage"[..])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());
    }

    #[actix_web::test]
    async fn test_predict_returns_label_and_confidence() {
        let state = ready_state(vec![0.1, 0.6, 0.1, 0.1, 0.1]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(predict),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_payload(white_png())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: PredictionOutput = test::read_body_json(resp).await;
        assert_eq!(body.prediction, "Cardboard");
        assert!((body.confidence - 60.0).abs() < 1e-3);
    }
}
