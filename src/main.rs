pub mod inference;
pub mod models;
pub mod scaler;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};

use inference::WineQualityModel;
use models::{ApiError, ApiMessage, HealthStatus, QualityResponse, WineSample};

async fn index() -> impl Responder {
    HttpResponse::Ok().json(ApiMessage {
        message: "Welcome to Wine Quality Detection API.".to_string(),
    })
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
    })
}

async fn model_info(model: web::Data<Arc<WineQualityModel>>) -> impl Responder {
    HttpResponse::Ok().json(model.info())
}

async fn quality_check(
    model: web::Data<Arc<WineQualityModel>>,
    req: web::Json<WineSample>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        error!("Rejected sample: {}", e);
        return HttpResponse::BadRequest().json(ApiError { error: e });
    }

    let sample = req.into_inner();
    let model_clone = model.clone();

    // Tree traversal is CPU work; keep it off the async workers.
    match web::block(move || model_clone.predict(&sample)).await {
        Ok(result) => match result {
            Ok(label) => {
                info!("Prediction: {:?}", label);
                HttpResponse::Ok().json(QualityResponse {
                    wine_quality: label,
                })
            }
            Err(e) => {
                error!("Prediction failed: {:#}", e);
                HttpResponse::InternalServerError().json(ApiError {
                    error: "prediction failed".to_string(),
                })
            }
        },
        Err(e) => {
            error!("Blocking task failed: {}", e);
            HttpResponse::InternalServerError().json(ApiError {
                error: "prediction failed".to_string(),
            })
        }
    }
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ApiError {
        error: "endpoint not found".to_string(),
    })
}

/// Rewrite JSON extractor failures (missing fields, wrong types, bad syntax)
/// into the service's error shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let detail = err.to_string();
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(ApiError { error: detail }),
            )
            .into()
        })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    info!("🚀 Starting Wine Quality Detection API");

    let model_path =
        std::env::var("MODEL_PATH").unwrap_or_else(|_| "models/classifier.onnx".to_string());
    let scaler_path =
        std::env::var("SCALER_PATH").unwrap_or_else(|_| "models/scaler.json".to_string());

    let model = match WineQualityModel::load(&model_path, &scaler_path) {
        Ok(model) => {
            info!("✅ Classifier and scaler artifacts loaded");
            Arc::new(model)
        }
        Err(e) => {
            error!("❌ {:#}", e);
            panic!("Unable to load model artifacts: {:#}", e);
        }
    };

    let model_data = web::Data::new(model);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let workers = std::env::var("WORKERS")
        .map(|w| w.parse().unwrap_or(num_cpus::get()))
        .unwrap_or_else(|_| num_cpus::get());

    let bind_address = format!("{}:{}", host, port);

    info!("🌐 Server listening on http://{}", bind_address);
    info!("Workers: {}", workers);
    info!("Endpoints:");
    info!("  GET  /            - welcome message");
    info!("  GET  /health      - liveness probe");
    info!("  GET  /model-info  - classifier metadata");
    info!("  POST /quality/    - wine quality prediction");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(model_data.clone())
            .app_data(json_config())
            .route("/", web::get().to(index))
            .route("/health", web::get().to(health))
            .route("/model-info", web::get().to(model_info))
            .route("/quality/", web::post().to(quality_check))
            .default_service(web::route().to(not_found))
    })
    .workers(workers)
    .bind(&bind_address)?
    .run()
    .await
}
