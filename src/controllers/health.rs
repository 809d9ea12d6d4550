use actix_web::{HttpResponse, Responder, http::header, middleware::DefaultHeaders, web};

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/health")
            .wrap(DefaultHeaders::new().add((header::CACHE_CONTROL, "no-store, must-revalidate")))
            .route("", web::get().to(health_check)),
    );
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION
    }))
}
