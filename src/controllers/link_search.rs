use actix_web::{HttpResponse, Responder, http::header, middleware::DefaultHeaders, web};
use serde::Deserialize;

use crate::controllers::AppState;
use crate::search::{LinkSearch, SearchOptions};

#[derive(Debug, Deserialize)]
struct LinkSearchQuery {
    q: Option<String>,
}

/// Title search for wiki links. Returns a bare JSON array.
async fn link_search(
    data: web::Data<AppState>,
    query: web::Query<LinkSearchQuery>,
) -> impl Responder {
    let term = query.q.clone().unwrap_or_default();
    if term.trim().is_empty() {
        return HttpResponse::Ok().json(Vec::<()>::new());
    }

    let search = match LinkSearch::new(&data.vault, &data.search_dir) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Link search misconfigured: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to search pages"
            }));
        }
    };

    let result = web::block(move || search.search_with_options(&term, &SearchOptions::default())).await;

    match result {
        Ok(Ok(matches)) => HttpResponse::Ok().json(matches),
        Ok(Err(e)) => {
            log::error!("Link search failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to search pages"
            }))
        }
        Err(e) => {
            log::error!("Link search task failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to search pages"
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/link-search")
            .wrap(DefaultHeaders::new().add((header::CACHE_CONTROL, "no-store, must-revalidate")))
            .route("", web::get().to(link_search)),
    );
}
