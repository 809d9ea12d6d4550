//! Note collection REST API: load, list, save and delete.
//!
//! The journal (`/api/journal`) and memory (`/api/memory`) scopes share these
//! handlers; the scope's [`Collection`] picks the backing store. Every
//! response is sent with `Cache-Control: no-store` so the store's own cache
//! stays the only caching layer.

use actix_web::{HttpResponse, Responder, http::header, middleware::DefaultHeaders, web};
use serde::{Deserialize, Serialize};

use crate::controllers::{AppState, Collection};
use crate::domain::{NoteEntry, NoteError};
use crate::journal;

#[derive(Debug, Deserialize)]
struct NoteQuery {
    #[serde(alias = "file")]
    key: Option<String>,
    list: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveNoteRequest {
    #[serde(alias = "fileName")]
    key: Option<String>,
    content: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ContentResponse {
    content: String,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    entries: Vec<NoteEntry>,
}

#[derive(Debug, Serialize)]
struct TodayResponse {
    key: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: message.to_string(),
    })
}

/// Maps a store error onto a status code. I/O failures are logged here and
/// reported to the client without filesystem details.
fn error_response(err: &NoteError, action: &str) -> HttpResponse {
    match err {
        NoteError::InvalidKey(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: err.to_string(),
        }),
        NoteError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "File not found".to_string(),
        }),
        NoteError::Read { .. } | NoteError::Write { .. } => {
            log::error!("Failed to {}: {}", action, err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to {action}"),
            })
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// GET: load one note (`?key=`) or list the collection (`?list=true`)
async fn read_note(
    data: web::Data<AppState>,
    collection: web::Data<Collection>,
    query: web::Query<NoteQuery>,
) -> impl Responder {
    let collection = *collection.get_ref();
    let store = data.store(collection);

    if query.list.as_deref() == Some("true") {
        return match store.list().await {
            Ok(listing) => {
                let entries = match collection {
                    Collection::Journal => journal::newest_first(&listing),
                    Collection::Memories => listing.to_vec(),
                };
                HttpResponse::Ok().json(ListResponse { entries })
            }
            Err(e) => error_response(&e, "list notes"),
        };
    }

    let Some(key) = non_blank(&query.key) else {
        return bad_request("Invalid request: key or list parameter required");
    };

    match store.load_note(key).await {
        Ok(content) => HttpResponse::Ok().json(ContentResponse { content }),
        Err(e) => error_response(&e, "read note"),
    }
}

/// POST: overwrite a note
async fn save_note(
    data: web::Data<AppState>,
    collection: web::Data<Collection>,
    body: web::Json<SaveNoteRequest>,
) -> impl Responder {
    let store = data.store(*collection.get_ref());

    let Some(key) = non_blank(&body.key) else {
        return bad_request("Note key is required");
    };
    let Some(serde_json::Value::String(content)) = &body.content else {
        return bad_request("Content must be a string");
    };

    match store.save_note(key, content).await {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse { success: true }),
        Err(e) => error_response(&e, "save note"),
    }
}

/// DELETE: remove a note
async fn delete_note(
    data: web::Data<AppState>,
    collection: web::Data<Collection>,
    query: web::Query<NoteQuery>,
) -> impl Responder {
    let store = data.store(*collection.get_ref());

    let Some(key) = non_blank(&query.key) else {
        return bad_request("Note key is required");
    };

    match store.delete_note(key).await {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse { success: true }),
        Err(e) => error_response(&e, "delete note"),
    }
}

/// GET: today's journal entry, created empty if it does not exist yet
async fn journal_today(data: web::Data<AppState>) -> impl Responder {
    let key = data.journal.key_for(&journal::today_key());

    match data.journal.load_note(&key).await {
        Ok(content) => HttpResponse::Ok().json(TodayResponse { key, content }),
        Err(e) => error_response(&e, "read today's entry"),
    }
}

fn collection_scope(path: &str, collection: Collection) -> actix_web::Scope {
    web::scope(path)
        .app_data(web::Data::new(collection))
        .route("", web::get().to(read_note))
        .route("", web::post().to(save_note))
        .route("", web::delete().to(delete_note))
}

fn no_store() -> DefaultHeaders {
    DefaultHeaders::new().add((header::CACHE_CONTROL, "no-store, must-revalidate"))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        collection_scope("/api/journal", Collection::Journal)
            .route("/today", web::get().to(journal_today))
            .wrap(no_store()),
    );
    cfg.service(collection_scope("/api/memory", Collection::Memories).wrap(no_store()));
}
