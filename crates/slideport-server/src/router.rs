//! Router assembly for the slideport HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with CORS and
//! tracing middleware layers.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. Ids in paths are the opaque
/// registry ids (`pres-1`, `slide-3`, `shape-7`).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Application
        .route("/initialize", post(handlers::presentations::initialize))
        .route("/selection", get(handlers::presentations::get_selected_shapes))
        .route("/commands", post(handlers::commands::execute))
        // Presentations
        .route(
            "/presentations",
            get(handlers::presentations::list_presentations)
                .post(handlers::presentations::create_presentation),
        )
        .route(
            "/presentations/open",
            post(handlers::presentations::open_presentation),
        )
        .route(
            "/presentations/{id}",
            get(handlers::presentations::get_presentation_info),
        )
        .route(
            "/presentations/{id}/save",
            post(handlers::presentations::save_presentation),
        )
        .route(
            "/presentations/{id}/save-copy",
            post(handlers::presentations::save_copy),
        )
        .route(
            "/presentations/{id}/close",
            post(handlers::presentations::close_presentation),
        )
        .route(
            "/presentations/{id}/sections",
            get(handlers::presentations::get_presentation_sections),
        )
        // Slides
        .route(
            "/presentations/{id}/slides",
            get(handlers::slides::get_slides).post(handlers::slides::add_slide),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}",
            delete(handlers::slides::delete_slide),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/copy",
            post(handlers::slides::copy_slide),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/move",
            post(handlers::slides::move_slide),
        )
        // Text and shapes
        .route(
            "/presentations/{id}/slides/{slide_id}/text",
            get(handlers::shapes::get_slide_text),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/title",
            put(handlers::shapes::set_slide_title),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/shapes",
            get(handlers::shapes::list_all_shapes_in_slide).post(handlers::shapes::add_text_box),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/shapes/{shape_id}",
            get(handlers::shapes::get_shape_properties),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/shapes/{shape_id}/text",
            put(handlers::shapes::update_text),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/shapes/{shape_id}/font-size",
            put(handlers::shapes::set_text_font_size),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/shapes/{shape_id}/font-name",
            put(handlers::shapes::set_text_font_name),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/shapes/{shape_id}/position",
            put(handlers::shapes::set_shape_position),
        )
        .route(
            "/presentations/{id}/slides/{slide_id}/shapes/{shape_id}/copy",
            post(handlers::shapes::copy_shape),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
