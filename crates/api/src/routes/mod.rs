//! Route definitions.

pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                              register (public)
/// /auth/login                                 login (public)
/// /auth/me                                    current user
///
/// /projects                                   list, create
/// /projects/{id}                              get, update, delete
/// /projects/{id}/pages                        list, create
/// /projects/{id}/pages/{page_id}              get, update (If-Match), delete
/// /projects/{id}/archetypes/{name}            apply (Idempotency-Key)
/// /projects/{id}/exports                      list, create (202)
///
/// /exports/{id}                               get, delete
/// /exports/{id}/download                      download archive
/// ```
pub fn api_routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me));

    let project_routes = Router::new()
        .route(
            "/",
            get(handlers::projects::list).post(handlers::projects::create),
        )
        .route(
            "/{id}",
            get(handlers::projects::get_by_id)
                .put(handlers::projects::update)
                .delete(handlers::projects::delete),
        )
        .route(
            "/{id}/pages",
            get(handlers::pages::list_by_project).post(handlers::pages::create),
        )
        .route(
            "/{id}/pages/{page_id}",
            get(handlers::pages::get_by_id)
                .put(handlers::pages::update)
                .delete(handlers::pages::delete),
        )
        .route(
            "/{id}/archetypes/{name}",
            post(handlers::archetypes::apply),
        )
        .route(
            "/{id}/exports",
            get(handlers::exports::list_by_project).post(handlers::exports::create),
        );

    let export_routes = Router::new()
        .route(
            "/{id}",
            get(handlers::exports::get_by_id).delete(handlers::exports::delete),
        )
        .route("/{id}/download", get(handlers::exports::download));

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/projects", project_routes)
        .nest("/exports", export_routes)
}
