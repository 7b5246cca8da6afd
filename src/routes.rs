// src/routes.rs

use axum::{
    Router,
    extract::Request,
    handler::HandlerWithoutStateExt,
    http::Method,
    middleware::{self, Next},
    routing::{delete, get, get_service, post, put},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    error::handle_panic,
    handlers::{admin, auth, pages, quiz, system},
    models::user::Role,
    state::AppState,
    utils::jwt::{auth_middleware, role_check},
};

/// Assembles the main application router.
///
/// * Page routes and the auth/system API are open.
/// * `/api/quizzes` is partly bearer-protected; `/api/admin` needs an admin bearer token.
/// * Unmatched paths fall through to the public directory, then 404 for any method.
/// * Applies global middleware (panic catcher, Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let public_dir = state.config.public_dir.clone();
    let index = ServeFile::new(public_dir.join("index.html"));
    let assets = ServeDir::new(public_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(system::not_found.into_service());

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/leaderboard", get(quiz::get_leaderboard))
        .route("/{id}", get(quiz::get_quiz))
        // Protected quiz routes
        .merge(
            Router::new()
                .route("/mine", get(quiz::my_submissions))
                .route("/{id}/submit", post(quiz::submit_quiz))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let admin_routes = Router::new()
        .route("/quizzes", post(admin::create_quiz))
        .route(
            "/quizzes/{id}",
            put(admin::update_quiz).delete(admin::delete_quiz),
        )
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/submissions", get(admin::list_submissions))
        // Auth runs first (outermost), then the role gate
        .layer(middleware::from_fn(|req: Request, next: Next| {
            role_check(Role::Admin, req, next)
        }))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_pages = Router::new()
        .route("/dashboard", get(pages::admin_dashboard))
        .route("/manageQuiz", get(pages::admin_manage_quiz))
        .route("/submissions", get(pages::admin_submissions))
        .route("/leaderboard", get(pages::admin_leaderboard))
        .route("/profile", get(pages::admin_profile));

    let employee_pages = Router::new()
        .route("/dashboard", get(pages::employee_dashboard))
        .route("/availableQuizzes", get(pages::available_quizzes))
        .route("/mySubmissions", get(pages::employee_submissions))
        .route("/leaderboard", get(pages::employee_leaderboard))
        .route("/profile", get(pages::employee_profile))
        .route("/attempt/{quiz_id}", get(pages::attempt_quiz));

    Router::new()
        .route("/", get_service(index))
        .route("/api/login", post(auth::login))
        .route("/api/signup", post(auth::signup))
        .route("/api/logout", post(system::logout))
        .route("/api/health", get(system::health))
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/admin", admin_routes)
        .nest("/admin", admin_pages)
        .nest("/employee", employee_pages)
        .fallback_service(assets)
        // Global Middleware (last layer is outermost)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
