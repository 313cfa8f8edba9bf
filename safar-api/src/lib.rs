use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod customers;
pub mod departures;
pub mod error;
pub mod finance;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    Router::new()
        .merge(departures::routes())
        .merge(bookings::routes())
        .merge(customers::routes())
        .merge(finance::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
