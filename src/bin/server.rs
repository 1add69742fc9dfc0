use std::io;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use jiff::Zoned;
use jiff::civil::Date;
use rotaserve::config::get_config;
use rotaserve::model::Doctor;
use rotaserve::slot::start_of_week;
use rotaserve::store::Store;
use rotaserve::views::{self, ViewError};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = get_config();
    let store = match &config.data_file {
        Some(path) => Store::from_file(path).unwrap(),
        None => Store::demo(start_of_week(Zoned::now().date())),
    };
    let store = Arc::new(store);

    let app = Router::new()
        .route("/api/doctors", get(list_doctors))
        .route("/api/doctors/{id}/day/{date}", get(day))
        .route("/api/doctors/{id}/week/{date}", get(week))
        .layer(CorsLayer::permissive())
        .with_state(store);

    tracing::info!(address = %config.bind_address, "listening");
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await
}

async fn list_doctors(State(store): State<Arc<Store>>) -> Json<Vec<Doctor>> {
    Json(store.doctors().to_vec())
}

async fn day(State(store): State<Arc<Store>>, Path((id, date)): Path<(String, String)>) -> Response {
    let Ok(date) = date.parse::<Date>() else {
        return (StatusCode::BAD_REQUEST, "invalid date").into_response();
    };
    let now = Zoned::now().datetime();
    schedule_response(views::day_schedule(&store, &id, date, now, &get_config().calendar))
}

async fn week(
    State(store): State<Arc<Store>>,
    Path((id, date)): Path<(String, String)>,
) -> Response {
    let Ok(date) = date.parse::<Date>() else {
        return (StatusCode::BAD_REQUEST, "invalid date").into_response();
    };
    let now = Zoned::now().datetime();
    schedule_response(views::week_schedule(&store, &id, date, now, &get_config().calendar))
}

fn schedule_response<T: serde::Serialize>(result: Result<T, ViewError>) -> Response {
    match result {
        Ok(schedule) => Json(schedule).into_response(),
        Err(err @ ViewError::UnknownDoctor(_)) => {
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        Err(err) => {
            tracing::error!(%err, "failed to assemble schedule");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
