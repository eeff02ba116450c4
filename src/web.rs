use std::sync::{Mutex, MutexGuard};

use actix_files::Files;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::availability::{CellKey, MockSchedule};
use crate::cell::{AnchorRect, CellEvent, Geometry, Viewport};
use crate::error::ViewerError;
use crate::export::export_groups_to_csv;
use crate::filter::{validate_filters, FilterRequest, FilterState};
use crate::viewer::Viewer;

const SETTINGS_KEY: &str = "view";

/// Shared in-memory state (one data set and one interaction state per cell)
pub struct AppState {
    pub viewer: Mutex<Viewer<MockSchedule>>,
    pub rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(viewer: Viewer<MockSchedule>, rng: StdRng) -> Self {
        AppState {
            viewer: Mutex::new(viewer),
            rng: Mutex::new(rng),
        }
    }
}

/// Per-browser view settings, kept in the session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSettings {
    pub filters: FilterState,
    pub transposed: bool,
}

#[derive(Serialize)]
pub struct FiltersResponse {
    filters: FilterRequest,
    transposed: bool,
}

/// Body of a pointer event; leave/close need no fields
#[derive(Debug, Default, Deserialize)]
pub struct CellEventRequest {
    group: Option<usize>,
    anchor: Option<AnchorRect>,
    viewport: Option<Viewport>,
}

impl CellEventRequest {
    fn into_event(self, name: &str) -> Result<CellEvent, ViewerError> {
        let targeted = || match (self.group, self.anchor, self.viewport) {
            (Some(group), Some(anchor), Some(viewport)) => Ok((group, Geometry { anchor, viewport })),
            _ => Err(ViewerError::MissingGeometry(name.to_string())),
        };
        match name {
            "enter" => {
                let (group, geometry) = targeted()?;
                Ok(CellEvent::PointerEnter { group, geometry })
            }
            "click" => {
                let (group, geometry) = targeted()?;
                Ok(CellEvent::Click { group, geometry })
            }
            "leave" => Ok(CellEvent::PointerLeave),
            "close" => Ok(CellEvent::Close),
            other => Err(ViewerError::UnknownEvent(other.to_string())),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("state lock poisoned"))
}

fn load_settings(session: &Session, state: &AppState) -> Result<ViewSettings> {
    if let Some(settings) = session.get::<ViewSettings>(SETTINGS_KEY)? {
        return Ok(settings);
    }
    let viewer = lock(&state.viewer)?;
    Ok(ViewSettings {
        filters: FilterState::for_source(viewer.source()),
        transposed: false,
    })
}

// Grid endpoint
async fn get_grid(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let settings = load_settings(&session, &state)?;
    let grid = lock(&state.viewer)?.grid(&settings.filters, settings.transposed)?;
    Ok(HttpResponse::Ok().json(grid))
}

async fn get_filters(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let settings = load_settings(&session, &state)?;
    Ok(HttpResponse::Ok().json(FiltersResponse {
        filters: FilterRequest::from(&settings.filters),
        transposed: settings.transposed,
    }))
}

// Filter form "apply" endpoint
async fn apply_filters(
    req: web::Json<FilterRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let filters = validate_filters(&req)?;
    let mut settings = load_settings(&session, &state)?;
    settings.filters = filters;
    session.insert(SETTINGS_KEY, &settings)?;
    info!(filters = ?settings.filters, "applied filters");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "filters": FilterRequest::from(&settings.filters),
    })))
}

async fn toggle_transpose(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut settings = load_settings(&session, &state)?;
    settings.transposed = !settings.transposed;
    session.insert(SETTINGS_KEY, &settings)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "transposed": settings.transposed })))
}

// Pointer events forwarded from one cell of the page
async fn cell_event(
    path: web::Path<(String, String, String)>,
    body: web::Json<CellEventRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (room, date, event_name) = path.into_inner();
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ViewerError::UnknownCell { room: room.clone(), date: date.clone() })?;
    let event = body.into_inner().into_event(&event_name)?;

    let key = CellKey::new(room, date);
    let view = lock(&state.viewer)?.handle(&key, event)?;
    Ok(HttpResponse::Ok().json(view))
}

async fn regenerate(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut rng = lock(&state.rng)?;
    let version = lock(&state.viewer)?.regenerate(&mut *rng);
    info!(version, "regenerated availability data");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "version": version })))
}

async fn export_csv(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let settings = load_settings(&session, &state)?;
    let mut viewer = lock(&state.viewer)?;
    let layout = viewer.visible(&settings.filters, settings.transposed);

    let mut body = Vec::new();
    export_groups_to_csv(&mut *viewer, &layout, &mut body)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(("Content-Disposition", "attachment; filename=\"availability.csv\""))
        .body(body))
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Routes shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/grid", web::get().to(get_grid))
        .route("/api/filters", web::get().to(get_filters))
        .route("/api/filters", web::post().to(apply_filters))
        .route("/api/transpose", web::post().to(toggle_transpose))
        .route("/api/regenerate", web::post().to(regenerate))
        .route("/api/export.csv", web::get().to(export_csv))
        .service(web::resource("/api/cell/{room}/{date}/{event}").route(web::post().to(cell_event)));
}

pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

pub async fn start_server(bind: &str, port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);
    let key = Key::generate();

    info!(%bind, port, "starting web server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(configure)
    })
    .bind((bind, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::TooltipSize;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rand::SeedableRng;

    fn app_state() -> web::Data<AppState> {
        app_state_with_days(14)
    }

    fn app_state_with_days(days: u32) -> web::Data<AppState> {
        let first = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let source = MockSchedule::generate(first, days, &mut rng);
        web::Data::new(AppState::new(Viewer::new(source, TooltipSize::default()), rng))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .wrap(session_middleware(Key::generate()))
                    .configure(configure),
            )
            .await
        };
    }

    fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
        resp.response()
            .cookies()
            .find(|c| c.name() == "id")
            .map(|c| c.into_owned())
            .expect("session cookie")
    }

    fn geometry_body(group: usize) -> serde_json::Value {
        geometry_body_at(group, 700.0)
    }

    fn geometry_body_at(group: usize, top: f64) -> serde_json::Value {
        serde_json::json!({
            "group": group,
            "anchor": { "top": top, "bottom": top + 50.0, "left": 50.0, "right": 310.0 },
            "viewport": { "width": 1000.0, "height": 800.0 },
        })
    }

    #[actix_web::test]
    async fn grid_defaults_to_every_room_and_date() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/grid").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["layout"]["corner_label"], "Room / Date");
        assert_eq!(body["layout"]["rows"].as_array().unwrap().len(), 5);
        assert_eq!(body["cells"].as_array().unwrap().len(), 5 * 14);
        assert_eq!(body["legend"][1]["class"], "timeslot-group-reserved-others");
    }

    #[actix_web::test]
    async fn long_data_sets_default_to_two_weeks() {
        let state = app_state_with_days(60);
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/grid").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["cells"].as_array().unwrap().len(), 5 * 14);

        let req = test::TestRequest::get().uri("/api/filters").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["filters"]["start_date"], "2024-04-01");
        assert_eq!(body["filters"]["end_date"], "2024-04-14");
    }

    #[actix_web::test]
    async fn filters_and_transpose_stick_to_the_session() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/filters")
            .set_json(serde_json::json!({
                "start_date": "2024-04-01",
                "end_date": "2024-04-07",
                "weekdays": [1, 2, 3, 4, 5],
                "reservable_only": true,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = session_cookie(&resp);

        let req = test::TestRequest::post()
            .uri("/api/transpose")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = session_cookie(&resp);

        let req = test::TestRequest::get().uri("/api/grid").cookie(cookie).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["layout"]["transposed"], true);
        // Mon..Fri of the first week as rows, three bookable rooms as columns
        assert_eq!(body["layout"]["rows"].as_array().unwrap().len(), 5);
        assert_eq!(body["layout"]["column_headers"], serde_json::json!(["Room 1", "Room 3", "Room 4"]));
    }

    #[actix_web::test]
    async fn long_ranges_are_rejected() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/filters")
            .set_json(serde_json::json!({ "start_date": "2024-04-01", "end_date": "2024-06-01" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Cannot show more than 50 days at once (requested 61)");
    }

    #[actix_web::test]
    async fn click_pins_and_close_dismisses() {
        let state = app_state();
        let app = app!(state);
        let base = "/api/cell/Room%201/2024-04-01";

        let req = test::TestRequest::post()
            .uri(&format!("{}/click", base))
            .set_json(geometry_body(0))
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["room"], "Room 1");
        assert_eq!(view["segments"][0]["active"], true);
        assert_eq!(view["panel"]["dismissable"], true);
        assert_eq!(view["panel"]["position"], serde_json::json!({ "top": 512.0, "left": 50.0 }));

        let req = test::TestRequest::post()
            .uri(&format!("{}/leave", base))
            .set_json(serde_json::json!({}))
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["panel"]["dismissable"], true);

        let req = test::TestRequest::post()
            .uri(&format!("{}/close", base))
            .set_json(serde_json::json!({}))
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(view["panel"].is_null());
    }

    #[actix_web::test]
    async fn hover_shows_a_panel_without_close_button() {
        let state = app_state();
        let app = app!(state);
        let base = "/api/cell/Room%201/2024-04-01";

        let req = test::TestRequest::post()
            .uri(&format!("{}/enter", base))
            .set_json(geometry_body_at(0, 100.0))
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["segments"][0]["active"], true);
        assert_eq!(view["panel"]["dismissable"], false);
        assert_eq!(view["panel"]["position"], serde_json::json!({ "top": 158.0, "left": 50.0 }));

        let req = test::TestRequest::post()
            .uri(&format!("{}/leave", base))
            .set_json(serde_json::json!({}))
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(view["panel"].is_null());
    }

    #[actix_web::test]
    async fn enter_moves_a_pinned_panel() {
        let state = app_state();
        let app = app!(state);
        let base = "/api/cell/Room%203/2024-04-03";

        let req = test::TestRequest::post()
            .uri(&format!("{}/click", base))
            .set_json(geometry_body(0))
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["panel"]["position"], serde_json::json!({ "top": 512.0, "left": 50.0 }));

        // The cell scrolled up before the pointer came back
        let req = test::TestRequest::post()
            .uri(&format!("{}/enter", base))
            .set_json(geometry_body_at(0, 100.0))
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["panel"]["dismissable"], true);
        assert_eq!(view["panel"]["position"], serde_json::json!({ "top": 158.0, "left": 50.0 }));
    }

    #[actix_web::test]
    async fn bad_cell_requests() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/cell/Room%209/2024-04-01/click")
            .set_json(geometry_body(0))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/cell/Room%201/2024-04-01/wiggle")
            .set_json(serde_json::json!({}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/cell/Room%201/2024-04-01/enter")
            .set_json(serde_json::json!({ "group": 0 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn regenerate_resets_pinned_panels() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/cell/Room%202/2024-04-02/click")
            .set_json(geometry_body(0))
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(!view["panel"].is_null());

        let req = test::TestRequest::post().uri("/api/regenerate").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["version"], 2);

        let key = CellKey::new("Room 2", NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
        let view = state.viewer.lock().unwrap().cell_view(&key).unwrap();
        assert!(view.panel.is_none());
    }

    #[actix_web::test]
    async fn export_is_csv() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/export.csv").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.starts_with("room,date,start_time"));
    }
}
