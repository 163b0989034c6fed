use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::repository::CompanionRepository;
use super::service::CompanionService;
use crate::catalog::{
    DigitalId, DigitalIdVerification, NewsFilter, PoliceOverview, PriceQuote, RiskNewsItem,
    RouteOption, SoloService,
};
use crate::error::AppError;
use crate::flow::{
    ChatMessage, Companion, CompanionSnapshot, DashboardView, LoginForm, ProfileProgress,
    SignupForm, TripForm, TripPlan,
};
use crate::navigation::Screen;
use crate::notify::Notification;
use crate::session::{Identity, Language, SessionId};

type Service<R> = State<Arc<CompanionService<R>>>;
type Outcome<T> = Result<Json<ActionView<T>>, AppError>;

/// Session state returned by the session endpoints.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub snapshot: CompanionSnapshot,
}

/// Result of an operation plus the screen the traveler ended up on.
#[derive(Debug, Serialize)]
pub struct ActionView<T> {
    pub screen: Screen,
    pub result: T,
}

impl<T> ActionView<T> {
    fn of(companion: &Companion, result: T) -> Json<Self> {
        Json(Self {
            screen: companion.screen(),
            result,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NavigateRequest {
    screen: String,
}

#[derive(Debug, Deserialize)]
struct LanguageRequest {
    language: String,
}

#[derive(Debug, Deserialize)]
struct LocationRequest {
    location: String,
}

#[derive(Debug, Deserialize)]
struct DestinationRequest {
    destination: String,
}

#[derive(Debug, Deserialize)]
struct RouteChoiceRequest {
    choice: String,
}

#[derive(Debug, Deserialize)]
struct PriceRequest {
    item: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SoloModeRequest {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct DigitalIdSearch {
    digital_id: String,
}

/// Router exposing every companion operation under `/api/v1/sessions`.
pub fn companion_router<R>(service: Arc<CompanionService<R>>) -> Router
where
    R: CompanionRepository + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(create_handler::<R>))
        .route(
            "/api/v1/sessions/:id",
            get(session_handler::<R>).delete(discard_handler::<R>),
        )
        .route("/api/v1/sessions/:id/language", put(language_handler::<R>))
        .route("/api/v1/sessions/:id/location", put(location_handler::<R>))
        .route("/api/v1/sessions/:id/navigate", post(navigate_handler::<R>))
        .route(
            "/api/v1/sessions/:id/notifications",
            get(notifications_handler::<R>),
        )
        .route("/api/v1/sessions/:id/login", post(login_handler::<R>))
        .route("/api/v1/sessions/:id/signup", post(signup_handler::<R>))
        .route(
            "/api/v1/sessions/:id/profile/verify",
            post(verify_profile_handler::<R>),
        )
        .route(
            "/api/v1/sessions/:id/digital-id",
            post(digital_id_handler::<R>),
        )
        .route("/api/v1/sessions/:id/dashboard", get(dashboard_handler::<R>))
        .route("/api/v1/sessions/:id/sos", post(sos_handler::<R>))
        .route("/api/v1/sessions/:id/routes", post(routes_handler::<R>))
        .route(
            "/api/v1/sessions/:id/routes/select",
            post(select_route_handler::<R>),
        )
        .route("/api/v1/sessions/:id/news", get(news_handler::<R>))
        .route("/api/v1/sessions/:id/prices", post(price_handler::<R>))
        .route(
            "/api/v1/sessions/:id/chat",
            get(chat_history_handler::<R>).post(chat_handler::<R>),
        )
        .route("/api/v1/sessions/:id/solo", get(solo_handler::<R>))
        .route(
            "/api/v1/sessions/:id/solo-mode",
            post(solo_mode_handler::<R>),
        )
        .route("/api/v1/sessions/:id/police", get(police_handler::<R>))
        .route(
            "/api/v1/sessions/:id/police/search",
            post(police_search_handler::<R>),
        )
        .route("/api/v1/sessions/:id/trip", post(trip_handler::<R>))
        .with_state(service)
}

fn session_view(id: SessionId, companion: &Companion) -> Json<SessionView> {
    Json(SessionView {
        session_id: id,
        snapshot: companion.snapshot(),
    })
}

async fn create_handler<R>(
    State(service): Service<R>,
) -> Result<(StatusCode, Json<SessionView>), AppError>
where
    R: CompanionRepository + 'static,
{
    let (id, companion) = service.create()?;
    Ok((StatusCode::CREATED, session_view(id, &companion)))
}

async fn session_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    R: CompanionRepository + 'static,
{
    let id = SessionId(id);
    let companion = service.get(&id)?;
    Ok(session_view(id, &companion))
}

async fn discard_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    R: CompanionRepository + 'static,
{
    service.discard(&SessionId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn language_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<SessionView>, AppError>
where
    R: CompanionRepository + 'static,
{
    let id = SessionId(id);
    let companion = service.get(&id)?;
    let language: Language = request.language.parse()?;
    companion.set_language(language);
    Ok(session_view(id, &companion))
}

async fn location_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<SessionView>, AppError>
where
    R: CompanionRepository + 'static,
{
    let id = SessionId(id);
    let companion = service.get(&id)?;
    companion.set_location(request.location);
    Ok(session_view(id, &companion))
}

async fn navigate_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<NavigateRequest>,
) -> Outcome<Screen>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let to: Screen = request.screen.parse()?;
    let from = companion.navigate(to)?;
    Ok(ActionView::of(&companion, from))
}

async fn notifications_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Notification>>, AppError>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    Ok(Json(companion.drain_notifications()))
}

async fn login_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(form): Json<LoginForm>,
) -> Outcome<Identity>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let identity = companion.login(form).await?;
    Ok(ActionView::of(&companion, identity))
}

async fn signup_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(form): Json<SignupForm>,
) -> Outcome<Identity>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let identity = companion.signup(form).await?;
    Ok(ActionView::of(&companion, identity))
}

async fn verify_profile_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Outcome<ProfileProgress>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let progress = companion.verify_profile().await?;
    Ok(ActionView::of(&companion, progress))
}

async fn digital_id_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Outcome<DigitalId>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let card = companion.issue_digital_id().await?;
    Ok(ActionView::of(&companion, card))
}

async fn dashboard_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Result<Json<DashboardView>, AppError>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    Ok(Json(companion.dashboard()?))
}

async fn sos_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Outcome<Notification>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let alert = companion.trigger_sos()?;
    Ok(ActionView::of(&companion, alert))
}

async fn routes_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<DestinationRequest>,
) -> Outcome<Vec<RouteOption>>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let options = companion.calculate_routes(&request.destination).await?;
    Ok(ActionView::of(&companion, options))
}

async fn select_route_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<RouteChoiceRequest>,
) -> Outcome<RouteOption>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let route = companion.select_route(&request.choice).await?;
    Ok(ActionView::of(&companion, route))
}

async fn news_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Query(filter): Query<NewsFilter>,
) -> Result<Json<Vec<RiskNewsItem>>, AppError>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    Ok(Json(companion.risk_news(&filter)?))
}

async fn price_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<PriceRequest>,
) -> Outcome<PriceQuote>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let quote = companion.scan_price(&request.item).await?;
    Ok(ActionView::of(&companion, quote))
}

async fn chat_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Outcome<ChatMessage>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let reply = companion.send_chat(&request.message).await?;
    Ok(ActionView::of(&companion, reply))
}

async fn chat_history_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    Ok(Json(companion.chat_history()))
}

async fn solo_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SoloService>>, AppError>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    Ok(Json(companion.solo_services()?))
}

async fn solo_mode_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<SoloModeRequest>,
) -> Outcome<Vec<SoloService>>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let services = companion.set_solo_mode(request.enabled)?;
    Ok(ActionView::of(&companion, services))
}

async fn police_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
) -> Result<Json<PoliceOverview>, AppError>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    Ok(Json(companion.police_overview()?))
}

async fn police_search_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(request): Json<DigitalIdSearch>,
) -> Outcome<DigitalIdVerification>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let verification = companion.search_digital_id(&request.digital_id)?;
    Ok(ActionView::of(&companion, verification))
}

async fn trip_handler<R>(
    State(service): Service<R>,
    Path(id): Path<String>,
    Json(form): Json<TripForm>,
) -> Outcome<TripPlan>
where
    R: CompanionRepository + 'static,
{
    let companion = service.get(&SessionId(id))?;
    let plan = companion.plan_trip(form)?;
    Ok(ActionView::of(&companion, plan))
}
