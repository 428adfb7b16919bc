//! Command dispatch and provider aggregation.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use placebot_catalog::{Place, PlaceCatalog, ResolvedQuery, Resolver};
use placebot_routing::{Coordinates, RouteSummary, RoutingClient};
use placebot_store::{FeedbackClient, StoreError, MAX_FEEDBACK_LENGTH};
use placebot_weather::{Geocoder, WeatherError, WeatherProvider, WeatherSnapshot};

use crate::command::{CommandKind, IncomingCommand};
use crate::error::EngineError;
use crate::payload::ReplyPayload;
use crate::stats::StatsReporter;

const HELP_TEXT: &str = "I can help you pick a place to visit.\n\n\
Commands:\n\
/list - all known places\n\
/find <name or id> - search the catalog\n\
/random - a random place\n\
/weather [city] - current weather\n\
/route <name or id> - route to a place\n\
/plan <name or id> - weather plus route in one reply\n\
/feedback <message> - tell us what to improve\n\
/ping - check that I'm alive";

/// Engine construction settings, distilled from the application config.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Where routes start from
    pub origin: Coordinates,
    /// Display label for the origin
    pub origin_label: String,
    /// Bound applied to each provider call
    pub call_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            origin: Coordinates::new(59.9343, 30.3351),
            origin_label: "City center".to_string(),
            call_timeout: Duration::from_secs(7),
        }
    }
}

/// Orchestrates resolution, provider fan-out and reply assembly.
///
/// Every collaborator is injected at construction; the engine itself keeps
/// no per-request state, so one instance serves concurrent commands.
pub struct Engine {
    catalog: Arc<PlaceCatalog>,
    resolver: Resolver,
    weather: WeatherProvider,
    geocoder: Geocoder,
    routing: RoutingClient,
    store: FeedbackClient,
    stats: StatsReporter,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(
        catalog: Arc<PlaceCatalog>,
        weather: WeatherProvider,
        geocoder: Geocoder,
        routing: RoutingClient,
        store: FeedbackClient,
        settings: EngineSettings,
    ) -> Self {
        let resolver = Resolver::new(catalog.clone());
        let stats = StatsReporter::new(store.clone());
        Self {
            catalog,
            resolver,
            weather,
            geocoder,
            routing,
            store,
            stats,
            settings,
        }
    }

    /// Handle one normalized command from the transport.
    ///
    /// Successful dispatch bumps the usage counter best-effort: a failed
    /// increment is logged and never blocks the reply.
    pub async fn handle(&self, cmd: &IncomingCommand) -> Result<ReplyPayload, EngineError> {
        let reply = self.dispatch(cmd).await?;

        if let Err(e) = self.store.increment_usage(cmd.command.name()).await {
            tracing::warn!("Failed to record usage for /{}: {}", cmd.command.name(), e);
        }

        Ok(reply)
    }

    async fn dispatch(&self, cmd: &IncomingCommand) -> Result<ReplyPayload, EngineError> {
        match cmd.command {
            CommandKind::Start | CommandKind::Help => Ok(ReplyPayload::text(HELP_TEXT)),
            CommandKind::Ping => Ok(ReplyPayload::text("pong")),
            CommandKind::List => Ok(self.list()),
            CommandKind::Find => Ok(self.find(&cmd.args)),
            CommandKind::Random => Ok(self.random()),
            CommandKind::Weather => self.weather_report(&cmd.args).await,
            CommandKind::Route => self.route_to(&cmd.args).await,
            CommandKind::Plan => self.plan(&cmd.args).await,
            CommandKind::Feedback => self.feedback(cmd).await,
            CommandKind::Stats => self.stats_summary(cmd).await,
        }
    }

    fn list(&self) -> ReplyPayload {
        if self.catalog.is_empty() {
            return ReplyPayload::text("The catalog is empty.");
        }
        let mut lines = vec!["Known places:".to_string()];
        lines.extend(self.catalog.all().iter().map(|p| format!("{}. {}", p.id, p.name)));
        ReplyPayload::text(lines.join("\n"))
    }

    fn find(&self, args: &str) -> ReplyPayload {
        if args.trim().is_empty() {
            return ReplyPayload::text("Usage: /find <place name or id>");
        }
        match self.resolver.resolve(args) {
            ResolvedQuery::Unique(place) => {
                let mut text = place_card(&place);
                text.push_str(&format!("\n\nTry /route {0} or /plan {0}.", place.id));
                ReplyPayload::text(text)
            }
            ResolvedQuery::Ambiguous(candidates) => ambiguous_payload(candidates),
            ResolvedQuery::NotFound => not_found_payload(args),
        }
    }

    fn random(&self) -> ReplyPayload {
        match self.catalog.random() {
            Some(place) => ReplyPayload::text(format!("Random pick:\n{}", place_card(place))),
            None => ReplyPayload::text("The catalog is empty."),
        }
    }

    async fn weather_report(&self, args: &str) -> Result<ReplyPayload, EngineError> {
        let city = args.trim();
        let (label, coords) = if city.is_empty() {
            (self.settings.origin_label.clone(), self.settings.origin)
        } else {
            match timeout(self.settings.call_timeout, self.geocoder.lookup(city)).await {
                Ok(Ok(c)) => (c.name, Coordinates::new(c.latitude, c.longitude)),
                Ok(Err(WeatherError::CityNotFound(name))) => {
                    return Ok(ReplyPayload::text(format!(
                        "Could not find a city named \"{}\". Try the nearest larger city.",
                        name
                    )));
                }
                Ok(Err(e)) => {
                    tracing::warn!("Geocoding failed: {}", e);
                    return Err(EngineError::CommandFailed);
                }
                Err(_) => {
                    tracing::warn!("Geocoding timed out");
                    return Err(EngineError::CommandFailed);
                }
            }
        };

        match self
            .bounded("Weather", self.weather.current(coords.latitude, coords.longitude))
            .await
        {
            Some(snapshot) => {
                let text = format!("Weather in {}: {}", label, weather_line(&snapshot));
                Ok(ReplyPayload::text(text).with_weather(snapshot))
            }
            None => Err(EngineError::CommandFailed),
        }
    }

    async fn route_to(&self, args: &str) -> Result<ReplyPayload, EngineError> {
        let place = match self.resolve_place(args, CommandKind::Route) {
            Ok(place) => place,
            Err(reply) => return Ok(reply),
        };
        let destination = Coordinates::new(place.latitude, place.longitude);

        match self
            .bounded(
                "Routing",
                self.routing
                    .route(self.settings.origin, destination, place.address.as_deref()),
            )
            .await
        {
            Some(route) => {
                let text = route_block(&place, &self.settings.origin_label, &route);
                Ok(ReplyPayload::text(text).with_route(route))
            }
            None => Err(EngineError::CommandFailed),
        }
    }

    async fn plan(&self, args: &str) -> Result<ReplyPayload, EngineError> {
        let place = match self.resolve_place(args, CommandKind::Plan) {
            Ok(place) => place,
            Err(reply) => return Ok(reply),
        };
        let destination = Coordinates::new(place.latitude, place.longitude);

        // Both providers run concurrently. The reply waits for both to
        // complete or hit the timeout bound, then merges whatever succeeded;
        // a single failure degrades the reply instead of failing it.
        let (weather, route) = tokio::join!(
            self.bounded("Weather", self.weather.current(place.latitude, place.longitude)),
            self.bounded(
                "Routing",
                self.routing
                    .route(self.settings.origin, destination, place.address.as_deref()),
            ),
        );

        if weather.is_none() && route.is_none() {
            return Err(EngineError::CommandFailed);
        }

        let mut sections = vec![format!("Plan for {}:", place.name)];
        match &weather {
            Some(snapshot) => sections.push(format!("Weather at {}: {}", place.name, weather_line(snapshot))),
            None => sections.push("Weather is unavailable right now.".to_string()),
        }
        match &route {
            Some(route) => sections.push(route_block(&place, &self.settings.origin_label, route)),
            None => sections.push("Route is unavailable right now.".to_string()),
        }

        let mut payload = ReplyPayload::text(sections.join("\n\n"));
        if let Some(snapshot) = weather {
            payload = payload.with_weather(snapshot);
        }
        if let Some(route) = route {
            payload = payload.with_route(route);
        }
        Ok(payload)
    }

    async fn feedback(&self, cmd: &IncomingCommand) -> Result<ReplyPayload, EngineError> {
        let body = cmd.args.trim();
        if body.is_empty() {
            return Ok(ReplyPayload::text(
                "Send /feedback followed by your message, e.g. /feedback more parks please.",
            ));
        }

        match self.store.append_feedback(&cmd.caller_id, body).await {
            Ok(_) => Ok(ReplyPayload::text("Thank you! Your feedback has been recorded.")),
            Err(StoreError::Validation(_)) => Ok(ReplyPayload::text(format!(
                "That message is too long. Please keep it under {} characters.",
                MAX_FEEDBACK_LENGTH
            ))),
            Err(e) => {
                tracing::error!("Failed to record feedback: {}", e);
                Err(EngineError::Storage(e))
            }
        }
    }

    async fn stats_summary(&self, cmd: &IncomingCommand) -> Result<ReplyPayload, EngineError> {
        if !cmd.is_admin {
            tracing::info!("Denied /stats for caller {}", cmd.caller_id);
            return Err(EngineError::Unauthorized);
        }
        let text = self.stats.summary().await?;
        Ok(ReplyPayload::text(text))
    }

    /// Resolve argument text to a single place, or produce the reply that
    /// explains why resolution stopped. No provider is called until the
    /// query resolves uniquely.
    fn resolve_place(&self, args: &str, command: CommandKind) -> Result<Place, ReplyPayload> {
        if args.trim().is_empty() {
            return Err(ReplyPayload::text(format!(
                "Usage: /{} <place name or id>",
                command.name()
            )));
        }
        match self.resolver.resolve(args) {
            ResolvedQuery::Unique(place) => Ok(place),
            ResolvedQuery::Ambiguous(candidates) => Err(ambiguous_payload(candidates)),
            ResolvedQuery::NotFound => Err(not_found_payload(args)),
        }
    }

    /// Run a provider call under the configured timeout. A timeout is
    /// treated exactly like a provider-reported failure.
    async fn bounded<T, E: std::fmt::Display>(
        &self,
        provider: &str,
        fut: impl std::future::Future<Output = Result<T, E>>,
    ) -> Option<T> {
        match timeout(self.settings.call_timeout, fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!("{} provider failed: {}", provider, e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "{} provider timed out after {:?}",
                    provider,
                    self.settings.call_timeout
                );
                None
            }
        }
    }
}

fn place_card(place: &Place) -> String {
    let mut lines = vec![format!("{} (id {})", place.name, place.id)];
    if let Some(address) = &place.address {
        lines.push(format!("Address: {}", address));
    }
    if let Some(hours) = &place.hours {
        lines.push(format!("Hours: {}", hours));
    }
    if let Some(website) = &place.website {
        lines.push(format!("Website: {}", website));
    }
    lines.join("\n")
}

fn weather_line(snapshot: &WeatherSnapshot) -> String {
    format!("{:+.1} C, {}", snapshot.temperature_c, snapshot.condition.description())
}

fn route_block(place: &Place, origin_label: &str, route: &RouteSummary) -> String {
    format!(
        "Route from {} to {}: {:.1} km, about {} min.\nOpen the map: {}",
        origin_label,
        place.name,
        route.distance_km(),
        route.duration_minutes(),
        route.map_url
    )
}

fn ambiguous_payload(candidates: Vec<Place>) -> ReplyPayload {
    let mut lines = vec!["Did you mean one of these?".to_string()];
    lines.extend(candidates.iter().map(|p| format!("{}. {}", p.id, p.name)));
    lines.push(String::new());
    lines.push("Repeat the command with the exact id or name.".to_string());
    ReplyPayload::text(lines.join("\n")).with_suggestions(candidates)
}

fn not_found_payload(query: &str) -> ReplyPayload {
    ReplyPayload::text(format!(
        "Could not find a place matching \"{}\". Try /find with part of the name, or /list.",
        query.trim()
    ))
}
