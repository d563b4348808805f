//! skywatch - current weather for a city or the device location

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use skywatch::action::Action;
use skywatch::api::WeatherClient;
use skywatch::components::{Component, WeatherScreen, WeatherScreenProps};
use skywatch::config::{
    DEFAULT_BASE_URL, DEFAULT_IP_LOCATE_URL, DEFAULT_TIMEOUT_SECS, LocationSource, RawSettings,
    Settings,
};
use skywatch::effect::{Effect, Services};
use skywatch::logging;
use skywatch::reducer::reducer;
use skywatch::state::{AppState, CLOCK_TICK_MS};
use tracing::info;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventKind, EventOutcome,
    RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Current weather in the terminal
#[derive(Parser, Debug)]
#[command(name = "skywatch")]
#[command(about = "Look up the current weather by city name or by your location")]
struct Args {
    /// OpenWeather API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Provider base URL
    #[arg(long, env = "OPENWEATHER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Source of the position for "Use My Location"
    #[arg(long, env = "SKYWATCH_GEOLOCATION", value_enum, default_value_t = LocationSource::Ip)]
    geolocation: LocationSource,

    /// Latitude for --geolocation fixed
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude for --geolocation fixed
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Endpoint for --geolocation ip (ip-api.com compatible)
    #[arg(long, default_value = DEFAULT_IP_LOCATE_URL)]
    ip_locate_url: String,

    /// HTTP timeout in seconds (minimum 1)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Append logs to this file (filtered by RUST_LOG)
    #[arg(long, env = "SKYWATCH_LOG")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn split(self) -> (RawSettings, DebugCliArgs) {
        let raw = RawSettings {
            api_key: self.api_key,
            base_url: self.base_url,
            geolocation: self.geolocation,
            lat: self.lat,
            lon: self.lon,
            ip_locate_url: self.ip_locate_url,
            timeout_secs: self.timeout_secs,
            log_file: self.log_file,
        };
        (raw, self.debug)
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let (raw, debug_args) = Args::parse().split();

    let settings = match Settings::resolve(raw) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    };

    if let Some(path) = &settings.log_file {
        logging::init_file_logging(path)?;
    }

    let http = settings
        .http_client()
        .map_err(|err| io::Error::other(format!("http client: {err}")))?;
    let services = Services {
        weather: WeatherClient::new(http.clone(), &settings.provider),
        geolocator: settings.geolocator(http),
    };
    let geolocation_supported = services.geolocator.is_supported();
    info!(
        base_url = %settings.provider.base_url,
        geolocation_supported,
        "starting"
    );

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(Local::now(), geolocation_supported))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, services, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    info!("bye");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    services: Services,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let screen = Rc::new(RefCell::new(WeatherScreen::new()));
    let render_screen = Rc::clone(&screen);

    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::ClockTick(Local::now())),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "clock",
                    Duration::from_millis(CLOCK_TICK_MS),
                    || Action::ClockTick(Local::now()),
                );
            },
            move |frame, area, state, render_ctx: RenderContext| {
                let props = WeatherScreenProps {
                    state,
                    is_focused: render_ctx.is_focused(),
                };
                render_screen.borrow_mut().render(frame, area, props);
            },
            move |event, state| -> EventOutcome<Action> { handle_event(&screen, event, state) },
            |action| matches!(action, Action::Quit),
            move |effect, ctx: &mut EffectContext<Action>| handle_effect(&services, effect, ctx),
        )
        .await
}

fn handle_event(
    screen: &RefCell<WeatherScreen>,
    event: &EventKind,
    state: &AppState,
) -> EventOutcome<Action> {
    if let EventKind::Resize(_, _) = event {
        return EventOutcome::ignored().with_render();
    }

    let props = WeatherScreenProps {
        state,
        is_focused: true,
    };
    let actions: Vec<_> = screen
        .borrow_mut()
        .handle_event(event, props)
        .into_iter()
        .collect();
    EventOutcome::from_actions(actions)
}

/// Every fetch shares one task key, so a new search aborts the one in flight.
fn handle_effect(services: &Services, effect: Effect, ctx: &mut EffectContext<Action>) {
    let services = services.clone();
    ctx.tasks()
        .spawn("weather", async move { services.run(effect).await });
}
