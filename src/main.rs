use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    collections::{HashMap, HashSet},
    fs, io,
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

/// Road-camera station map for the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to the temp dir (kelitui-debug.log)
    #[arg(short, long)]
    debug: bool,

    /// Enable vim keybindings (hjkl)
    #[arg(long)]
    vim: bool,

    /// Path to config file (default: platform-specific, see docs)
    #[arg(short, long)]
    config: Option<String>,

    /// Open a shared station link on startup (e.g. "/?id=C01503&name=Oulu")
    #[arg(short, long)]
    open: Option<String>,
}

mod app;
mod handlers;
mod services;
mod ui;

use kelitui::api::KeliClient;
use kelitui::config::Config;
use kelitui::logic::map::GeoPoint;
use kelitui::prefs::PreferenceStore;
use kelitui::route::Route;
use kelitui::session::{Session, SessionOptions};

/// Interval at which bookmark writes from other instances are picked up
const BOOKMARK_SYNC_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct ImageMetadata {
    pub dimensions: Option<(u32, u32)>,
    pub format: Option<String>,
    pub file_size: u64,
}

pub enum ImagePreviewState {
    Loading,
    Ready {
        protocol: ratatui_image::protocol::StatefulProtocol,
        metadata: ImageMetadata,
    },
    Failed {
        metadata: ImageMetadata,
    },
}

impl std::fmt::Debug for ImagePreviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImagePreviewState::Loading => write!(f, "ImagePreviewState::Loading"),
            ImagePreviewState::Ready { metadata, .. } => f
                .debug_struct("ImagePreviewState::Ready")
                .field("metadata", metadata)
                .field("protocol", &"<StatefulProtocol>")
                .finish(),
            ImagePreviewState::Failed { metadata } => f
                .debug_struct("ImagePreviewState::Failed")
                .field("metadata", metadata)
                .finish(),
        }
    }
}

/// Camera image slot: (camera id, thumbnail)
pub type ImageKey = (String, bool);

/// Decoded image travelling back from a background task
pub struct ImageUpdate {
    pub station_id: String,
    pub generation: u64,
    pub key: ImageKey,
    pub state: ImagePreviewState,
}

pub struct App {
    pub session: Session,

    api_tx: mpsc::UnboundedSender<services::api::ApiRequest>,
    api_rx: mpsc::UnboundedReceiver<services::api::ApiResponse>,
    location_rx: mpsc::UnboundedReceiver<Option<GeoPoint>>,
    clipboard_tx: mpsc::UnboundedSender<Result<(), String>>,
    clipboard_rx: mpsc::UnboundedReceiver<Result<(), String>>,
    image_picker: Option<ratatui_image::picker::Picker>,
    image_update_tx: mpsc::UnboundedSender<ImageUpdate>,
    image_update_rx: mpsc::UnboundedReceiver<ImageUpdate>,

    clipboard_command: Option<String>,
    last_bookmark_sync: Instant,

    /// Images of the open modal, tagged with the modal generation they belong to
    pub image_states: HashMap<ImageKey, (u64, ImagePreviewState)>,
    /// (generation, camera id, thumbnail) of loads not yet applied
    images_in_flight: HashSet<(u64, String, bool)>,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let client = KeliClient::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        tracing::info!("Using station API at {}", client.base_url());

        // Spawn API service worker
        let (api_tx, api_rx) = services::api::spawn_api_service(client);

        // Device position (configured or looked up, 3 s at most)
        let location_rx = services::location::spawn_location_lookup(&config);

        let (clipboard_tx, clipboard_rx) = mpsc::unbounded_channel();
        let (image_update_tx, image_update_rx) = mpsc::unbounded_channel();

        let store = match &config.preferences_path {
            Some(path) => PreferenceStore::open(path)?,
            None => PreferenceStore::open_default()?,
        };
        if !store.is_persistent() {
            tracing::warn!("Preferences will not survive a restart");
        }

        let (image_picker, image_font_size) = if config.image_preview_enabled {
            let picker = app::images::create_picker(&config.image_protocol);
            let font_size = picker.font_size();
            tracing::debug!("Image font size: {}x{}", font_size.0, font_size.1);
            (Some(picker), Some(font_size))
        } else {
            tracing::debug!("Image preview disabled in config");
            (None, None)
        };

        let mut session = Session::new(
            Rc::new(store),
            SessionOptions {
                vim_mode: config.vim_mode,
                cluster: config.cluster_config(),
                share_base: config.share_base().to_string(),
            },
        );
        session.model.ui.image_font_size = image_font_size;

        let mut app = App {
            session,
            api_tx,
            api_rx,
            location_rx,
            clipboard_tx,
            clipboard_rx,
            image_picker,
            image_update_tx,
            image_update_rx,
            clipboard_command: config.clipboard_command,
            last_bookmark_sync: Instant::now(),
            image_states: HashMap::new(),
            images_in_flight: HashSet::new(),
        };

        let cmds = app.session.start();
        app.dispatch(cmds);

        Ok(app)
    }

    /// Open a shared link (path, query string or full URL)
    fn open_link(&mut self, link: &str) {
        let route = Route::parse(link);
        tracing::info!("Opening {:?}", route);
        let cmds = self.session.navigate(route);
        self.dispatch(cmds);
    }
}

/// Determine the config file path with fallback logic.
///
/// Returns `None` when no file exists in the default locations; the built-in
/// defaults are used then.
fn get_config_path(cli_path: Option<String>) -> Result<Option<PathBuf>> {
    // If CLI argument provided, use it
    if let Some(path) = cli_path {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(Some(p));
        } else {
            anyhow::bail!("Config file not found at specified path: {}", path);
        }
    }

    // Try ~/.config/kelitui/config.yaml
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("kelitui").join("config.yaml");
        if config_path.exists() {
            return Ok(Some(config_path));
        }
    }

    // Fallback to ./config.yaml
    let local_config = PathBuf::from("config.yaml");
    if local_config.exists() {
        return Ok(Some(local_config));
    }

    Ok(None)
}

fn init_logging(debug: bool) -> Result<()> {
    if !debug {
        return Ok(());
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(kelitui::utils::get_debug_log_path())?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    init_logging(args.debug)?;
    tracing::debug!("Debug mode enabled");

    // Load configuration
    let mut config = match get_config_path(args.config)? {
        Some(path) => {
            tracing::debug!("Loading config from: {:?}", path);
            Config::from_yaml(&fs::read_to_string(&path)?)?
        }
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    // Override config with CLI flags
    if args.vim {
        config.vim_mode = true;
    }

    // Initialize app
    let mut app = App::new(config)?;
    if let Some(link) = args.open.as_deref() {
        app.open_link(link);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app with error handler
    let result = run_app(&mut terminal, &mut app).await;

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Return result after cleanup
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Clear terminal to remove sixel graphics if needed (brief flash but necessary)
        if app.session.model.ui.sixel_cleanup_frames > 0 {
            terminal.clear()?;
            app.session.model.ui.sixel_cleanup_frames = 0;
        }

        // Always render (Elm Architecture approach)
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if app.session.model.ui.should_dismiss_toast() {
            app.session.model.ui.dismiss_toast();
        }

        if app.session.model.ui.should_quit {
            break;
        }

        app.session.tick(Instant::now());

        if app.last_bookmark_sync.elapsed() >= BOOKMARK_SYNC_INTERVAL {
            app.session.sync_bookmarks();
            app.last_bookmark_sync = Instant::now();
        }

        // Process API responses (non-blocking)
        while let Ok(response) = app.api_rx.try_recv() {
            handlers::handle_api_response(app, response);
        }

        // Process decoded images from background tasks (non-blocking)
        while let Ok(update) = app.image_update_rx.try_recv() {
            app.apply_image_update(update);
        }

        while let Ok(result) = app.clipboard_rx.try_recv() {
            app.session.copy_finished(result, Instant::now());
        }

        while let Ok(position) = app.location_rx.try_recv() {
            app.session.location_resolved(position);
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                handlers::handle_key(app, key)?;
            }
        }
    }

    Ok(())
}
