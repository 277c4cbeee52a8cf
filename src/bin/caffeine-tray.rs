// Caffeine Tray App - tray icon with a start/stop toggle for the keep-awake loop

use anyhow::{Context, Result};
use caffeine::app_state::{CaffeineToggle, StatusView, ToggleState};
use caffeine::config_file::{Config, ConfigStore};
use caffeine::constants::{
    LABEL_QUIT, LABEL_RELOAD, NOTIFICATION_ERROR_TIMEOUT_MS, TRAY_TITLE, TRAY_TOOLTIP,
};
use caffeine::hotkeys::HotkeyManager;
use caffeine::input::EnigoBackend;
use caffeine::keep_awake::FatalHandler;
use caffeine::utils::logging::{self, LogTarget};
use global_hotkey::GlobalHotKeyEvent;
use log::{error, info, warn};
use std::sync::Arc;
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const AWAKE_PNG: &[u8] = include_bytes!("../../assets/awake.png");
const SLEEPY_PNG: &[u8] = include_bytes!("../../assets/sleepy.png");

enum UserEvent {
    Menu(MenuEvent),
    Hotkey(GlobalHotKeyEvent),
}

fn main() {
    let log_path = match logging::default_log_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = logging::init(LogTarget::File(&log_path)) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("Program started (Caffeine Tray App v{})", VERSION);

    if let Err(e) = run() {
        fail(e);
    }
}

fn run() -> Result<()> {
    let store = ConfigStore::standard()?;
    let config = store.open()?;

    let icons = Icons {
        awake: load_icon(AWAKE_PNG).context("Failed to load awake icon")?,
        sleepy: load_icon(SLEEPY_PNG).context("Failed to load sleepy icon")?,
    };

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

    // Forward tray and hotkey events into the event loop so that every
    // toggle runs on this one thread
    let proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::Menu(event));
    }));
    let proxy = event_loop.create_proxy();
    GlobalHotKeyEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::Hotkey(event));
    }));

    let mut pending = Some((store, config, icons));
    let mut app: Option<TrayApp> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            // The tray icon must be created once the loop is running
            Event::NewEvents(StartCause::Init) => {
                if let Some((store, config, icons)) = pending.take() {
                    match TrayApp::new(store, config, icons) {
                        Ok(created) => app = Some(created),
                        Err(e) => fail(e),
                    }
                }
            }
            Event::UserEvent(user_event) => {
                if let Some(app) = app.as_mut() {
                    if app.handle(user_event) == Flow::Quit {
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }
            Event::LoopDestroyed => {
                if let Some(app) = app.take() {
                    app.toggle.shutdown();
                }
                info!("Program closed");
            }
            _ => {}
        }
    })
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Icons {
    awake: Icon,
    sleepy: Icon,
}

/// Swaps the tray icon and the toggle label to match the loop state
struct TrayView {
    tray: TrayIcon,
    toggle_item: MenuItem,
    icons: Icons,
}

impl StatusView for TrayView {
    fn show_state(&self, state: ToggleState) {
        let icon = match state {
            ToggleState::Active => &self.icons.awake,
            ToggleState::Idle => &self.icons.sleepy,
        };

        if let Err(e) = self.tray.set_icon(Some(icon.clone())) {
            error!("Failed to update tray icon: {}", e);
        }
        self.toggle_item.set_text(state.menu_label());
    }
}

struct TrayApp {
    toggle: CaffeineToggle<TrayView>,
    store: ConfigStore,
    hotkeys: Option<HotkeyManager>,
    toggle_id: MenuId,
    reload_id: MenuId,
    quit_id: MenuId,
}

impl TrayApp {
    fn new(store: ConfigStore, config: Config, icons: Icons) -> Result<Self> {
        let toggle_item = MenuItem::new(ToggleState::Idle.menu_label(), true, None);
        let reload_item = MenuItem::new(LABEL_RELOAD, true, None);
        let separator = PredefinedMenuItem::separator();
        let quit_item = MenuItem::new(LABEL_QUIT, true, None);

        let menu = Menu::new();
        menu.append(&toggle_item).context("Failed to add toggle menu item")?;
        menu.append(&reload_item).context("Failed to add reload menu item")?;
        menu.append(&separator).context("Failed to add separator")?;
        menu.append(&quit_item).context("Failed to add quit menu item")?;

        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_title(TRAY_TITLE)
            .with_tooltip(TRAY_TOOLTIP)
            .with_icon(icons.sleepy.clone())
            .build()
            .context("Failed to create tray icon")?;

        let toggle_id = toggle_item.id().clone();
        let reload_id = reload_item.id().clone();
        let quit_id = quit_item.id().clone();

        let hotkey = config.hotkey.clone();
        let autostart = config.autostart;

        let view = TrayView {
            tray,
            toggle_item,
            icons,
        };
        let toggle = caffeine::build_toggle(
            config,
            Arc::new(EnigoBackend::new()),
            view,
            notify_and_exit(),
        )?;

        let hotkeys = match HotkeyManager::new() {
            Ok(mut manager) => {
                if let Err(e) = manager.set_toggle_hotkey(hotkey.as_deref()) {
                    warn!("Toggle hotkey disabled: {:#}", e);
                }
                Some(manager)
            }
            Err(e) => {
                warn!("Global hotkeys unavailable: {:#}", e);
                None
            }
        };

        if autostart {
            info!("Autostarting");
            toggle.start()?;
        }

        info!("Tray icon created, running event loop");

        Ok(Self {
            toggle,
            store,
            hotkeys,
            toggle_id,
            reload_id,
            quit_id,
        })
    }

    fn handle(&mut self, event: UserEvent) -> Flow {
        match event {
            UserEvent::Menu(event) => {
                if event.id == self.toggle_id {
                    self.toggle();
                } else if event.id == self.reload_id {
                    self.reload();
                } else if event.id == self.quit_id {
                    info!("Quit menu item clicked, exiting");
                    return Flow::Quit;
                }
            }
            UserEvent::Hotkey(event) => {
                let pressed = self
                    .hotkeys
                    .as_ref()
                    .is_some_and(|hotkeys| hotkeys.is_toggle_press(&event));
                if pressed {
                    info!("Toggle hotkey triggered");
                    self.toggle();
                }
            }
        }
        Flow::Continue
    }

    fn toggle(&self) {
        if let Err(e) = self.toggle.toggle() {
            fail(e);
        }
    }

    fn reload(&mut self) {
        info!("Reloading config from {}", self.store.path().display());
        let config = self.store.load();
        let hotkey = config.hotkey.clone();

        if let Err(e) = self.toggle.reload(config) {
            error!("Config reload rejected, keeping previous settings: {:#}", e);
            return;
        }

        if let Some(hotkeys) = self.hotkeys.as_mut() {
            if let Err(e) = hotkeys.set_toggle_hotkey(hotkey.as_deref()) {
                warn!("Toggle hotkey disabled: {:#}", e);
            }
        }
    }
}

/// Decode an embedded PNG into a tray icon
fn load_icon(bytes: &[u8]) -> Result<Icon> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .context("Failed to decode icon")?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height).context("Failed to create icon")
}

/// Fatal handler for the keep-awake worker
fn notify_and_exit() -> FatalHandler {
    Arc::new(|e: anyhow::Error| fail(e))
}

/// Log, show a desktop notification and exit with a failure status
fn fail(e: anyhow::Error) -> ! {
    error!("Fatal: {:#}", e);

    let _ = notify_rust::Notification::new()
        .summary("Caffeine stopped")
        .body(&format!("{:#}", e))
        .timeout(notify_rust::Timeout::Milliseconds(
            NOTIFICATION_ERROR_TIMEOUT_MS,
        ))
        .show();

    std::process::exit(1);
}
