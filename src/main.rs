// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod config;
mod driver;
mod error;
mod frame;
mod logging;
mod nav;
mod overlay;
mod page;
mod palette;
mod rain;
mod runtime;
mod surface;
mod terminal;
mod view;

#[cfg(unix)]
use std::thread;
use std::time::Duration;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyEventKind};
use tracing::{debug, info};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::charset::{charset_from_str, parse_user_ranges, GlyphSet};
use crate::config::{color_enabled_stdout, print_list_charsets, terminal_is_utf8, Args};
use crate::config::{RainConfig, RainParams};
use crate::driver::{FrameDriver, PendingResize, SystemClock};
use crate::error::{ConfigError, Result};
use crate::frame::Frame;
use crate::nav::{default_bindings, NavBar};
use crate::overlay::{PanelTexts, Theme};
use crate::page::{Action, Page};
use crate::rain::RainRenderer;
use crate::runtime::ColorMode;
use crate::terminal::{restore_terminal_best_effort, Terminal};
use crate::view::ViewController;

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

const KEYS_HELP: &str = "\
KEYS:
  1-4 / click     show a panel
  Tab, Shift-Tab  next / previous panel
  p               pause the rain
  q, Esc          quit";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

/// Everything validated from the command line before the terminal is touched.
struct Setup {
    config: RainConfig,
    params: RainParams,
    fps: f64,
    duration: Option<f64>,
    color_mode: ColorMode,
    glyphs: GlyphSet,
    page: Page,
    seed: u64,
}

fn prepare(args: &Args) -> std::result::Result<Setup, ConfigError> {
    let config = args.rain_config()?;
    let params = args.rain_params()?;
    let fps = args.fps()?;
    let duration = args.duration_secs()?;
    let color_mode = args.color_mode()?;

    let user_ranges = match &args.chars {
        Some(ranges) => parse_user_ranges(ranges)?,
        None => Vec::new(),
    };
    let charset = charset_from_str(&args.charset, terminal_is_utf8())?;
    let glyphs = GlyphSet::new(charset, &user_ranges);

    let view = ViewController::new(args.panels.as_slice(), &args.default_panel)?;
    let nav = NavBar::new(&default_bindings(&view), &view)?;
    let texts = PanelTexts::new(&view, &args.content)?;
    let page = Page::new(
        view,
        nav,
        texts,
        Theme::new(config.background, config.glyph),
        !args.no_border,
    );

    Ok(Setup {
        config,
        params,
        fps,
        duration,
        color_mode,
        glyphs,
        page,
        seed: args.seed.unwrap_or_else(rand::random),
    })
}

fn refresh_overlay(rain: &mut RainRenderer<Frame>, page: &Page) {
    let frame = rain.surface_mut();
    let (cols, lines) = (frame.width, frame.height);
    frame.set_overlay(page.overlay(cols, lines));
    debug!(
        panel = %page.view.active(),
        visible = ?page.view.visibility().as_flags(),
        "overlay refreshed"
    );
}

fn run(setup: Setup) -> Result<()> {
    let Setup {
        config,
        params,
        fps,
        duration,
        color_mode,
        glyphs,
        mut page,
        seed,
    } = setup;

    info!(
        seed,
        fps,
        color_mode = color_mode.label(),
        background = %config.background,
        glyph = %config.glyph,
        glyphs = glyphs.len(),
        "starting"
    );

    let mut term = Terminal::new(color_mode)?;
    let (cols, rows) = term.size()?;
    let cell = config.cell_size;
    let (px_w, px_h) = Frame::pixel_size(cols, rows, cell);
    let frame = Frame::new(cols, rows, cell, config.background);
    let mut rain = RainRenderer::initialize(frame, px_w, px_h, config, params, glyphs, seed)?;

    page.layout(cols);
    refresh_overlay(&mut rain, &page);

    let mut driver = FrameDriver::new(SystemClock, fps);
    debug!(period = ?driver.period(), "frame driver ready");
    let end_time = duration.map(|s| driver.now() + Duration::from_secs_f64(s));

    let mut pending_resize = PendingResize::default();
    let mut overlay_stale = false;
    let mut paused = false;
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| driver.now() >= end) {
            break;
        }

        loop {
            while Terminal::poll_event(Duration::ZERO)? {
                let action = match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize.push(nw, nh);
                        Action::Ignore
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => page.handle_key(k),
                    Event::Mouse(m) => page.handle_mouse(m),
                    _ => Action::Ignore,
                };
                match action {
                    Action::Quit => running = false,
                    Action::TogglePause => {
                        paused = !paused;
                        debug!(paused, "pause toggled");
                    }
                    Action::Redraw => overlay_stale = true,
                    Action::Ignore => {}
                }
            }

            if !running || pending_resize.is_pending() || overlay_stale {
                break;
            }

            let mut timeout = driver.until_next_frame();
            if let Some(end) = end_time {
                timeout = timeout.min(end.saturating_duration_since(driver.now()));
            }
            if timeout.is_zero() {
                break;
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize.take() {
            let (px_w, px_h) = Frame::pixel_size(nw, nh, cell);
            rain.on_resize(px_w as i64, px_h as i64);
            page.layout(nw);
            overlay_stale = true;
            debug!(
                width = rain.width(),
                height = rain.height(),
                columns = rain.columns().len(),
                "terminal resized"
            );
        }

        if overlay_stale {
            refresh_overlay(&mut rain, &page);
            overlay_stale = false;
        }

        // Paused frames still take their slot so the loop keeps its pace.
        driver.run_frame(|| {
            if !paused {
                rain.tick();
                rain.render();
            }
        });

        if rain.surface().has_changes() {
            term.draw(rain.surface_mut())?;
        }
    }

    info!(
        frames = driver.frames(),
        ticks = rain.frame(),
        dropped = driver.dropped(),
        panel = %page.view.active(),
        "stopped"
    );
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    let mut cmd = Args::command()
        .styles(clap_styles())
        .help_template(help_template)
        .after_help(KEYS_HELP);
    cmd.build();
    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_charsets {
        print_list_charsets();
        return;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("BLUERAIN_BUILD"));
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return;
    }

    let setup = match prepare(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(args.log_file.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // The terminal is restored when `run` returns, so errors print cleanly.
    if let Err(e) = run(setup) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
