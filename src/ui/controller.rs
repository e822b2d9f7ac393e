// Launcher Controller - Bridges the Slint carousel window with the launcher
//
// This module contains the LauncherController which coordinates between:
// - Slint UI (MainWindow)
// - Carousel (selection and slide state)
// - RetroArch (launching the selected game)
//
// It handles:
// - Key callbacks -> carousel input, launch, quit
// - The fixed-rate frame timer (advance animation, push card positions)
// - Blocking game launches on the UI thread

use crate::carousel::{CardPlacement, Carousel};
use crate::models::{DisplayMode, LauncherConfig, RomEntry};
use crate::services::RetroArch;
use anyhow::{Context, Result};
use image::RgbaImage;
use slint::{ComponentHandle, Rgba8Pixel, SharedPixelBuffer, Timer, TimerMode};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

// Include the generated Slint code
slint::include_modules!();

/// Everything the frame loop reads and mutates.
struct CarouselView {
    carousel: Carousel,
    cards: Vec<slint::Image>,
    card_widths: Vec<u32>,
    names: Vec<String>,
    viewport_width: f32,
    last_frame: Instant,
}

impl CarouselView {
    /// Advance the slide by the time since the last frame and push the result to the UI.
    fn tick(&mut self, ui: &MainWindow) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.carousel.update(dt);
        self.apply(ui);
    }

    fn apply(&self, ui: &MainWindow) {
        let placements = self.carousel.placements();

        if let Some(current) = placements.first() {
            ui.set_current_card(self.cards[current.index].clone());
            ui.set_current_x(self.x_for(current));
        }

        match placements.get(1) {
            Some(incoming) => {
                ui.set_incoming_card(self.cards[incoming.index].clone());
                ui.set_incoming_x(self.x_for(incoming));
                ui.set_sliding(true);
            }
            None => ui.set_sliding(false),
        }

        if let Some(name) = self.names.get(self.carousel.selected_index()) {
            ui.set_game_name(name.as_str().into());
        }
    }

    fn x_for(&self, placement: &CardPlacement) -> f32 {
        card_x(self.viewport_width, self.card_widths[placement.index], placement.shift)
    }
}

/// Left edge of a card centred in the viewport, displaced by `shift`.
pub fn card_x(viewport_width: f32, card_width: u32, shift: f32) -> f32 {
    (viewport_width - card_width as f32) / 2.0 + shift
}

/// Carousel whose slides each travel the width of the card being left.
pub fn carousel_for_cards(cards: &[RgbaImage], speed: f32) -> Carousel {
    Carousel::with_card_widths(cards.iter().map(|card| card.width() as f32).collect(), speed)
}

/// Convert a decoded title card into a Slint image.
pub fn to_slint_image(img: &RgbaImage) -> slint::Image {
    let buffer =
        SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(img.as_raw(), img.width(), img.height());
    slint::Image::from_rgba8(buffer)
}

/// Controller that wires the Slint carousel window to the launcher.
///
/// Everything runs on the UI thread. Launching a game blocks the event loop until
/// RetroArch exits, which also pauses the frame timer.
///
/// # Example
/// ```ignore
/// let controller = LauncherController::new(
///     Rc::new(retroarch),
///     roms,
///     cards,
///     DisplayMode::default(),
///     &config,
///     runtime.handle().clone(),
/// )?;
/// controller.run()?; // Blocks until the window is closed
/// ```
pub struct LauncherController {
    ui: MainWindow,

    /// Frame timer; stops when dropped
    _frame_timer: Timer,

    view: Rc<RefCell<CarouselView>>,
}

impl LauncherController {
    /// Create the window and hook up input and the frame loop.
    ///
    /// `cards[i]` is the title card for `roms[i]`.
    pub fn new(
        retroarch: Rc<RetroArch>,
        roms: Vec<RomEntry>,
        cards: Vec<RgbaImage>,
        mode: DisplayMode,
        config: &LauncherConfig,
        tokio_handle: tokio::runtime::Handle,
    ) -> Result<Self> {
        anyhow::ensure!(
            roms.len() == cards.len(),
            "{} ROMs but {} title cards",
            roms.len(),
            cards.len()
        );

        let ui = MainWindow::new().context("Failed to create Slint UI")?;
        let (viewport_width, viewport_height) = (mode.width as f32, mode.height as f32);
        ui.set_viewport_width(viewport_width);
        ui.set_viewport_height(viewport_height);
        ui.window()
            .set_size(slint::LogicalSize::new(viewport_width, viewport_height));

        let view = Rc::new(RefCell::new(CarouselView {
            carousel: carousel_for_cards(&cards, config.slide_speed),
            card_widths: cards.iter().map(RgbaImage::width).collect(),
            cards: cards.iter().map(to_slint_image).collect(),
            names: roms.iter().map(|rom| rom.name.clone()).collect(),
            viewport_width,
            last_frame: Instant::now(),
        }));

        view.borrow().apply(&ui);

        Self::setup_callbacks(&ui, &view, retroarch, Rc::new(roms), tokio_handle);
        let frame_timer = Self::start_frame_loop(&ui, &view, config.fps);

        tracing::info!("Launcher window initialized ({})", mode);

        Ok(Self {
            ui,
            _frame_timer: frame_timer,
            view,
        })
    }

    /// Run the UI (blocks until the window is closed or Escape is pressed)
    pub fn run(self) -> Result<(), slint::PlatformError> {
        tracing::info!("Starting carousel event loop");
        let result = self.ui.run();
        tracing::info!(
            "Carousel closed on {}",
            self.view.borrow().carousel.selected_index()
        );
        result
    }

    /// Set up Slint UI callbacks
    fn setup_callbacks(
        ui: &MainWindow,
        view: &Rc<RefCell<CarouselView>>,
        retroarch: Rc<RetroArch>,
        roms: Rc<Vec<RomEntry>>,
        tokio_handle: tokio::runtime::Handle,
    ) {
        let view_left = Rc::clone(view);
        ui.on_shift_left(move || {
            view_left.borrow_mut().carousel.shift_left();
        });

        let view_right = Rc::clone(view);
        ui.on_shift_right(move || {
            view_right.borrow_mut().carousel.shift_right();
        });

        let view_launch = Rc::clone(view);
        ui.on_launch_selected(move || {
            let index = view_launch.borrow().carousel.selected_index();
            let Some(rom) = roms.get(index) else {
                return;
            };

            tracing::info!("Launching {}", rom.path);

            // Blocks the event loop until RetroArch exits
            if let Err(e) = tokio_handle.block_on(retroarch.run(rom)) {
                tracing::error!("Failed to launch {}: {}", rom.name, e);
            }

            // Don't let the time spent in the game count as one giant frame
            view_launch.borrow_mut().last_frame = Instant::now();
        });

        ui.on_quit(|| {
            tracing::info!("Quit requested");
            if let Err(e) = slint::quit_event_loop() {
                tracing::warn!("Failed to stop event loop: {}", e);
            }
        });
    }

    /// Start the fixed-rate frame loop
    fn start_frame_loop(ui: &MainWindow, view: &Rc<RefCell<CarouselView>>, fps: u32) -> Timer {
        let interval = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        let ui_weak = ui.as_weak();
        let view = Rc::clone(view);

        let timer = Timer::default();
        timer.start(TimerMode::Repeated, interval, move || {
            if let Some(ui) = ui_weak.upgrade() {
                view.borrow_mut().tick(&ui);
            }
        });

        tracing::debug!("Frame loop started at {} FPS", fps);
        timer
    }
}
