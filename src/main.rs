use anyhow::{Context, Result};
use clap::Parser;
use neon_snake::config::GameConfig;
use neon_snake::grid::Dir;
use neon_snake::render::Renderer;
use neon_snake::session::{GameSession, Status, TickEvent};
use pixels::{Pixels, SurfaceTexture};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

#[derive(Parser)]
#[command(name = "neon-snake", version, about = "Cyberpunk neon snake")]
struct Cli {
    /// JSON config file; missing fields fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Playable half-extent override (walls sit one cell beyond)
    #[arg(long)]
    half_extent: Option<i32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(half_extent) = cli.half_extent {
        config.half_extent = half_extent;
        config.food_range = config.food_range.min(half_extent);
    }
    config.validate()?;

    let (width, height) = Renderer::surface_size(config.half_extent);

    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();
    let window = WindowBuilder::new()
        .with_title("NEON SNAKE")
        .with_inner_size(LogicalSize::new(width, height))
        .with_resizable(false)
        .build(&event_loop)
        .context("creating window")?;

    let mut pixels = {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, &window);
        Pixels::new(width, height, surface).context("creating pixel surface")?
    };

    let mut session = GameSession::new(config);
    let mut renderer = Renderer::new(session.half_extent());
    let epoch = Instant::now();

    info!(half_extent = session.half_extent(), "starting neon snake");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        let now = epoch.elapsed();

        if let Event::RedrawRequested(_) = event {
            renderer.draw(pixels.frame_mut(), &session, now);
            if let Err(err) = pixels.render() {
                error!(%err, "render failed");
                *control_flow = ControlFlow::Exit;
            }
            return;
        }

        if input.update(&event) {
            if input.key_pressed(VirtualKeyCode::Escape)
                || input.close_requested()
                || input.destroyed()
            {
                *control_flow = ControlFlow::Exit;
                return;
            }

            if input.key_pressed(VirtualKeyCode::Space) && session.toggle_pause(now) {
                renderer.flash(now);
            }

            let mut requested = None;
            if input.key_pressed(VirtualKeyCode::Up) || input.key_pressed(VirtualKeyCode::W) {
                requested = Some(Dir::NegZ);
            }
            if input.key_pressed(VirtualKeyCode::Down) || input.key_pressed(VirtualKeyCode::S) {
                requested = Some(Dir::PosZ);
            }
            if input.key_pressed(VirtualKeyCode::Left) || input.key_pressed(VirtualKeyCode::A) {
                requested = Some(Dir::NegX);
            }
            if input.key_pressed(VirtualKeyCode::Right) || input.key_pressed(VirtualKeyCode::D) {
                requested = Some(Dir::PosX);
            }
            if let Some(dir) = requested {
                let was_idle = session.status() == Status::Idle;
                if session.request_direction(dir, now) || was_idle {
                    renderer.flash(now);
                }
            }

            let result = session.tick(now);
            for event in &result.events {
                match *event {
                    TickEvent::FoodEaten { score } => info!(score, "food eaten"),
                    TickEvent::WallCollision => info!("hit the wall"),
                    TickEvent::SelfCollision => info!("bit itself"),
                    TickEvent::GameOver { score } => info!(score, "game over"),
                    TickEvent::Reset => info!("new round ready"),
                }
            }
            renderer.observe(&result.events, now);

            window.request_redraw();
        }
    });
}
