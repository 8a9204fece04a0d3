use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context as _, anyhow};
use log::{debug, error, info, trace};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use flatcaster::scaler::{ScaleLut, blit_nearest, build_scale_lut};
use flatcaster::world::ROOM_12;
use flatcaster::{Camera, Config, Grid, InputState, motion, renderer};

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    grid: Grid,
    camera: Camera,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal render target, fixed size
    fb: Vec<u32>,
    scale_lut: ScaleLut,

    keys_down: HashSet<KeyCode>,
    last_tick: Instant,

    // Set when something went wrong; main reports it after the loop exits.
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config, grid: Grid) -> Self {
        let camera = config.camera();
        let fb = vec![0; config.width * config.height];
        Self {
            config,
            window: None,
            surface: None,
            grid,
            camera,
            frame_counter: 0,
            last_fps_print: Instant::now(),
            fb,
            scale_lut: ScaleLut::empty(),
            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }

    fn input(&self) -> InputState {
        InputState {
            rotate_left: self.held(&[KeyCode::ArrowLeft, KeyCode::KeyA]),
            rotate_right: self.held(&[KeyCode::ArrowRight, KeyCode::KeyD]),
            move_forward: self.held(&[KeyCode::ArrowUp, KeyCode::KeyW]),
            move_backward: self.held(&[KeyCode::ArrowDown, KeyCode::KeyS]),
        }
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        let dt = motion::clamp_elapsed(elapsed, self.config.max_frame_dt);
        self.last_tick = now;

        let input = self.input();
        let outcome = motion::step(&mut self.camera, &self.grid, input, &self.config.motion, dt);
        if outcome.blocked {
            trace!("move blocked at {}", self.camera.pos);
        }
    }

    fn rebuild_lut(&mut self, dst_w: usize, dst_h: usize) {
        self.scale_lut = build_scale_lut(
            dst_w,
            dst_h,
            self.config.width,
            self.config.height,
            self.config.present_flipped,
        );
        debug!(
            "window {dst_w}x{dst_h}, render target {}x{}",
            self.config.width, self.config.height
        );
    }

    fn redraw(&mut self, id: WindowId) -> anyhow::Result<()> {
        self.tick();

        let Some(window) = self.window.clone().filter(|w| w.id() == id) else {
            return Ok(());
        };

        let size = window.inner_size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // minimised
        };
        let (dw, dh) = (size.width as usize, size.height as usize);
        if self.scale_lut.dst_size() != (dw, dh) {
            self.rebuild_lut(dw, dh);
        }

        renderer::render_frame(
            &mut self.fb,
            self.config.width,
            self.config.height,
            &self.grid,
            &self.camera,
            &self.config.scene,
        )?;

        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface.resize(nw, nh).map_err(|e| anyhow!("resize surface: {e}"))?;

        let mut buf = surface.buffer_mut().map_err(|e| anyhow!("lock surface: {e}"))?;
        blit_nearest(&mut buf, dw, &self.fb, self.config.width, &self.scale_lut);
        buf.present().map_err(|e| anyhow!("present: {e}"))?;

        self.frame_counter += 1;
        let now = Instant::now();
        let since = now.duration_since(self.last_fps_print);
        if since >= self.config.fps_interval {
            info!("FPS: {:.1}", self.frame_counter as f32 / since.as_secs_f32());
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title(self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let setup = || -> anyhow::Result<_> {
            let window = Rc::new(event_loop.create_window(attributes).context("create window")?);
            let context = softbuffer::Context::new(window.clone())
                .map_err(|e| anyhow!("softbuffer context: {e}"))?;
            let surface = softbuffer::Surface::new(&context, window.clone())
                .map_err(|e| anyhow!("softbuffer surface: {e}"))?;
            Ok((window, surface))
        };

        match setup() {
            Ok((window, surface)) => {
                let size = window.inner_size();
                self.rebuild_lut(size.width as usize, size.height as usize);
                self.surface = Some(surface);
                self.last_tick = Instant::now();
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed if code == KeyCode::Escape => event_loop.exit(),
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(id) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_lut(new_size.width as usize, new_size.height as usize);
            }

            WindowEvent::Focused(false) => self.keys_down.clear(),

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    let grid = Grid::new(&ROOM_12)?;
    config.validate(&grid)?;
    info!(
        "{}x{} map, spawn {}, fov {:.1} deg",
        grid.size(),
        grid.size(),
        config.spawn,
        config.fov_x_deg
    );

    let event_loop = EventLoop::new()?;
    // Redraws are requested continuously; Poll keeps input latency low.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, grid);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
