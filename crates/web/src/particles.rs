//! Optional decorative background: sparse particles drifting across a
//! full-viewport canvas and bouncing off its edges.
//!
//! The pointer position is recorded but the physics ignores it; particles
//! only drift.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::dom::{self, BrowserViewport, Viewport};
use crate::error::SetupError;
use crate::scheduler::{SharedScheduler, StopHandle};
use crate::timing::{Debounce, Throttle};

/// Viewport pixels per particle.
pub const AREA_PER_PARTICLE: f64 = 15000.0;
pub const MAX_SPEED: f64 = 0.25;
pub const MIN_RADIUS: f64 = 1.0;
pub const MAX_RADIUS: f64 = 3.0;
pub const PARTICLE_COLOR: &str = "#b74b4b";

const CANVAS_CSS: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
                          pointer-events: none; z-index: -1; opacity: 0.1;";
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);
const POINTER_THROTTLE: Duration = Duration::from_millis(16);

pub fn particle_count(width: f64, height: f64) -> usize {
    let count = (width * height / AREA_PER_PARTICLE).floor();
    if count.is_finite() && count > 0.0 { count as usize } else { 0 }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
}

impl Particle {
    /// `random` yields uniform samples in `[0, 1)`.
    pub fn random(width: f64, height: f64, random: &mut impl FnMut() -> f64) -> Self {
        Self {
            x: random() * width,
            y: random() * height,
            vx: (random() - 0.5) * 2.0 * MAX_SPEED,
            vy: (random() - 0.5) * 2.0 * MAX_SPEED,
            size: MIN_RADIUS + random() * (MAX_RADIUS - MIN_RADIUS),
        }
    }

    /// Move one tick, then reverse any velocity component whose position
    /// left `[0, bound]`. Positions are not clamped.
    pub fn step(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;
        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    pointer: Option<(f64, f64)>,
}

impl ParticleField {
    pub fn new(width: f64, height: f64, mut random: impl FnMut() -> f64) -> Self {
        let particles = (0..particle_count(width, height))
            .map(|_| Particle::random(width, height, &mut random))
            .collect();
        Self::with_particles(width, height, particles)
    }

    pub fn with_particles(width: f64, height: f64, particles: Vec<Particle>) -> Self {
        Self {
            particles,
            width,
            height,
            pointer: None,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// New bounds apply from the next step; existing particles are kept.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn track_pointer(&mut self, x: f64, y: f64) {
        self.pointer = Some((x, y));
    }

    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.step(width, height);
        }
    }
}

/// Where a particle frame is drawn.
pub trait ParticleSurface: 'static {
    fn draw(&self, field: &ParticleField);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Create the overlay canvas and append it to `body`.
    pub fn create(document: &Document) -> Result<Self, SetupError> {
        let body = document.body().ok_or(SetupError::MissingElement { selector: "body" })?;
        let canvas = dom::create::<HtmlCanvasElement>(document, "canvas")?;
        canvas.style().set_css_text(CANVAS_CSS);
        body.append_child(&canvas)?;

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| SetupError::Js("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SetupError::Js("unexpected 2d context type".to_string()))?;
        Ok(Self { canvas, context })
    }

    pub fn set_size(&self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }
}

impl ParticleSurface for CanvasSurface {
    fn draw(&self, field: &ParticleField) {
        let (width, height) = field.size();
        self.context.clear_rect(0.0, 0.0, width, height);
        self.context.set_fill_style_str(PARTICLE_COLOR);
        for p in field.particles() {
            self.context.begin_path();
            if self.context.arc(p.x, p.y, p.size, 0.0, 2.0 * PI).is_ok() {
                self.context.fill();
            }
        }
    }
}

/// Step and draw the field once per frame until stopped.
pub fn animate<S: ParticleSurface>(
    field: Rc<RefCell<ParticleField>>,
    surface: Rc<S>,
    scheduler: SharedScheduler,
) -> StopHandle {
    let stop = StopHandle::new();
    frame(field, surface, scheduler, stop.clone());
    stop
}

fn frame<S: ParticleSurface>(
    field: Rc<RefCell<ParticleField>>,
    surface: Rc<S>,
    scheduler: SharedScheduler,
    stop: StopHandle,
) {
    if stop.is_stopped() {
        return;
    }
    {
        let mut field = field.borrow_mut();
        field.step();
        surface.draw(&field);
    }
    let next = scheduler.clone();
    scheduler.request_frame(Box::new(move || frame(field, surface, next, stop)));
}

/// Create the canvas, seed particles for the current viewport and start
/// the frame loop.
pub fn install(
    window: &Window,
    document: &Document,
    scheduler: SharedScheduler,
) -> Result<StopHandle, SetupError> {
    let viewport = BrowserViewport::new(window.clone());
    let (width, height) = viewport.size();

    let surface = Rc::new(CanvasSurface::create(document)?);
    surface.set_size(width, height);
    let field = Rc::new(RefCell::new(ParticleField::new(width, height, js_sys::Math::random)));
    log::debug!("particle field: {} particles", field.borrow().particles().len());

    {
        let field = field.clone();
        let surface = surface.clone();
        let debounce = Debounce::new(scheduler.clone(), RESIZE_DEBOUNCE);
        let closure = Closure::<dyn FnMut()>::new(move || {
            let field = field.clone();
            let surface = surface.clone();
            let viewport = viewport.clone();
            debounce.call(move || {
                let (width, height) = viewport.size();
                surface.set_size(width, height);
                field.borrow_mut().resize(width, height);
            });
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let field = field.clone();
        let throttle = Throttle::new(scheduler.clone(), POINTER_THROTTLE);
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            throttle.call(|| {
                field
                    .borrow_mut()
                    .track_pointer(event.client_x() as f64, event.client_y() as f64);
            });
        });
        window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(animate(field, surface, scheduler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualScheduler;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn particle(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle { x, y, vx, vy, size: 2.0 }
    }

    #[test]
    fn test_particle_count_from_area() {
        assert_eq!(particle_count(1920.0, 1080.0), 138);
        assert_eq!(particle_count(100.0, 100.0), 0);
        assert_eq!(particle_count(150.0, 100.0), 1);
        assert_eq!(particle_count(0.0, 900.0), 0);
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut p = particle(10.0, 20.0, 0.2, -0.1);
        p.step(100.0, 100.0);
        assert!((p.x - 10.2).abs() < 1e-9);
        assert!((p.y - 19.9).abs() < 1e-9);
        assert_eq!((p.vx, p.vy), (0.2, -0.1));
    }

    #[test]
    fn test_bounce_flips_sign_without_clamping() {
        let mut p = particle(99.9, 0.1, 0.25, -0.25);
        p.step(100.0, 100.0);

        assert!(p.x > 100.0);
        assert!(p.y < 0.0);
        assert_eq!(p.vx, -0.25);
        assert_eq!(p.vy, 0.25);

        p.step(100.0, 100.0);
        assert!(p.x <= 100.0);
        assert!(p.y >= 0.0);
    }

    #[test]
    fn test_random_particles_within_ranges() {
        let samples = [0.0, 0.5, 0.999, 0.25, 0.75];
        let mut i = 0;
        let mut random = || {
            let v = samples[i % samples.len()];
            i += 1;
            v
        };
        for _ in 0..20 {
            let p = Particle::random(800.0, 600.0, &mut random);
            assert!((0.0..800.0).contains(&p.x));
            assert!((0.0..600.0).contains(&p.y));
            assert!((-MAX_SPEED..MAX_SPEED).contains(&p.vx));
            assert!((-MAX_SPEED..MAX_SPEED).contains(&p.vy));
            assert!((MIN_RADIUS..MAX_RADIUS).contains(&p.size));
        }
    }

    #[test]
    fn test_field_seeded_from_viewport() {
        let field = ParticleField::new(600.0, 500.0, || 0.5);
        assert_eq!(field.particles().len(), 20);
        assert_eq!(field.particles()[0], particle(300.0, 250.0, 0.0, 0.0));
    }

    #[test]
    fn test_pointer_is_tracked_but_inert() {
        let mut tracked = ParticleField::with_particles(100.0, 100.0, vec![particle(50.0, 50.0, 0.1, 0.1)]);
        let mut plain = tracked.clone();
        tracked.track_pointer(52.0, 48.0);

        tracked.step();
        plain.step();
        assert_eq!(tracked.pointer(), Some((52.0, 48.0)));
        assert_eq!(tracked.particles(), plain.particles());
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut field = ParticleField::new(300.0, 500.0, || 0.1);
        let before = field.particles().len();
        field.resize(1000.0, 1000.0);
        assert_eq!(field.particles().len(), before);
        assert_eq!(field.size(), (1000.0, 1000.0));
    }

    struct CountingSurface(Cell<usize>);

    impl ParticleSurface for CountingSurface {
        fn draw(&self, _field: &ParticleField) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_animation_runs_each_frame_until_stopped() {
        let scheduler = ManualScheduler::new();
        let field = Rc::new(RefCell::new(ParticleField::with_particles(
            100.0,
            100.0,
            vec![particle(10.0, 10.0, 0.25, 0.0)],
        )));
        let surface = Rc::new(CountingSurface(Cell::new(0)));

        let stop = animate(field.clone(), surface.clone(), scheduler.clone());
        assert_eq!(surface.0.get(), 1);
        scheduler.run_frame();
        scheduler.run_frame();
        assert_eq!(surface.0.get(), 3);
        assert_eq!(field.borrow().particles()[0].x, 10.75);

        stop.stop();
        scheduler.run_frame();
        assert_eq!(surface.0.get(), 3);
        assert_eq!(scheduler.pending_frames(), 0);
    }
}
