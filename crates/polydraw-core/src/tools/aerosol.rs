//! Spray can.
//!
//! While the button is held a scheduler task fires at the configured rate;
//! each firing scatters a batch of dots around the pointer. Dot positions are
//! sampled here, once, so replaying the command redraws the same dots.

use super::{Tool, ToolContext, ToolKind, generate_tool_seed};
use crate::color::Rgba;
use crate::commands::{AerosolCommand, DrawCommand};
use crate::input::PointerEvent;
use crate::scheduler::TaskHandle;
use kurbo::Point;
use std::f64::consts::TAU;
use std::time::Duration;

/// Small deterministic generator (splitmix64).
#[derive(Debug, Clone)]
pub struct SprayRng(u64);

impl SprayRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform point in the disc of `radius` around `center`.
    pub fn point_in_disc(&mut self, center: Point, radius: f64) -> Point {
        let r = radius * self.next_f64().sqrt();
        let theta = TAU * self.next_f64();
        Point::new(center.x + r * theta.cos(), center.y + r * theta.sin())
    }
}

#[derive(Debug)]
pub struct AerosolTool {
    sprays: Vec<Vec<Point>>,
    color: Rgba,
    dot_diameter: f64,
    center: Point,
    task: Option<TaskHandle>,
    rng: SprayRng,
    /// Fixed seed for every gesture instead of a fresh one.
    seed: Option<u64>,
    preview: Option<AerosolCommand>,
}

impl Default for AerosolTool {
    fn default() -> Self {
        Self {
            sprays: Vec::new(),
            color: Rgba::black(),
            dot_diameter: 2.0,
            center: Point::ZERO,
            task: None,
            rng: SprayRng::new(0),
            seed: None,
            preview: None,
        }
    }
}

impl AerosolTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tool that samples the same dots for the same gesture.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn sprays(&self) -> &[Vec<Point>] {
        &self.sprays
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn dot_diameter(&self) -> f64 {
        self.dot_diameter
    }

    pub fn task(&self) -> Option<TaskHandle> {
        self.task
    }

    fn spray(&mut self, ctx: &mut ToolContext<'_>) {
        let aerosol = &ctx.settings.aerosol;
        let radius = aerosol.spray_diameter / 2.0;
        let dots = (0..aerosol.dots_per_spray)
            .map(|_| self.rng.point_in_disc(self.center, radius))
            .collect();
        self.sprays.push(dots);
        self.render_preview(ctx);
    }

    fn render_preview(&mut self, ctx: &mut ToolContext<'_>) {
        let mut preview = self.preview.take().unwrap_or_else(|| AerosolCommand::from_tool(self));
        preview.set_values(self);
        ctx.preview.clear();
        preview.execute(ctx.preview);
        log::trace!("Aerosol preview with {} dots", preview.dot_count());
        self.preview = Some(preview);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(task) = self.task.take() else {
            return;
        };
        ctx.scheduler.stop(task);
        if self.sprays.is_empty() {
            ctx.clear_preview();
        } else {
            ctx.commit(AerosolCommand::from_tool(self));
        }
        self.sprays.clear();
    }
}

impl Tool for AerosolTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Aerosol
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        if let Some(task) = self.task.take() {
            ctx.scheduler.stop(task);
        }
        self.sprays.clear();
        self.color = ctx.color_for(event.button);
        self.dot_diameter = ctx.settings.aerosol.dot_diameter;
        self.center = event.position;
        self.rng = SprayRng::new(self.seed.unwrap_or_else(generate_tool_seed));
        let period = Duration::from_millis(ctx.settings.aerosol.period_ms());
        self.task = Some(ctx.scheduler.start(period));
        self.spray(ctx);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, _ctx: &mut ToolContext<'_>) {
        if self.task.is_some() {
            self.center = event.position;
        }
    }

    fn on_pointer_up(&mut self, _event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn on_pointer_leave(&mut self, _event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn on_tick(&mut self, task: TaskHandle, ctx: &mut ToolContext<'_>) {
        if self.task == Some(task) {
            self.spray(ctx);
        }
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn is_active(&self) -> bool {
        self.task.is_some()
    }
}
