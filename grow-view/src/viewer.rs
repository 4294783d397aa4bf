//! Interactive orthographic wireframe viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns an [`Organism`], the mesh it
//! last emitted and the configuration it was grown from, and implements
//! [`eframe::App`] to render and control the growth through an egui UI.

use eframe::App;
use glam::Vec2;
use grow_core::{GrowthConfig, MeshBuffers, Organism, Result, types::Vector3};

/// Skeleton colours, indexed by tip generation (clamped to the last entry).
const GENERATION_COLORS: [egui::Color32; 5] = [
    egui::Color32::from_rgb(230, 230, 230),
    egui::Color32::from_rgb(140, 220, 120),
    egui::Color32::from_rgb(240, 200, 80),
    egui::Color32::from_rgb(240, 130, 70),
    egui::Color32::from_rgb(220, 80, 160),
];

/// Orthographic plane the 3-D mesh is flattened onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Looking along +Y: screen x = world x, screen up = world z.
    Front,
    /// Looking along +X: screen x = world y, screen up = world z.
    Side,
    /// Looking down -Z: screen x = world x, screen up = world y.
    Top,
}

impl Projection {
    pub fn project(self, p: Vector3) -> Vec2 {
        match self {
            Projection::Front => Vec2::new(p.x as f32, p.z as f32),
            Projection::Side => Vec2::new(p.y as f32, p.z as f32),
            Projection::Top => Vec2::new(p.x as f32, p.y as f32),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Projection::Front => "XZ front",
            Projection::Side => "YZ side",
            Projection::Top => "XY top",
        }
    }
}

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render the face wireframe and the tip skeleton.
///
/// ### Fields
/// - `organism` - The organism being grown.
/// - `mesh` - Mesh emitted after the last step.
/// - `cfg` - Editable configuration; applied on the next reset.
/// - `error` - Last growth error, shown in the top bar.
///
/// - `running` - Whether growth is currently auto-advancing.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
/// - `plane` - Projection plane.
///
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps (for display only).
pub struct Viewer {
    organism: Organism,
    mesh: MeshBuffers,
    cfg: GrowthConfig,
    error: Option<String>,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,
    plane: Projection,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer whose organism has already grown `cfg.steps` steps.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`], or the error raised while validating
    /// `cfg` or growing the first steps.
    pub fn new(cfg: GrowthConfig) -> Result<Self> {
        let organism = Self::grow_fresh(&cfg)?;
        let mut mesh = MeshBuffers::new();
        organism.emit_mesh(&mut mesh);

        Ok(Self {
            organism,
            mesh,
            cfg,
            error: None,
            running: false,
            zoom: 150.0,
            pan: egui::vec2(0.0, 0.0),
            plane: Projection::Front,
            step_interval: 0.2,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    fn grow_fresh(cfg: &GrowthConfig) -> Result<Organism> {
        let mut organism = Organism::new(cfg.clone())?;
        organism.begin()?;
        organism.grow(cfg.steps)?;
        Ok(organism)
    }

    /// Regrows the organism from the edited configuration.
    ///
    /// Camera settings are kept; auto-running stops. On failure the previous
    /// organism stays on screen and the error is shown.
    fn reset(&mut self) {
        self.running = false;
        match Self::grow_fresh(&self.cfg) {
            Ok(organism) => {
                self.organism = organism;
                self.error = None;
                self.remesh();
            }
            Err(e) => {
                tracing::warn!(error = %e, "reset failed");
                self.error = Some(e.to_string());
            }
        }
    }

    fn remesh(&mut self) {
        self.mesh.clear();
        self.organism.emit_mesh(&mut self.mesh);
    }

    /// Advances the organism by one growth step and re-emits the mesh.
    fn step_once(&mut self) {
        if let Err(e) = self.organism.step() {
            tracing::warn!(error = %e, "growth step failed");
            self.error = Some(e.to_string());
            self.running = false;
            return;
        }
        self.remesh();
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are projected onto `plane`, scaled by `zoom`,
    /// offset by `pan`, and then centered inside the given `rect`. The
    /// y-axis is flipped so that positive y goes up in world space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`] (up to floating point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    fn to_screen(&self, p: Vector3, rect: egui::Rect) -> egui::Pos2 {
        self.world_to_screen(self.plane.project(p), rect)
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f64` [`egui::DragValue`].
    fn labeled_drag_f64(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f64,
        range: std::ops::RangeInclusive<f64>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom, plane).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.01..=2.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 1.0..=2000.0).logarithmic(true).text("Zoom"));

                ui.separator();
                egui::ComboBox::from_label("Plane")
                    .selected_text(self.plane.label())
                    .show_ui(ui, |ui| {
                        for plane in [Projection::Front, Projection::Side, Projection::Top] {
                            ui.selectable_value(&mut self.plane, plane, plane.label());
                        }
                    });

                if let Some(err) = &self.error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
        });
    }

    /// Builds the bottom status bar (timing, age, tip/cell/face counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("faces = {}", self.mesh.faces.len()));
                ui.label(format!("cells = {}", self.organism.total_cells()));
                ui.label(format!("tips = {}", self.organism.tips.len()));
                ui.label(format!("age = {}", self.organism.age));
            });
        });
    }

    /// Builds the right-hand panel for the run configuration.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("seed:");
                    ui.text_edit_singleline(&mut self.cfg.seed);
                });
                Self::labeled_drag_usize(ui, "steps:", &mut self.cfg.steps, 0..=200, 1.0);
                ui.checkbox(&mut self.cfg.params_live, "live params");

                ui.separator();
                ui.label("Light axis");
                Self::labeled_drag_f64(ui, "x:", &mut self.cfg.light_axis.x, -2.0..=2.0, 0.05);
                Self::labeled_drag_f64(ui, "y:", &mut self.cfg.light_axis.y, -2.0..=2.0, 0.05);
                Self::labeled_drag_f64(ui, "z:", &mut self.cfg.light_axis.z, -2.0..=2.0, 0.05);

                ui.label("Gravity axis");
                Self::labeled_drag_f64(ui, "x:", &mut self.cfg.gravity_axis.x, -2.0..=2.0, 0.05);
                Self::labeled_drag_f64(ui, "y:", &mut self.cfg.gravity_axis.y, -2.0..=2.0, 0.05);
                Self::labeled_drag_f64(ui, "z:", &mut self.cfg.gravity_axis.z, -2.0..=2.0, 0.05);

                ui.separator();
                if ui.button("Apply (regrow)").clicked() {
                    self.reset();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = GrowthConfig::default();
                }
            });
    }

    /// Builds the central panel where the wireframe and skeleton are drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(1.0, 2000.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            // Face wireframe.
            let wire = egui::Stroke::new(0.5, egui::Color32::from_rgb(90, 140, 190));
            for face in &self.mesh.faces {
                let pts: Vec<egui::Pos2> = face
                    .iter()
                    .map(|&v| self.to_screen(self.mesh.vertices[v], rect))
                    .collect();
                painter.add(egui::Shape::closed_line(pts, wire));
            }

            // Skeleton, coloured by generation.
            for tip in &self.organism.tips {
                let color = GENERATION_COLORS[(tip.generation as usize).min(GENERATION_COLORS.len() - 1)];
                let p = self.to_screen(tip.location, rect);
                if let Some(parent) = tip.parent {
                    let q = self.to_screen(self.organism.tips[parent].location, rect);
                    painter.line_segment([p, q], egui::Stroke::new(1.5, color));
                }
                painter.circle_filled(p, 2.5, color);
            }

            // Auto-run growth if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
