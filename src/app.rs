use crate::editor::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, Editor};
use crate::error::EditorError;
use crate::file_io;
use crate::filters::Filter;
use crate::state::{EditorState, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::tools::ToolType;
use eframe::egui;

const SHORTCUT_NEW: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::N);
const SHORTCUT_OPEN: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
const SHORTCUT_SAVE: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
const SHORTCUT_UNDO: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
const SHORTCUT_REDO: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Y);

pub struct PaintApp {
    editor: Editor,
    canvas_texture: Option<egui::TextureHandle>,
    texture_revision: u64,
    selected_layer: usize,
    pointer_coords: Option<(i32, i32)>,
    // Modal state
    error_message: Option<String>,
    brightness_prompt: Option<i32>,
    show_about: bool,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Restore tool preferences from the previous run, if any.
        let state: EditorState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        Self {
            editor: Editor::new(state),
            canvas_texture: None,
            texture_revision: 0,
            selected_layer: 0,
            pointer_coords: None,
            error_message: None,
            brightness_prompt: None,
            show_about: false,
        }
    }

    /// Route an operation result: I/O failures become a modal message,
    /// refused operations are logged no-ops.
    fn report(&mut self, result: Result<(), EditorError>) {
        match result {
            Ok(()) => {}
            Err(EditorError::IoFailure(err)) => {
                log::error!("{err}");
                self.error_message = Some(err.to_string());
            }
            Err(err) => log::warn!("operation refused: {err}"),
        }
    }

    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", file_io::SUPPORTED_EXTENSIONS)
            .pick_file()
        {
            let result = self.editor.open_file(&path);
            self.report(result);
        }
    }

    fn save_as_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .set_file_name("untitled.png")
            .save_file()
        {
            let result = self.editor.save_file_as(&path);
            self.report(result);
        }
    }

    fn save(&mut self) {
        match self.editor.save_file() {
            Ok(true) => {}
            Ok(false) => self.save_as_dialog(), // nothing remembered yet
            Err(err) => self.report(Err(err)),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input_mut(|i| i.consume_shortcut(&SHORTCUT_UNDO)) {
            self.editor.undo();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&SHORTCUT_REDO)) {
            self.editor.redo();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&SHORTCUT_NEW)) {
            self.editor.new_document();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&SHORTCUT_OPEN)) {
            self.open_dialog();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&SHORTCUT_SAVE)) {
            self.save();
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                let ctx = ui.ctx().clone();
                if ui
                    .add(egui::Button::new("New").shortcut_text(ctx.format_shortcut(&SHORTCUT_NEW)))
                    .clicked()
                {
                    self.editor.new_document();
                    ui.close_menu();
                }
                if ui
                    .add(
                        egui::Button::new("Open…")
                            .shortcut_text(ctx.format_shortcut(&SHORTCUT_OPEN)),
                    )
                    .clicked()
                {
                    self.open_dialog();
                    ui.close_menu();
                }
                if ui
                    .add(
                        egui::Button::new("Save")
                            .shortcut_text(ctx.format_shortcut(&SHORTCUT_SAVE)),
                    )
                    .clicked()
                {
                    self.save();
                    ui.close_menu();
                }
                if ui.button("Save As…").clicked() {
                    self.save_as_dialog();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let ctx = ui.ctx().clone();
                let undo_button =
                    egui::Button::new("Undo").shortcut_text(ctx.format_shortcut(&SHORTCUT_UNDO));
                if ui
                    .add_enabled(self.editor.history().can_undo(), undo_button)
                    .clicked()
                {
                    self.editor.undo();
                    ui.close_menu();
                }
                let redo_button =
                    egui::Button::new("Redo").shortcut_text(ctx.format_shortcut(&SHORTCUT_REDO));
                if ui
                    .add_enabled(self.editor.history().can_redo(), redo_button)
                    .clicked()
                {
                    self.editor.redo();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Clear").clicked() {
                    let result = self.editor.clear_canvas();
                    self.report(result);
                    ui.close_menu();
                }
            });

            ui.menu_button("Tools", |ui| {
                for tool in ToolType::ALL {
                    if ui
                        .selectable_label(self.editor.state.tool == tool, tool.name())
                        .clicked()
                    {
                        self.editor.state.set_tool(tool);
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("Filters", |ui| {
                let mut chosen = None;
                if ui.button("Grayscale").clicked() {
                    chosen = Some(Filter::Grayscale);
                }
                if ui.button("Blur").clicked() {
                    chosen = Some(Filter::Blur);
                }
                if ui.button("Contour").clicked() {
                    chosen = Some(Filter::Contour);
                }
                if ui.button("Brightness…").clicked() {
                    self.brightness_prompt = Some(0);
                    ui.close_menu();
                }
                if let Some(filter) = chosen {
                    let result = self.editor.apply_filter(filter);
                    self.report(result);
                    ui.close_menu();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    self.show_about = true;
                    ui.close_menu();
                }
            });
        });
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for tool in ToolType::ALL {
                if ui
                    .selectable_label(self.editor.state.tool == tool, tool.name())
                    .clicked()
                {
                    self.editor.state.set_tool(tool);
                }
            }
            ui.separator();

            ui.label("Color:");
            let [r, g, b, a] = self.editor.state.brush_color;
            let mut color = egui::Color32::from_rgba_unmultiplied(r, g, b, a);
            if ui.color_edit_button_srgba(&mut color).changed() {
                self.editor.state.brush_color = color.to_array();
            }

            ui.label("Size:");
            ui.add(
                egui::Slider::new(
                    &mut self.editor.state.brush_size,
                    MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE,
                )
                .integer(),
            );

            let mut eraser = self.editor.state.eraser_mode;
            if ui.checkbox(&mut eraser, "Eraser").changed() {
                self.editor.state.toggle_eraser();
            }
        });
    }

    fn layers_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Layers");
        ui.separator();

        let count = self.editor.layers().len();
        if self.selected_layer >= count {
            self.selected_layer = count.saturating_sub(1);
        }

        let rows: Vec<(String, bool)> = self
            .editor
            .layers()
            .layers()
            .iter()
            .map(|layer| (layer.name.clone(), layer.visible))
            .collect();
        for (index, (name, visible)) in rows.iter().enumerate() {
            ui.horizontal(|ui| {
                let mut shown = *visible;
                if ui.checkbox(&mut shown, "").changed() {
                    self.editor.layers_mut().set_visible(index, shown);
                }
                if ui
                    .selectable_label(self.selected_layer == index, name)
                    .clicked()
                {
                    self.selected_layer = index;
                }
            });
        }

        ui.separator();
        if let Some(layer) = self.editor.layers().layers().get(self.selected_layer) {
            let mut opacity = layer.opacity;
            ui.label("Opacity:");
            if ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0)).changed() {
                self.editor
                    .layers_mut()
                    .set_opacity(self.selected_layer, opacity);
            }
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("+").clicked() {
                let name = format!("Layer {}", self.editor.layers().len() + 1);
                self.editor.layers_mut().add_layer(&name);
            }
            if ui.button("−").clicked() {
                match self.editor.layers_mut().delete_layer(self.selected_layer) {
                    Ok(removed) => log::info!("deleted layer {}", removed.name),
                    Err(err) => log::warn!("{err}"),
                }
            }
            if ui.button("▲").clicked() && self.editor.layers_mut().move_up(self.selected_layer) {
                self.selected_layer -= 1;
            }
            if ui.button("▼").clicked() && self.editor.layers_mut().move_down(self.selected_layer)
            {
                self.selected_layer += 1;
            }
        });
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("Tool: {}", self.editor.state.tool));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (x, y) = self.pointer_coords.unwrap_or((0, 0));
                ui.label(format!("X: {x}, Y: {y}"));
            });
        });
    }

    fn canvas_view(&mut self, ui: &mut egui::Ui) {
        // The canvas exists from the first laid-out frame onward.
        self.editor
            .realize_canvas(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);

        let Some(canvas) = self.editor.canvas() else {
            return;
        };
        let canvas_size = egui::vec2(canvas.width() as f32, canvas.height() as f32);

        // Re-upload the texture only when the framebuffer actually changed.
        if self.canvas_texture.is_none() || self.texture_revision != canvas.revision() {
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [canvas.width() as usize, canvas.height() as usize],
                canvas.pixels().as_raw(),
            );
            match &mut self.canvas_texture {
                Some(texture) => texture.set(color_image, egui::TextureOptions::NEAREST),
                None => {
                    self.canvas_texture = Some(ui.ctx().load_texture(
                        "canvas",
                        color_image,
                        egui::TextureOptions::NEAREST,
                    ));
                }
            }
            self.texture_revision = canvas.revision();
        }

        egui::ScrollArea::both().show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(canvas_size, egui::Sense::drag());
            let rect = egui::Rect::from_min_size(response.rect.min, canvas_size);

            if let Some(texture) = &self.canvas_texture {
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            let to_canvas = |pos: egui::Pos2| {
                (
                    (pos.x - rect.min.x).round() as i32,
                    (pos.y - rect.min.y).round() as i32,
                )
            };

            if let Some(pos) = response.hover_pos() {
                self.pointer_coords = Some(to_canvas(pos));
            }

            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                if response.drag_started() {
                    self.editor.pointer_pressed(x, y);
                } else if response.dragged() {
                    self.editor.pointer_dragged(x, y);
                }
                if response.drag_stopped() {
                    self.editor.pointer_released(x, y);
                }
            }

            // Vector overlay preview for the in-flight shape drag.
            if let Some(preview) = self.editor.shape_preview() {
                let [r, g, b, a] = self.editor.state.brush_color;
                let stroke = egui::Stroke::new(
                    self.editor.state.brush_size.max(1.0),
                    egui::Color32::from_rgba_unmultiplied(r, g, b, a),
                );
                let start = rect.min + egui::vec2(preview.start.0 as f32, preview.start.1 as f32);
                let current =
                    rect.min + egui::vec2(preview.current.0 as f32, preview.current.1 as f32);
                match preview.tool {
                    ToolType::Line => {
                        painter.line_segment([start, current], stroke);
                    }
                    ToolType::Rectangle => {
                        painter.rect_stroke(egui::Rect::from_two_pos(start, current), 0.0, stroke);
                    }
                    ToolType::Oval => {
                        let shape_rect = egui::Rect::from_two_pos(start, current);
                        painter.add(egui::epaint::EllipseShape::stroke(
                            shape_rect.center(),
                            shape_rect.size() / 2.0,
                            stroke,
                        ));
                    }
                    _ => {}
                }
            }
        });
    }

    fn modal_windows(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("Close").clicked() {
                        self.error_message = None;
                    }
                });
        }

        if let Some(mut value) = self.brightness_prompt {
            let mut open = true;
            egui::Window::new("Brightness")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.add(egui::Slider::new(&mut value, -100..=100).text("percent"));
                    ui.horizontal(|ui| {
                        if ui.button("Apply").clicked() {
                            let result = self.editor.apply_filter(Filter::Brightness(value));
                            self.report(result);
                            open = false;
                        }
                        if ui.button("Cancel").clicked() {
                            open = false;
                        }
                    });
                });
            self.brightness_prompt = if open { Some(value) } else { None };
        }

        if self.show_about {
            egui::Window::new("About")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("pixelpad");
                    ui.label("A small raster image editor with layers, filters and undo history.");
                    if ui.button("Close").clicked() {
                        self.show_about = false;
                    }
                });
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.editor.state);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.menu_bar(ui));
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.status_bar(ui));
        egui::SidePanel::right("layers_panel")
            .default_width(180.0)
            .show(ctx, |ui| self.layers_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas_view(ui));

        self.modal_windows(ctx);
    }
}
