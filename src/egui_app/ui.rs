//! egui renderer and app entry types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use egui::{Align2, RichText};

use crate::feedback::{ErrorAnchor, InlinePlacement};
use crate::intake::TextField;

use super::controller::AppController;
use super::state::{FormState, InlineMessage, Page};
use super::style;

/// Minimum viewport size for the shell.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(520.0, 680.0);

/// The eframe application wrapping the controller.
pub struct EguiApp {
    controller: AppController,
    styled: bool,
    avatar_preview: Option<(PathBuf, Option<egui::TextureHandle>)>,
    ticket_avatar: Option<(String, Option<egui::TextureHandle>)>,
}

impl EguiApp {
    /// Build the app, loading persisted validation options.
    pub fn new() -> Result<Self, String> {
        let controller = AppController::new().map_err(|err| err.to_string())?;
        Ok(Self {
            controller,
            styled: false,
            avatar_preview: None,
            ticket_avatar: None,
        })
    }

    fn render_intake(&mut self, ctx: &egui::Context) {
        let mut blurred: Vec<TextField> = Vec::new();
        let mut pick_clicked = false;
        let mut remove_clicked = false;
        let mut submit_clicked = false;
        let mut options_clicked = false;

        let preview = self.avatar_preview_texture(ctx);
        let encode_in_flight = self.controller.encode_in_flight();
        let has_avatar = self.controller.avatar_path().is_some();
        let palette = style::palette();

        egui::TopBottomPanel::top("chrome").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Lanyard").color(palette.accent).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Options…").clicked() {
                        options_clicked = true;
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(18.0);
                ui.heading("Your Journey to Coding Conf Starts Here!");
                ui.label(
                    RichText::new("Secure your spot at next year's biggest coding conference.")
                        .color(palette.text_muted),
                );
            });
            ui.add_space(16.0);

            let form = &mut self.controller.ui.form;
            ui.label("Upload Avatar");
            inline_message(ui, form.error(ErrorAnchor::Avatar), InlinePlacement::Above);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    match &preview {
                        Some(texture) => {
                            ui.add(
                                egui::Image::new(texture)
                                    .fit_to_exact_size(egui::vec2(72.0, 72.0)),
                            );
                        }
                        None => {
                            ui.label(RichText::new("No image selected").color(palette.text_muted));
                        }
                    }
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            if ui.button("Choose image…").clicked() {
                                pick_clicked = true;
                            }
                            if ui
                                .add_enabled(has_avatar, egui::Button::new("Remove"))
                                .clicked()
                            {
                                remove_clicked = true;
                            }
                        });
                        ui.label(
                            RichText::new("Upload your photo (JPG or PNG, max size: 500KB).")
                                .color(palette.text_muted)
                                .size(12.0),
                        );
                    });
                });
            });
            inline_message(ui, form.error(ErrorAnchor::Avatar), InlinePlacement::Below);

            for (label, hint, field) in [
                ("Full Name", "e.g. Ada Lovelace", TextField::Name),
                ("Email Address", "example@email.com", TextField::Email),
                ("GitHub Username", "@yourusername", TextField::Github),
            ] {
                if labeled_field(ui, label, hint, field, form) {
                    blurred.push(field);
                }
            }

            ui.add_space(18.0);
            // The form stays live while an encode is in flight; a fresh
            // submit supersedes the pending one.
            if ui
                .button(RichText::new("Generate My Ticket").strong())
                .clicked()
            {
                submit_clicked = true;
            }
            if encode_in_flight {
                ui.label(RichText::new("Generating your ticket…").color(palette.text_muted));
            }
        });

        for field in blurred {
            self.controller.field_blurred(field);
        }
        if pick_clicked {
            self.controller.avatar_pick_clicked();
        }
        if remove_clicked {
            self.controller.avatar_cleared();
        }
        if submit_clicked {
            self.controller.submit_clicked();
        }
        if options_clicked {
            self.controller.open_options();
        }
    }

    fn render_ticket(&mut self, ctx: &egui::Context) {
        let mut reload_clicked = false;
        let mut back_clicked = false;

        let avatar = self.ticket_avatar_texture(ctx);
        let palette = style::palette();

        egui::CentralPanel::default().show(ctx, |ui| {
            let ticket = &self.controller.ui.ticket;
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                if let Some(notice) = &ticket.missing_notice {
                    ui.heading(notice);
                    ui.add_space(12.0);
                    if ui.button("Back to the form").clicked() {
                        back_clicked = true;
                    }
                    return;
                }

                if let Some(greeting) = &ticket.greeting {
                    ui.heading(greeting);
                }
                if let Some(email) = &ticket.email {
                    ui.label(
                        RichText::new(format!("We've emailed your ticket to {email}."))
                            .color(palette.text_muted),
                    );
                }
                ui.add_space(20.0);

                egui::Frame::group(ui.style())
                    .inner_margin(egui::Margin::same(16))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if let Some(texture) = &avatar {
                                ui.add(
                                    egui::Image::new(texture)
                                        .fit_to_exact_size(egui::vec2(64.0, 64.0)),
                                );
                            }
                            ui.vertical(|ui| {
                                if let Some(name) = &ticket.name {
                                    ui.label(RichText::new(name).strong().size(18.0));
                                }
                                if let Some(github) = &ticket.github {
                                    ui.label(RichText::new(github).color(palette.text_muted));
                                }
                            });
                            if let Some(id) = &ticket.ticket_id {
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        ui.label(
                                            RichText::new(id).color(palette.accent).size(18.0),
                                        );
                                    },
                                );
                            }
                        });
                    });

                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    if ui.button("Reload ticket").clicked() {
                        reload_clicked = true;
                    }
                    if ui.button("Generate another ticket").clicked() {
                        back_clicked = true;
                    }
                });
            });
        });

        if reload_clicked {
            self.controller.reload_ticket_page();
        }
        if back_clicked {
            self.controller.back_to_form();
        }
    }

    fn render_toasts(&mut self, ctx: &egui::Context) {
        if self.controller.ui.toasts.is_empty() {
            return;
        }
        let palette = style::palette();
        egui::Area::new(egui::Id::new("notice_list"))
            .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.controller.ui.toasts {
                    let color = if toast.is_error {
                        palette.error
                    } else {
                        palette.success
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(RichText::new(&toast.message).color(color));
                    });
                }
            });
    }

    fn render_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = self.controller.ui.modal.clone() else {
            return;
        };

        let rect = ctx.viewport_rect();
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("modal_backdrop"),
        ));
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_premultiplied(0, 0, 0, 160));

        let mut open = true;
        let mut dismissed = false;
        egui::Window::new("Notice")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if !open || dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.ui.modal = None;
        }
    }

    fn render_options_window(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.options.open {
            return;
        }
        let mut pending = self.controller.ui.options.pending;
        let last_error = self.controller.ui.options.last_error.clone();
        let mut open = true;
        let mut apply_clicked = false;
        let mut cancel_clicked = false;

        egui::Window::new("Validation options")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .default_width(340.0)
            .open(&mut open)
            .show(ctx, |ui| {
                use crate::config::{GithubMode, NameMode, PresentationMode};

                egui::ComboBox::from_label("Message placement")
                    .selected_text(presentation_label(pending.presentation))
                    .show_ui(ui, |ui| {
                        for mode in [
                            PresentationMode::Below,
                            PresentationMode::Above,
                            PresentationMode::Alert,
                            PresentationMode::Toast,
                        ] {
                            ui.selectable_value(
                                &mut pending.presentation,
                                mode,
                                presentation_label(mode),
                            );
                        }
                    });
                egui::ComboBox::from_label("Name field")
                    .selected_text(name_mode_label(pending.name_mode))
                    .show_ui(ui, |ui| {
                        for mode in [NameMode::Full, NameMode::First] {
                            ui.selectable_value(&mut pending.name_mode, mode, name_mode_label(mode));
                        }
                    });
                egui::ComboBox::from_label("GitHub handle")
                    .selected_text(github_mode_label(pending.github_mode))
                    .show_ui(ui, |ui| {
                        for mode in [GithubMode::Auto, GithubMode::RequireAt] {
                            ui.selectable_value(
                                &mut pending.github_mode,
                                mode,
                                github_mode_label(mode),
                            );
                        }
                    });

                if let Some(err) = &last_error {
                    ui.add_space(6.0);
                    ui.label(RichText::new(err).color(style::palette().error));
                }

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancel_clicked = true;
                    }
                    if ui.button("Apply").clicked() {
                        apply_clicked = true;
                    }
                });
            });

        self.controller.ui.options.pending = pending;
        if apply_clicked {
            self.controller.apply_options(pending);
        }
        if !open || cancel_clicked {
            self.controller.ui.options.open = false;
        }
    }

    fn avatar_preview_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        let path = self.controller.avatar_path()?.to_path_buf();
        if let Some((cached, texture)) = &self.avatar_preview {
            if *cached == path {
                return texture.clone();
            }
        }
        let texture = load_image_file(&path)
            .map(|image| ctx.load_texture("avatar_preview", image, egui::TextureOptions::LINEAR));
        self.avatar_preview = Some((path, texture.clone()));
        texture
    }

    fn ticket_avatar_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        let data_url = self.controller.ui.ticket.avatar_data_url.clone()?;
        if let Some((cached, texture)) = &self.ticket_avatar {
            if *cached == data_url {
                return texture.clone();
            }
        }
        let texture = data_url_bytes(&data_url)
            .and_then(|bytes| color_image_from_bytes(&bytes))
            .map(|image| ctx.load_texture("ticket_avatar", image, egui::TextureOptions::LINEAR));
        self.ticket_avatar = Some((data_url, texture.clone()));
        texture
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.styled {
            let mut visuals = egui::Visuals::dark();
            style::apply_visuals(&mut visuals);
            ctx.set_visuals(visuals);
            self.styled = true;
        }

        self.controller.tick(ctx.input(|i| i.time));
        if self.controller.encode_in_flight() || !self.controller.ui.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        match self.controller.ui.page {
            Page::Intake => self.render_intake(ctx),
            Page::Ticket => self.render_ticket(ctx),
        }
        self.render_toasts(ctx);
        self.render_modal(ctx);
        self.render_options_window(ctx);
    }
}

fn anchor_of(field: TextField) -> ErrorAnchor {
    match field {
        TextField::Name => ErrorAnchor::Name,
        TextField::Email => ErrorAnchor::Email,
        TextField::Github => ErrorAnchor::Github,
    }
}

fn inline_message(ui: &mut egui::Ui, message: Option<&InlineMessage>, placement: InlinePlacement) {
    if let Some(message) = message {
        if message.placement == placement {
            ui.label(
                RichText::new(&message.text)
                    .color(style::palette().error)
                    .size(12.0),
            );
        }
    }
}

/// Render one labeled input; returns whether it lost focus this frame.
fn labeled_field(
    ui: &mut egui::Ui,
    label: &str,
    hint: &str,
    field: TextField,
    form: &mut FormState,
) -> bool {
    ui.add_space(10.0);
    ui.label(label);
    inline_message(ui, form.error(anchor_of(field)), InlinePlacement::Above);
    let response = ui.add(
        egui::TextEdit::singleline(form.buffer_mut(field))
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    if form.focus_request == Some(field) && !response.has_focus() {
        response.request_focus();
        form.focus_request = None;
    }
    inline_message(ui, form.error(anchor_of(field)), InlinePlacement::Below);
    response.lost_focus()
}

fn load_image_file(path: &Path) -> Option<egui::ColorImage> {
    let bytes = std::fs::read(path).ok()?;
    color_image_from_bytes(&bytes)
}

fn color_image_from_bytes(bytes: &[u8]) -> Option<egui::ColorImage> {
    let image = image::load_from_memory(bytes).ok()?.to_rgba8();
    let (width, height) = image.dimensions();
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        image.as_raw(),
    ))
}

fn data_url_bytes(data_url: &str) -> Option<Vec<u8>> {
    let (_, encoded) = data_url.split_once(";base64,")?;
    STANDARD.decode(encoded).ok()
}

fn presentation_label(mode: crate::config::PresentationMode) -> &'static str {
    use crate::config::PresentationMode::*;
    match mode {
        Below => "Below the input",
        Above => "Above the input",
        Alert => "Blocking dialog",
        Toast => "Toast notice",
    }
}

fn name_mode_label(mode: crate::config::NameMode) -> &'static str {
    use crate::config::NameMode::*;
    match mode {
        Full => "First and last name",
        First => "First name only",
    }
}

fn github_mode_label(mode: crate::config::GithubMode) -> &'static str {
    use crate::config::GithubMode::*;
    match mode {
        Auto => "Add @ automatically",
        RequireAt => "Require leading @",
    }
}
