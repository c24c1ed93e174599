use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use client_core::{Confirmation, TaskClientState};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{ApiStatus, Draft, Task, TaskId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

const CONFIRM_DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

enum RowAction {
    Toggle(TaskId),
    Edit(Task),
    Delete(Task),
}

pub struct TaskDesktopApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    api_url: String,
    state: TaskClientState,
    /// Local form buffer; the controller's draft only overwrites it when
    /// `draft_revision` moves.
    form: Draft,
    seen_draft_revision: u64,
    pending_delete: Option<Task>,
    status: String,
    backend_down: Option<String>,
}

impl TaskDesktopApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, api_url: String) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            api_url,
            state: TaskClientState::default(),
            form: Draft::default(),
            seen_draft_revision: 0,
            pending_delete: None,
            status: "Starting backend worker...".to_string(),
            backend_down: None,
        }
    }

    fn send(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::StateChanged(state) => {
                    sync_form(&mut self.form, &mut self.seen_draft_revision, &state);
                    self.state = state;
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::BackendUnavailable(message) => {
                    self.status = message.clone();
                    self.backend_down = Some(message);
                }
            }
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading("Task Manager");
                ui.weak("Tasks stored on the configured backend.");
            });
            if let Some(api_status) = &self.state.api_status {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let color = if api_status.is_ok() {
                        egui::Color32::from_rgb(67, 160, 71)
                    } else {
                        egui::Color32::from_rgb(229, 57, 53)
                    };
                    let badge =
                        ui.label(egui::RichText::new(status_badge_label(api_status)).color(color));
                    if let Some(message) = &api_status.message {
                        badge.on_hover_text(message);
                    }
                    ui.label(egui::RichText::new("●").color(color));
                });
            }
        });
    }

    fn show_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(error) = self.state.error.clone() else {
            return;
        };

        let mut dismiss = false;
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(253, 236, 234))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(229, 57, 53)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let error_color = egui::Color32::from_rgb(183, 28, 28);
                    ui.label(egui::RichText::new(&error).color(error_color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        dismiss = ui.small_button("×").on_hover_text("Dismiss").clicked();
                    });
                });
            });

        if dismiss {
            self.send(BackendCommand::DismissError);
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let editing = self.state.is_editing();
        card(ui, |ui| {
            ui.heading(form_heading(editing));

            let title = ui.add(
                egui::TextEdit::singleline(&mut self.form.title)
                    .hint_text("Task title *")
                    .desired_width(f32::INFINITY),
            );
            let description = ui.add(
                egui::TextEdit::multiline(&mut self.form.description)
                    .hint_text("Task description (optional)")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            let enter_pressed =
                title.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

            if title.changed() || description.changed() {
                self.send(BackendCommand::UpdateDraft {
                    draft: self.form.clone(),
                });
            }

            ui.horizontal(|ui| {
                let submit = ui.button(submit_label(editing)).clicked();
                if submit || enter_pressed {
                    self.send(BackendCommand::Submit {
                        draft: self.form.clone(),
                    });
                }
                if editing && ui.button("Cancel").clicked() {
                    self.send(BackendCommand::CancelEdit);
                }
            });
        });
    }

    fn show_task_list(&mut self, ui: &mut egui::Ui) {
        let mut action = None;

        card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Your Tasks");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(task_count_label(self.state.tasks.len()));
                });
            });
            ui.separator();

            if self.state.loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading tasks...");
                });
                return;
            }

            if self.state.tasks.is_empty() {
                ui.weak("No tasks yet. Add your first task above!");
                return;
            }

            for task in &self.state.tasks {
                if let Some(row_action) = show_task_row(ui, task) {
                    action = Some(row_action);
                }
                ui.separator();
            }
        });

        match action {
            Some(RowAction::Toggle(task_id)) => self.send(BackendCommand::Toggle { task_id }),
            Some(RowAction::Edit(task)) => {
                self.form = Draft::from_task(&task);
                self.send(BackendCommand::BeginEdit { task });
            }
            Some(RowAction::Delete(task)) => self.pending_delete = Some(task),
            None => {}
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(task) = self.pending_delete.clone() else {
            return;
        };

        let mut decision = None;
        let modal = egui::Modal::new(egui::Id::new("confirm_delete_task")).show(ctx, |ui| {
            ui.set_width(340.0);
            ui.heading("Delete task");
            ui.label(CONFIRM_DELETE_PROMPT);
            ui.weak(&task.title);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    decision = Some(Confirmation::Granted);
                }
                if ui.button("Cancel").clicked() {
                    decision = Some(Confirmation::Declined);
                }
            });
        });
        if decision.is_none() && modal.should_close() {
            decision = Some(Confirmation::Declined);
        }

        if let Some(decision) = decision {
            if let Some(cmd) = resolve_delete(&mut self.pending_delete, decision) {
                self.send(cmd);
            }
        }
    }

    fn show_footer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Backend:");
            ui.code(&self.api_url);
            ui.separator();
            ui.weak(&self.status);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let refresh =
                    ui.add_enabled(self.backend_down.is_none(), egui::Button::new("Refresh"));
                if refresh.clicked() {
                    self.send(BackendCommand::Initialize);
                }
            });
        });
    }
}

impl eframe::App for TaskDesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| self.show_footer(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                self.show_header(ui);
                self.show_error_banner(ui);
                self.show_form(ui);
                self.show_task_list(ui);
            });
        });
        self.show_delete_confirmation(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn card(ui: &mut egui::Ui, add: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::NONE
        .fill(ui.visuals().faint_bg_color)
        .stroke(egui::Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(16, 14))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add(ui);
        });
}

fn show_task_row(ui: &mut egui::Ui, task: &Task) -> Option<RowAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        // Rendered from server state only; the tick flips after the refetch.
        let mut completed = task.completed;
        if ui.checkbox(&mut completed, "").changed() {
            action = Some(RowAction::Toggle(task.id.clone()));
        }

        ui.vertical(|ui| {
            let mut title = egui::RichText::new(&task.title).strong();
            if task.completed {
                title = title.strikethrough().weak();
            }
            ui.label(title);
            if !task.description.is_empty() {
                ui.label(&task.description);
            }
            if let Some(created) = format_created_at(task.created_at) {
                ui.small(format!("Created: {created}"));
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("🗑").on_hover_text("Delete task").clicked() {
                action = Some(RowAction::Delete(task.clone()));
            }
            if ui.button("✏").on_hover_text("Edit task").clicked() {
                action = Some(RowAction::Edit(task.clone()));
            }
        });
    });
    action
}

/// Copies the controller's draft into the form buffer when the controller
/// replaced it (edit started, cancelled, or saved). Returns whether it did.
fn sync_form(form: &mut Draft, seen_revision: &mut u64, state: &TaskClientState) -> bool {
    if state.draft_revision == *seen_revision {
        return false;
    }
    *seen_revision = state.draft_revision;
    *form = state.draft.clone();
    true
}

fn resolve_delete(pending: &mut Option<Task>, decision: Confirmation) -> Option<BackendCommand> {
    let task = pending.take()?;
    match decision {
        Confirmation::Granted => Some(BackendCommand::Delete {
            task_id: task.id,
            confirmation: decision,
        }),
        Confirmation::Declined => None,
    }
}

fn status_badge_label(status: &ApiStatus) -> &'static str {
    if status.is_ok() {
        "Backend Connected"
    } else {
        "Backend Disconnected"
    }
}

fn form_heading(editing: bool) -> &'static str {
    if editing {
        "Edit Task"
    } else {
        "Add New Task"
    }
}

fn submit_label(editing: bool) -> &'static str {
    if editing {
        "💾 Update Task"
    } else {
        "➕ Add Task"
    }
}

fn task_count_label(count: usize) -> String {
    format!("{count} total")
}

fn format_created_at(created_at: Option<DateTime<Utc>>) -> Option<String> {
    created_at.map(|at| {
        at.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
}
