mod autocomplete;
mod command_processor;
mod file_store;
mod profile_scraper;

use autocomplete::{complete, Completion, Vocabulary};
use command_processor::{CommandProcessor, CommandResult, SideEffect};
use eframe::egui;
use file_store::OwnerData;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const BG_COLOR: egui::Color32 = egui::Color32::from_rgb(12, 12, 20);
const TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 220, 220);
const PROMPT_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 255, 150);
const MUTED_COLOR: egui::Color32 = egui::Color32::from_rgb(140, 140, 160);

const SCROLLBACK_LIMIT: usize = 500;

const BANNER: &[&str] = &[
    "██████╗  ██████╗ ██████╗ ████████╗███████╗ ██████╗ ██╗     ██╗ ██████╗ ",
    "██╔══██╗██╔═══██╗██╔══██╗╚══██╔══╝██╔════╝██╔═══██╗██║     ██║██╔═══██╗",
    "██████╔╝██║   ██║██████╔╝   ██║   █████╗  ██║   ██║██║     ██║██║   ██║",
    "██╔═══╝ ██║   ██║██╔══██╗   ██║   ██╔══╝  ██║   ██║██║     ██║██║   ██║",
    "██║     ╚██████╔╝██║  ██║   ██║   ██║     ╚██████╔╝███████╗██║╚██████╔╝",
    "╚═╝      ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚═╝      ╚═════╝ ╚══════╝╚═╝ ╚═════╝ ",
];

fn main() -> Result<(), eframe::Error> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("Portfolio Terminal")
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Portfolio Terminal",
        options,
        Box::new(|cc| {
            let mut visuals = egui::Visuals::dark();
            visuals.window_fill = BG_COLOR;
            visuals.panel_fill = BG_COLOR;
            visuals.extreme_bg_color = BG_COLOR;
            cc.egui_ctx.set_visuals(visuals);

            Ok(Box::new(TerminalApp::new()))
        }),
    )
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Command,
    Output,
}

struct TerminalLine {
    text: String,
    kind: LineKind,
}

struct EditorState {
    filename: String,
    content: String,
}

struct TerminalApp {
    // Kept alive for the whole session; command evaluation runs on it.
    runtime: tokio::runtime::Runtime,
    processor: Arc<tokio::sync::Mutex<CommandProcessor>>,
    vocabulary: Vocabulary,
    prompt: String,
    lines: VecDeque<TerminalLine>,
    input_buffer: String,
    cursor_pos: usize,
    show_cursor: bool,
    last_cursor_blink: Instant,
    command_history: Vec<String>,
    history_index: isize,
    result_tx: mpsc::UnboundedSender<CommandResult>,
    result_rx: mpsc::UnboundedReceiver<CommandResult>,
    editor: Option<EditorState>,
}

impl TerminalApp {
    fn new() -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");
        let owner = OwnerData::from_env();
        let processor = CommandProcessor::new(owner.clone());
        let vocabulary = processor.vocabulary();
        let prompt = format!("{}@portfolio:~$ ", owner.short_user());
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            runtime,
            processor: Arc::new(tokio::sync::Mutex::new(processor)),
            vocabulary,
            prompt,
            lines: VecDeque::new(),
            input_buffer: String::new(),
            cursor_pos: 0,
            show_cursor: true,
            last_cursor_blink: Instant::now(),
            command_history: Vec::new(),
            history_index: -1,
            result_tx,
            result_rx,
            editor: None,
        };

        app.show_banner(&owner);
        app
    }

    fn show_banner(&mut self, owner: &OwnerData) {
        self.push_line(String::new(), LineKind::Output);
        for art_line in BANNER {
            self.push_line(art_line.to_string(), LineKind::Output);
        }
        self.push_line(String::new(), LineKind::Output);
        self.push_line(
            format!("Welcome to {}'s portfolio terminal!", owner.name),
            LineKind::Output,
        );
        self.push_line(
            "Type 'help' to see available commands.".to_string(),
            LineKind::Output,
        );
        self.push_line(String::new(), LineKind::Output);
    }

    fn push_line(&mut self, text: String, kind: LineKind) {
        self.lines.push_back(TerminalLine { text, kind });
        while self.lines.len() > SCROLLBACK_LIMIT {
            self.lines.pop_front();
        }
    }

    fn push_output(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        for part in text.split('\n') {
            self.push_line(part.to_string(), LineKind::Output);
        }
    }

    fn submit_line(&mut self) {
        let line = self.input_buffer.trim().to_string();
        self.input_buffer.clear();
        self.cursor_pos = 0;
        self.history_index = -1;
        if line.is_empty() {
            return;
        }

        self.push_line(format!("$ {line}"), LineKind::Command);
        if self.command_history.last() != Some(&line) {
            self.command_history.push(line.clone());
        }

        let processor = Arc::clone(&self.processor);
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            let result = processor.lock().await.evaluate(&line).await;
            let _ = tx.send(result);
        });
    }

    fn apply_result(&mut self, ctx: &egui::Context, result: CommandResult) {
        match result {
            CommandResult::Text(text) => self.push_output(&text),
            CommandResult::ClearScreen => self.lines.clear(),
            CommandResult::TextWithEffect { text, effect } => {
                self.push_output(&text);
                match effect {
                    SideEffect::OpenUrl(url) => {
                        ctx.open_url(egui::OpenUrl::new_tab(url));
                    }
                    SideEffect::OpenEditor { filename, content } => {
                        self.editor = Some(EditorState { filename, content });
                    }
                }
            }
        }
    }

    fn complete_input(&mut self) {
        match complete(&self.input_buffer, &self.vocabulary) {
            Completion::Completed(line) => {
                self.input_buffer = line;
                self.cursor_pos = self.input_buffer.len();
            }
            Completion::Suggestions(items) => {
                self.push_line(items.join("  "), LineKind::Output);
            }
            Completion::NoMatch => {}
        }
    }

    fn recall_previous(&mut self) {
        if self.command_history.is_empty() {
            return;
        }
        if self.history_index < 0 {
            self.history_index = self.command_history.len() as isize - 1;
        } else if self.history_index > 0 {
            self.history_index -= 1;
        }
        self.input_buffer = self.command_history[self.history_index as usize].clone();
        self.cursor_pos = self.input_buffer.len();
    }

    fn recall_next(&mut self) {
        if self.command_history.is_empty() || self.history_index < 0 {
            return;
        }
        self.history_index += 1;
        if self.history_index >= self.command_history.len() as isize {
            self.history_index = -1;
            self.input_buffer.clear();
            self.cursor_pos = 0;
        } else {
            self.input_buffer = self.command_history[self.history_index as usize].clone();
            self.cursor_pos = self.input_buffer.len();
        }
    }

    fn handle_key(&mut self, key: egui::Key, modifiers: egui::Modifiers) {
        if modifiers.ctrl {
            match key {
                egui::Key::C => {
                    self.push_line(format!("$ {}^C", self.input_buffer), LineKind::Command);
                    self.input_buffer.clear();
                    self.cursor_pos = 0;
                }
                egui::Key::L => {
                    self.lines.clear();
                }
                _ => {}
            }
            return;
        }

        match key {
            egui::Key::Enter => self.submit_line(),
            egui::Key::Backspace => {
                if self.cursor_pos > 0 {
                    let prev = previous_char_start(&self.input_buffer, self.cursor_pos);
                    self.input_buffer.remove(prev);
                    self.cursor_pos = prev;
                }
            }
            egui::Key::Delete => {
                if self.cursor_pos < self.input_buffer.len() {
                    self.input_buffer.remove(self.cursor_pos);
                }
            }
            egui::Key::ArrowLeft => {
                if self.cursor_pos > 0 {
                    self.cursor_pos = previous_char_start(&self.input_buffer, self.cursor_pos);
                }
            }
            egui::Key::ArrowRight => {
                if let Some(ch) = self.input_buffer[self.cursor_pos..].chars().next() {
                    self.cursor_pos += ch.len_utf8();
                }
            }
            egui::Key::ArrowUp => self.recall_previous(),
            egui::Key::ArrowDown => self.recall_next(),
            egui::Key::Home => self.cursor_pos = 0,
            egui::Key::End => self.cursor_pos = self.input_buffer.len(),
            egui::Key::Tab => self.complete_input(),
            _ => {}
        }
    }

    fn handle_terminal_input(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    self.handle_key(key, modifiers);
                }
                egui::Event::Text(text) => {
                    for ch in text.chars() {
                        if ch.is_control() {
                            continue;
                        }
                        self.input_buffer.insert(self.cursor_pos, ch);
                        self.cursor_pos += ch.len_utf8();
                    }
                }
                _ => {}
            }
        }
    }

    fn show_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        let mut close = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::X));

        egui::Window::new(format!("nano: {}", editor.filename))
            .collapsible(false)
            .default_size([640.0, 420.0])
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new("Scratch buffer. Changes are not saved.")
                        .color(MUTED_COLOR),
                );
                egui::ScrollArea::vertical().max_height(340.0).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut editor.content)
                            .font(egui::FontId::monospace(14.0))
                            .desired_width(f32::INFINITY)
                            .desired_rows(18),
                    );
                });
                ui.separator();
                ui.horizontal(|ui| {
                    ui.small("^X Close");
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });

        if close {
            self.editor = None;
        }
    }
}

fn previous_char_start(s: &str, index: usize) -> usize {
    s[..index].char_indices().last().map(|(i, _)| i).unwrap_or(0)
}

impl eframe::App for TerminalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.last_cursor_blink.elapsed() > Duration::from_millis(500) {
            self.show_cursor = !self.show_cursor;
            self.last_cursor_blink = Instant::now();
        }
        // Heartbeat repaint: keeps the cursor blinking and drains results
        // that arrive while the user is idle.
        ctx.request_repaint_after(Duration::from_millis(100));

        while let Ok(result) = self.result_rx.try_recv() {
            self.apply_result(ctx, result);
        }

        if self.editor.is_none() {
            self.handle_terminal_input(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BG_COLOR))
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(BG_COLOR)
                    .inner_margin(egui::Margin::same(12.0))
                    .show(ui, |ui| {
                        egui::ScrollArea::vertical()
                            .stick_to_bottom(true)
                            .auto_shrink([false, false])
                            .show(ui, |ui| {
                                ui.with_layout(
                                    egui::Layout::top_down_justified(egui::Align::LEFT),
                                    |ui| {
                                        for line in &self.lines {
                                            let color = match line.kind {
                                                LineKind::Command => PROMPT_COLOR,
                                                LineKind::Output => TEXT_COLOR,
                                            };
                                            let text = if line.text.is_empty() {
                                                " "
                                            } else {
                                                line.text.as_str()
                                            };
                                            ui.label(
                                                egui::RichText::new(text)
                                                    .font(egui::FontId::monospace(15.0))
                                                    .color(color),
                                            );
                                        }

                                        ui.horizontal(|ui| {
                                            ui.label(
                                                egui::RichText::new(&self.prompt)
                                                    .font(egui::FontId::monospace(15.0))
                                                    .color(PROMPT_COLOR),
                                            );
                                            let mut display = self.input_buffer.clone();
                                            if self.show_cursor && self.editor.is_none() {
                                                if self.cursor_pos >= display.len() {
                                                    display.push('█');
                                                } else {
                                                    display.insert(self.cursor_pos, '█');
                                                }
                                            }
                                            ui.label(
                                                egui::RichText::new(display)
                                                    .font(egui::FontId::monospace(15.0))
                                                    .color(egui::Color32::WHITE),
                                            );
                                        });
                                    },
                                );
                            });

                        ui.separator();
                        ui.horizontal(|ui| {
                            ui.small("Tab: complete | ↑/↓: history | Ctrl+L: clear");
                        });
                    });
            });

        self.show_editor(ctx);
    }
}
