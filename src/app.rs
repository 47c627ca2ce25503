use crate::api::CoachClient;
use crate::chat::ChatLog;
use crate::event::AppEvent;
use crate::recommend::{InjurySelection, ALL_INJURIES};
use crate::session::{Role, Turn};
use crate::theme::Theme;
use crate::typewriter::{Typewriter, REVEAL_TICK};
use eframe::egui::{self, RichText, ScrollArea};
use log::warn;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

const QUICK_PROMPTS: [(&str, &str); 3] = [
    (
        "Technique advice",
        "I need technique advice for my BJJ training. Can you help me with some fundamental techniques?",
    ),
    (
        "Injury modifications",
        "I have some injuries and need modifications for BJJ techniques. What should I avoid?",
    ),
    (
        "Training strategies",
        "Can you give me some training strategies for improving my BJJ game?",
    ),
];

pub struct FlowRollApp {
    rx: Receiver<AppEvent>,
    client: CoachClient,
    theme: Theme,
    chat: ChatLog,
    injuries: InjurySelection,
    input_buffer: String,
    reveal: Option<Typewriter>,
    scroll_to_bottom: bool,
}

impl FlowRollApp {
    pub fn new(rx: Receiver<AppEvent>, client: CoachClient) -> Self {
        Self {
            rx,
            client,
            theme: Theme::default(),
            chat: ChatLog::new(),
            injuries: InjurySelection::new(),
            input_buffer: String::new(),
            reveal: None,
            scroll_to_bottom: false,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event, ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent, ctx: &egui::Context) {
        match event {
            AppEvent::ChatReply(reply) => {
                self.chat.complete(reply);
                if let Some(turn) = self.chat.turns().last() {
                    let index = self.chat.turns().len() - 1;
                    self.reveal = Some(Typewriter::start(index, &turn.text, Instant::now()));
                }
                self.scroll_to_bottom = true;
                ctx.request_repaint();
            }
            AppEvent::ChatFailed(message) => {
                self.chat.fail(message);
                self.scroll_to_bottom = true;
                ctx.request_repaint();
            }
            AppEvent::RecommendationsReady(result) => {
                self.injuries.complete(result);
                ctx.request_repaint();
            }
        }
    }

    /// Steps the assistant-turn reveal once per frame and keeps repaints
    /// coming until the full text is shown. Dropping the app drops the
    /// reveal state with it; there is no timer to tear down.
    fn advance_reveal(&mut self, ctx: &egui::Context) {
        let Some(reveal) = self.reveal.as_mut() else {
            return;
        };
        reveal.advance(Instant::now());
        if reveal.is_done() {
            self.reveal = None;
        } else {
            self.scroll_to_bottom = true;
            ctx.request_repaint_after(REVEAL_TICK);
        }
    }

    fn submit(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.chat.begin_submit(&self.input_buffer) {
            self.client.send_chat(message);
            self.input_buffer.clear();
            self.scroll_to_bottom = true;
            ctx.request_repaint();
        }
    }

    fn submit_canned(&mut self, ctx: &egui::Context, prompt: &str) {
        if let Some(message) = self.chat.begin_submit(prompt) {
            self.client.send_chat(message);
            self.scroll_to_bottom = true;
            ctx.request_repaint();
        }
    }

    /// Text to render for a turn: the reveal prefix for the assistant turn
    /// currently animating, the full text for everything else.
    fn turn_text<'a>(&'a self, index: usize, turn: &'a Turn) -> &'a str {
        match &self.reveal {
            Some(reveal) if turn.role == Role::Assistant && reveal.turn_index() == index => {
                reveal.visible(&turn.text)
            }
            _ => &turn.text,
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("FlowRoll");
                ui.separator();
                ui.label(
                    RichText::new("AI-Powered Recovery for Injured Athletes")
                        .color(self.theme.text_muted),
                );
            });
        });
    }

    fn render_injury_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("injury_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Select Your Injuries");
                ui.label(
                    RichText::new(
                        "Choose any injuries or conditions you have to get \
                         personalized training recommendations.",
                    )
                    .color(self.theme.text_muted),
                );
                ui.separator();

                for injury in ALL_INJURIES {
                    let mut checked = self.injuries.is_selected(injury);
                    if ui.checkbox(&mut checked, injury).changed() {
                        self.injuries.toggle(injury);
                    }
                }

                ui.add_space(self.theme.spacing_8);
                ui.horizontal(|ui| {
                    let label = if self.injuries.is_busy() {
                        "Loading…"
                    } else {
                        "Get Recommendations"
                    };
                    let clicked = ui
                        .add_enabled(self.injuries.can_fetch(), egui::Button::new(label))
                        .clicked();
                    if clicked {
                        if let Some(selection) = self.injuries.begin_fetch() {
                            self.client.fetch_recommendations(selection);
                        }
                    }
                    if self.injuries.selected_count() > 0 {
                        ui.label(
                            RichText::new(format!("{} selected", self.injuries.selected_count()))
                                .color(self.theme.text_muted),
                        );
                    }
                });
            });
    }

    fn render_results_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("results_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Results");
                ui.separator();

                let Some(result) = self.injuries.latest() else {
                    ui.label(
                        RichText::new(
                            "Pick injuries and request recommendations to see them here.",
                        )
                        .color(self.theme.text_muted),
                    );
                    return;
                };

                ScrollArea::vertical().id_salt("results").show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for injury in &result.injuries {
                            ui.label(
                                RichText::new(injury).small().color(self.theme.text_muted),
                            );
                        }
                    });

                    ui.add_space(self.theme.spacing_8);
                    self.theme.card_frame().show(ui, |ui| {
                        ui.label(
                            RichText::new("Unsafe Moves").color(self.theme.danger).strong(),
                        );
                        if result.unsafe_moves.is_empty() {
                            ui.label(
                                RichText::new("No unsafe moves found.")
                                    .color(self.theme.text_muted),
                            );
                        } else {
                            for technique in &result.unsafe_moves {
                                ui.label(format!("• {technique}"));
                            }
                        }
                    });

                    ui.add_space(self.theme.spacing_8);
                    self.theme.card_frame().show(ui, |ui| {
                        ui.label(
                            RichText::new("Safe Moves").color(self.theme.success).strong(),
                        );
                        if result.safe_moves.is_empty() {
                            ui.label(
                                RichText::new("No safe moves found.")
                                    .color(self.theme.text_muted),
                            );
                        } else {
                            for technique in &result.safe_moves {
                                ui.label(format!("• {technique}"));
                            }
                        }
                    });

                    if !result.ai_recommendations.is_empty() {
                        ui.add_space(self.theme.spacing_8);
                        self.theme.card_frame().show(ui, |ui| {
                            ui.label(
                                RichText::new("AI Coach Recommendations")
                                    .color(self.theme.accent_primary)
                                    .strong(),
                            );
                            ui.label(&result.ai_recommendations);
                        });
                    }

                    if !result.recovery_advice.is_empty() {
                        ui.add_space(self.theme.spacing_8);
                        self.theme.card_frame().show(ui, |ui| {
                            ui.label(
                                RichText::new("Recovery & Rehabilitation Advice")
                                    .color(self.theme.warning)
                                    .strong(),
                            );
                            ui.label(&result.recovery_advice);
                        });
                    }
                });
            });
    }

    fn render_chat_panel(&mut self, ctx: &egui::Context) {
        let mut canned: Option<&'static str> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Chat with AI Coach");
            ui.label(RichText::new("powered by NVIDIA Nemotron").color(self.theme.text_muted));
            ui.separator();

            let transcript_height = (ui.available_height() - 140.0).max(120.0);
            ScrollArea::vertical()
                .id_salt("chat_transcript")
                .max_height(transcript_height)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if self.chat.turns().is_empty() {
                        ui.vertical_centered(|ui| {
                            ui.add_space(self.theme.spacing_16);
                            ui.label(RichText::new("Ready to help!").strong().size(16.0));
                            ui.label(
                                RichText::new(
                                    "Ask me about BJJ techniques, injury modifications, \
                                     training strategies, or recovery advice.",
                                )
                                .color(self.theme.text_muted),
                            );
                            ui.add_space(self.theme.spacing_8);
                            ui.horizontal_wrapped(|ui| {
                                for (label, prompt) in QUICK_PROMPTS {
                                    if ui.small_button(label).clicked() {
                                        canned = Some(prompt);
                                    }
                                }
                            });
                        });
                    }

                    for (index, turn) in self.chat.turns().iter().enumerate() {
                        let text = self.turn_text(index, turn);
                        match turn.role {
                            Role::System => {
                                ui.vertical_centered(|ui| {
                                    ui.label(
                                        RichText::new(text).small().color(self.theme.danger),
                                    );
                                });
                            }
                            Role::User | Role::Assistant => {
                                let who = if turn.role == Role::User { "You" } else { "Coach" };
                                let who_color = if turn.role == Role::User {
                                    self.theme.accent_primary
                                } else {
                                    self.theme.text_primary
                                };
                                ui.label(
                                    RichText::new(format!("{who} · {}", turn.timestamp))
                                        .small()
                                        .color(who_color),
                                );
                                ui.label(text);
                                ui.add_space(self.theme.spacing_4);
                            }
                        }
                    }

                    if self.chat.is_busy() {
                        ui.label(
                            RichText::new("AI Coach is typing...")
                                .italics()
                                .color(self.theme.text_muted),
                        );
                    }

                    if self.scroll_to_bottom {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
            self.scroll_to_bottom = false;

            ui.separator();
            let busy = self.chat.is_busy();
            let hint = if busy {
                "Waiting for response..."
            } else {
                "Type your message..."
            };

            let mut send_now = false;
            self.theme.composer_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    let response = ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut self.input_buffer)
                            .desired_width(f32::INFINITY)
                            .hint_text(hint),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        send_now = true;
                    }

                    let label = if busy { "Sending…" } else { "Send" };
                    let clicked = ui
                        .add_enabled(
                            !busy && !self.input_buffer.trim().is_empty(),
                            egui::Button::new(label),
                        )
                        .clicked();
                    send_now |= clicked;
                });
            });

            if send_now && !busy {
                self.submit(ctx);
            }
        });

        if let Some(prompt) = canned {
            self.submit_canned(ctx, prompt);
        }
    }
}

impl eframe::App for FlowRollApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.advance_reveal(ctx);
        self.render_top_bar(ctx);
        self.render_injury_panel(ctx);
        self.render_results_panel(ctx);
        self.render_chat_panel(ctx);
    }
}
