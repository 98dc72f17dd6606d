use iced::widget::{center, column, container, opaque, stack};
use iced::{Color, Element, Length, Task, Theme};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod capture;
mod config;
mod error;
mod logbook;
mod state;
mod ui;

use capture::CaptureOutcome;
use config::AppConfig;
use state::export::{self, LogbookEntry};
use state::{PairingState, ScanId, Selection};

/// A short-lived message for the user
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    id: u64,
    text: String,
}

/// Main application state
struct Memory {
    config: AppConfig,
    /// Every scan of this session; only `update` mutates it
    scans: PairingState,
    /// Text of the open send dialog, `None` while it is closed
    draft: Option<String>,
    /// A capture is in flight
    capturing: bool,
    notice: Option<Notice>,
    next_notice: u64,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User asked for a new scan
    AddScan,
    /// The capture collaborator returned
    CaptureFinished(CaptureOutcome),
    /// User clicked an unpaired scan
    Select(ScanId),
    /// User deleted the pair (first, second)
    DeletePair(ScanId, ScanId),
    /// User clicked "Send to logbook"
    OpenSendDialog,
    /// User edited the payload
    DraftChanged(String),
    /// User confirmed the payload
    ConfirmSend,
    DismissSendDialog,
    /// Logbook launch finished (error text on failure)
    SendFinished(Result<(), String>),
    NoticeExpired(u64),
}

impl Memory {
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        info!("🎨 Memory ready (task {:?})", config.task_name);

        (
            Memory {
                config,
                scans: PairingState::new(),
                draft: None,
                capturing: false,
                notice: None,
                next_notice: 0,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AddScan => {
                if self.capturing {
                    return Task::none();
                }
                self.capturing = true;

                Task::perform(
                    capture::capture_scan(self.config.capture.clone()),
                    Message::CaptureFinished,
                )
            }
            Message::CaptureFinished(outcome) => {
                self.capturing = false;

                match outcome {
                    CaptureOutcome::Captured { photo, value } => {
                        let id = self.scans.add_scan(photo, value);
                        info!("📸 New scan {} ({} scans this session)", id, self.scans.len());
                        self.notify("New scan added")
                    }
                    CaptureOutcome::PermissionDenied => self.notify("Camera permission denied"),
                    CaptureOutcome::Cancelled => Task::none(),
                    CaptureOutcome::Incomplete => {
                        debug!("Capture produced no scan");
                        Task::none()
                    }
                }
            }
            Message::Select(id) => {
                match self.scans.select(id) {
                    Ok(Selection::Pending(id)) => debug!("{} waiting for a partner", id),
                    Ok(Selection::Paired { first, second }) => {
                        info!("🔗 Paired {} with {} ({} pairs)", first, second, self.scans.paired().len());
                    }
                    Err(e) => error!("Ignoring selection: {}", e),
                }
                Task::none()
            }
            Message::DeletePair(first, second) => {
                if self.scans.delete_pair(first, second) {
                    info!("🗑️  Pair ({}, {}) returned to unpaired scans", first, second);
                }
                Task::none()
            }
            Message::OpenSendDialog => {
                let payload = self.default_payload().unwrap_or_else(|e| {
                    error!("Could not encode pairs: {}", e);
                    String::new()
                });
                self.draft = Some(payload);
                Task::none()
            }
            Message::DraftChanged(text) => {
                if let Some(draft) = self.draft.as_mut() {
                    *draft = text;
                }
                Task::none()
            }
            Message::ConfirmSend => {
                let Some(payload) = self.confirm_draft() else {
                    return Task::none();
                };

                Task::perform(
                    logbook::send(self.config.logbook.clone(), payload),
                    |result| Message::SendFinished(result.map_err(|e| e.to_string())),
                )
            }
            Message::DismissSendDialog => {
                self.draft = None;
                Task::none()
            }
            Message::SendFinished(result) => {
                // Never surfaced to the user
                if let Err(e) = result {
                    error!("{}", e);
                }
                Task::none()
            }
            Message::NoticeExpired(id) => {
                if self.notice.as_ref().is_some_and(|notice| notice.id == id) {
                    self.notice = None;
                }
                Task::none()
            }
        }
    }

    /// Close the send dialog, handing back exactly what the user confirmed
    fn confirm_draft(&mut self) -> Option<String> {
        let payload = self.draft.take()?;

        if LogbookEntry::from_json(&payload).is_err() {
            warn!("Payload was edited into something that is not a logbook entry, sending as is");
        }

        Some(payload)
    }

    /// Encoder output used to pre-fill the send dialog
    fn default_payload(&self) -> error::Result<String> {
        Ok(export::encode(&self.config.task_name, self.scans.paired())?)
    }

    /// Show a notice and schedule its removal
    fn notify(&mut self, text: &str) -> Task<Message> {
        let id = self.next_notice;
        self.next_notice += 1;
        self.notice = Some(Notice {
            id,
            text: text.to_string(),
        });

        let lifetime = Duration::from_secs(self.config.notice_seconds);
        Task::perform(
            async move { tokio::time::sleep(lifetime).await },
            move |_| Message::NoticeExpired(id),
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let mut content = column![
            ui::header(self.capturing),
            ui::gallery::view(&self.scans),
        ]
        .spacing(16)
        .padding(16);

        if let Some(notice) = &self.notice {
            content = content.push(ui::notice(&notice.text));
        }

        let base = container(content)
            .width(Length::Fill)
            .height(Length::Fill);

        match &self.draft {
            Some(draft) => stack![
                base,
                opaque(center(ui::dialog::view(draft)).style(|_theme: &Theme| container::Style {
                    background: Some(
                        Color {
                            a: 0.7,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                })),
            ]
            .into(),
            None => base.into(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    let (config, source) = AppConfig::load();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!("Starting Memory v{}", env!("CARGO_PKG_VERSION"));
    source.log();

    iced::application("Memory", Memory::update, Memory::view)
        .theme(Memory::theme)
        .centered()
        .run_with(move || Memory::new(config))
}
