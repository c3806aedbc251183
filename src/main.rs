use iced::widget::{button, column, container, row, text, Column};
use iced::{Alignment, Color, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod convert;
mod state;

use config::AppConfig;
use convert::{ConversionGate, SourceFile};
use state::session::{ConversionOutcome, Session};

/// Extensions offered by the file picker. Classification still happens on
/// content, this only narrows the dialog.
const PICKER_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "ico", "bmp", "webp", "tif", "tiff",
];

const ERROR_COLOR: Color = Color::from_rgb(0.94, 0.27, 0.27);
const MUTED_COLOR: Color = Color::from_rgb(0.61, 0.64, 0.69);

/// Main application state
struct ConvertTool {
    config: AppConfig,
    gate: ConversionGate,
    /// Select / convert / result state machine
    session: Session,
    /// Outcome of the last "download" (save) action
    save_status: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Choose file"
    ChooseFile,
    /// User clicked "Convert to PNG"
    Convert,
    /// Background conversion finished for the given request generation
    ConversionComplete(u64, ConversionOutcome),
    /// User clicked "Download Converted Image"
    Download,
    /// Background save finished
    Saved(Result<PathBuf, String>),
}

impl ConvertTool {
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        tracing::info!("{} v{} ready", config.title, env!("CARGO_PKG_VERSION"));

        (
            ConvertTool {
                config,
                gate: ConversionGate::default(),
                session: Session::new(),
                save_status: None,
            },
            Task::none(),
        )
    }

    fn title(&self) -> String {
        self.config.title.clone()
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ChooseFile => {
                let picked = FileDialog::new()
                    .set_title("Choose file")
                    .add_filter("Images", PICKER_EXTENSIONS)
                    .add_filter("All files", &["*"])
                    .pick_file();

                if let Some(path) = picked {
                    self.session.select_file(SourceFile::from_path(path));
                    self.save_status = None;
                }

                Task::none()
            }
            Message::Convert => {
                let Some(request) = self.session.trigger() else {
                    return Task::none();
                };
                self.save_status = None;

                let gate = self.gate.clone();
                let generation = request.generation;

                Task::perform(
                    async move { ConversionOutcome::from(gate.convert(&request.file).await) },
                    move |outcome| Message::ConversionComplete(generation, outcome),
                )
            }
            Message::ConversionComplete(generation, outcome) => {
                self.session.finish(generation, outcome);
                Task::none()
            }
            Message::Download => {
                let Some(artifact) = self.session.artifact() else {
                    return Task::none();
                };

                let target = FileDialog::new()
                    .set_title("Save converted image")
                    .set_file_name(artifact.name.clone())
                    .add_filter("PNG image", &["png"])
                    .save_file();

                match target {
                    Some(path) => Task::perform(
                        save_artifact(path, artifact.bytes.clone()),
                        Message::Saved,
                    ),
                    None => Task::none(),
                }
            }
            Message::Saved(result) => {
                self.save_status = Some(match result {
                    Ok(path) => {
                        tracing::info!(path = %path.display(), "saved converted image");
                        format!("Saved to {}", path.display())
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to save converted image");
                        format!("Could not save image: {}", e)
                    }
                });
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = column![
            text(&self.config.heading).size(48),
            text(&self.config.tagline).size(16).color(MUTED_COLOR),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let file_label = self
            .session
            .file()
            .map(|file| file.name().to_string())
            .unwrap_or_else(|| "No file chosen".to_string());

        let picker = row![
            button("Choose file").on_press(Message::ChooseFile).padding(10),
            text(file_label).size(16),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let convert_label = if self.session.is_converting() {
            "Converting..."
        } else {
            "Convert to PNG"
        };
        let convert = button(convert_label)
            .on_press_maybe(self.session.can_convert().then_some(Message::Convert))
            .padding(10);

        let mut content: Column<Message> = column![header, picker, convert]
            .spacing(20)
            .padding(40)
            .align_x(Alignment::Center);

        if let Some(error) = self.session.error() {
            content = content.push(text(error).size(16).color(ERROR_COLOR));
        }

        if let Some(preview) = self.session.preview() {
            content = content.push(
                column![
                    text("Converted Image:").size(24),
                    iced::widget::image(preview.handle().clone())
                        .width(Length::Fixed(self.config.preview_width)),
                    button("Download Converted Image")
                        .on_press(Message::Download)
                        .padding(10),
                ]
                .spacing(12)
                .align_x(Alignment::Center),
            );
        }

        if let Some(status) = &self.save_status {
            content = content.push(text(status).size(14).color(MUTED_COLOR));
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    let config = AppConfig::from_env();
    init_logging(&config);

    iced::application(ConvertTool::title, ConvertTool::update, ConvertTool::view)
        .theme(ConvertTool::theme)
        .centered()
        .run_with(move || ConvertTool::new(config))
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    fmt().with_env_filter(filter).with_target(true).init();
}

/// Write the converted bytes to the path picked in the save dialog
async fn save_artifact(path: PathBuf, bytes: Arc<[u8]>) -> Result<PathBuf, String> {
    tokio::fs::write(&path, &bytes[..])
        .await
        .map_err(|e| e.to_string())?;
    Ok(path)
}
