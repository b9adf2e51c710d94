/// Grayscale demo panel
///
/// Load any image, convert it to grayscale and save the result as PNG.
/// Owns its own state and shares nothing with the nail editor.
use iced::widget::{button, column, image, row, text};
use iced::{Element, Length, Task};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Error;
use crate::imaging::{export, grayscale, loader};
use crate::state::data::{LoadCounter, LoadTicket, SourceImage};
use crate::state::editor::LoadResult;

#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Choose Image"
    Upload,
    /// Background load finished
    Loaded(LoadTicket, LoadResult),
    /// User clicked "Process Image"
    Process,
    /// User clicked "Save Processed Image"
    Save,
}

struct Processed {
    pixels: ::image::RgbaImage,
    handle: image::Handle,
}

#[derive(Default)]
pub struct GrayscaleProcessor {
    original: Option<Arc<SourceImage>>,
    processed: Option<Processed>,
    error: Option<String>,
    loads: LoadCounter,
}

impl GrayscaleProcessor {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Upload => {
                let extensions = loader::decodable_extensions();
                let picked = FileDialog::new()
                    .set_title("Select an Image")
                    .add_filter("Images", extensions.as_slice())
                    .pick_file();

                if let Some(path) = picked {
                    return self.load(path);
                }
                Task::none()
            }
            Message::Loaded(ticket, result) => {
                self.apply_load(ticket, result);
                Task::none()
            }
            Message::Process => {
                self.process();
                Task::none()
            }
            Message::Save => {
                let Some(processed) = &self.processed else {
                    return Task::none();
                };
                let target = FileDialog::new()
                    .set_title("Save Processed Image")
                    .set_file_name(export::PROCESSED_FILE_NAME)
                    .add_filter("PNG", &["png"])
                    .save_file();

                if let Some(path) = target {
                    if let Err(e) = export::save_png(&processed.pixels, &path) {
                        log::warn!("{}", e);
                        self.error = Some(e.to_string());
                    }
                }
                Task::none()
            }
        }
    }

    fn load(&mut self, path: PathBuf) -> Task<Message> {
        let ticket = self.loads.begin();
        Task::perform(loader::load_image(path), move |result| {
            Message::Loaded(ticket, result.map(Arc::new).map_err(Arc::new))
        })
    }

    fn apply_load(&mut self, ticket: LoadTicket, result: LoadResult) {
        if !self.loads.is_current(ticket) {
            log::debug!("Ignoring superseded grayscale load {:?}", ticket);
            return;
        }
        match result {
            Ok(source) => {
                self.original = Some(source);
                self.processed = None;
                self.error = None;
            }
            Err(error) => match &*error {
                Error::Read { .. } => self.error = Some(error.to_string()),
                other => log::warn!("Grayscale load failed: {}", other),
            },
        }
    }

    fn process(&mut self) {
        let Some(original) = &self.original else {
            return;
        };
        match grayscale::grayscale(original) {
            Ok(pixels) => {
                let handle =
                    image::Handle::from_rgba(pixels.width(), pixels.height(), pixels.as_raw().clone());
                self.processed = Some(Processed { pixels, handle });
            }
            Err(e) => {
                log::warn!("Grayscale failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn view(&self) -> Element<Message> {
        let controls = row![
            button("Choose Image").on_press(Message::Upload).padding(8),
            button("Process Image")
                .on_press_maybe(self.original.is_some().then_some(Message::Process))
                .padding(8),
        ]
        .spacing(10);

        let mut content = column![text("Image Processor").size(20), controls].spacing(10);

        if let Some(error) = &self.error {
            content = content.push(text(error.as_str()).color(iced::Color::from_rgb(0.9, 0.2, 0.2)));
        }

        if let Some(processed) = &self.processed {
            content = content
                .push(
                    image(processed.handle.clone())
                        .width(Length::Fill)
                        .height(Length::Fixed(240.0)),
                )
                .push(button("Save Processed Image").on_press(Message::Save).padding(8));
        }

        content.into()
    }
}
