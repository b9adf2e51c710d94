use iced::widget::{
    button, canvas, column, container, horizontal_space, image, row, scrollable, slider, stack,
    text, text_input, Column, Space,
};
use iced::{Alignment, Background, Color, ContentFit, Element, Length, Size, Task, Theme};
use iced_aw::{ColorPicker, Wrap};
use rfd::FileDialog;
use std::sync::Arc;

mod color;
mod config;
mod error;
mod imaging;
mod logging;
mod state;
mod ui;

use config::Settings;
use imaging::{export, loader};
use state::data::{LoadTicket, Mode, Region};
use state::edit::{Adjustment, BRIGHTNESS_RANGE, OFFSET_RANGE, OPACITY_RANGE, ROTATION_RANGE};
use state::editor::{Editor, LoadResult};
use ui::canvas::SelectionOverlay;
use ui::grayscale::{self, GrayscaleProcessor};

/// Height of the preview and selection panes
const PANE_HEIGHT: f32 = 320.0;

/// Main application state
struct NailVisualizer {
    /// Image, regions, color and adjustments
    editor: Editor,
    /// Swatches from the settings file
    palette: Vec<String>,
    /// The unmodified upload, shown under the selection overlay
    source_handle: Option<image::Handle>,
    /// Latest composite
    preview: Option<image::Handle>,
    show_picker: bool,
    /// Export failures for the preview
    notice: Option<String>,
    /// Independent grayscale demo
    grayscale: GrayscaleProcessor,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Choose Image"
    OpenImage,
    /// Background decode finished
    ImageLoaded(LoadTicket, LoadResult),
    /// Free-text color field edited
    ColorText(String),
    /// Palette swatch clicked
    PaletteSelected(String),
    OpenPicker,
    CancelPicker,
    PickerSubmitted(Color),
    AdjustmentChanged(Adjustment, f32),
    ResetAdjustments,
    ToggleMode,
    ClearRegions,
    /// A drag on the selection overlay produced a region
    RegionDrawn(Region),
    SavePreview,
    Grayscale(grayscale::Message),
}

impl NailVisualizer {
    /// Create a new instance of the application
    fn new(settings: Settings) -> (Self, Task<Message>) {
        log::info!(
            "Nail Color Visualizer starting with color {}",
            settings.default_color
        );

        (
            NailVisualizer {
                editor: Editor::new(settings.default_color, settings.adjustments),
                palette: settings.palette,
                source_handle: None,
                preview: None,
                show_picker: false,
                notice: None,
                grayscale: GrayscaleProcessor::default(),
            },
            Task::none(),
        )
    }

    /// Handle application messages, then recompose
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::OpenImage => {
                let folder = FileDialog::new()
                    .set_title("Select Hand Image")
                    .add_filter("PNG, JPG or JPEG", &loader::EDITOR_EXTENSIONS)
                    .pick_file();

                if let Some(path) = folder {
                    let ticket = self.editor.begin_load();
                    return Task::perform(loader::load_image(path), move |result| {
                        Message::ImageLoaded(ticket, result.map(Arc::new).map_err(Arc::new))
                    });
                }
                Task::none()
            }
            Message::ImageLoaded(ticket, result) => {
                if self.editor.finish_load(ticket, result) {
                    self.source_handle = self.editor.source().map(|source| {
                        image::Handle::from_rgba(source.width, source.height, source.data.clone())
                    });
                }
                Task::none()
            }
            Message::ColorText(value) | Message::PaletteSelected(value) => {
                self.editor.set_color(value);
                Task::none()
            }
            Message::OpenPicker => {
                self.show_picker = true;
                Task::none()
            }
            Message::CancelPicker => {
                self.show_picker = false;
                Task::none()
            }
            Message::PickerSubmitted(picked) => {
                self.editor.set_color(color::to_hex(picked));
                self.show_picker = false;
                Task::none()
            }
            Message::AdjustmentChanged(adjustment, value) => {
                self.editor.set_adjustment(adjustment, value);
                Task::none()
            }
            Message::ResetAdjustments => {
                self.editor.reset_adjustments();
                Task::none()
            }
            Message::ToggleMode => {
                self.editor.toggle_mode();
                Task::none()
            }
            Message::ClearRegions => {
                self.editor.clear_regions();
                Task::none()
            }
            Message::RegionDrawn(region) => {
                self.editor.add_region(region);
                Task::none()
            }
            Message::SavePreview => {
                self.save_preview();
                Task::none()
            }
            Message::Grayscale(message) => self.grayscale.update(message).map(Message::Grayscale),
        };

        self.refresh_preview();
        task
    }

    /// Run the compositor and rebuild the preview handle if it produced a new image
    fn refresh_preview(&mut self) {
        if let Some(composite) = self.editor.refresh() {
            self.preview = Some(image::Handle::from_rgba(
                composite.width(),
                composite.height(),
                composite.as_raw().clone(),
            ));
        } else if self.editor.composite().is_none() {
            self.preview = None;
        }
    }

    fn save_preview(&mut self) {
        let Some(composite) = self.editor.composite() else {
            return;
        };
        let target = FileDialog::new()
            .set_title("Save Nail Preview")
            .set_file_name(export::PREVIEW_FILE_NAME)
            .add_filter("PNG", &["png"])
            .save_file();

        if let Some(path) = target {
            self.notice = export::save_png(composite, &path)
                .err()
                .map(|e| e.to_string());
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content = row![
            self.controls_view().width(Length::FillPortion(1)),
            self.preview_view().width(Length::FillPortion(1)),
        ]
        .spacing(30)
        .padding(20);

        scrollable(content).into()
    }

    fn controls_view(&self) -> Column<Message> {
        let upload = column![
            heading("Upload Hand Image"),
            button("Choose Image").on_press(Message::OpenImage).padding(10),
            text("PNG, JPG or JPEG").size(14),
        ]
        .spacing(8);

        let current = color::parse_color(self.editor.color())
            .map(color::to_iced)
            .unwrap_or(Color::BLACK);
        let picker = ColorPicker::new(
            self.show_picker,
            current,
            button(text("Pick Color")).on_press(Message::OpenPicker).padding(8),
            Message::CancelPicker,
            Message::PickerSubmitted,
        );

        let swatches: Vec<Element<Message>> = self
            .palette
            .iter()
            .map(|hex| swatch(hex))
            .collect();

        let colors = column![
            heading("Choose Nail Color"),
            row![picker, color_chip(current)].spacing(10).align_y(Alignment::Center),
            Wrap::with_elements(swatches).spacing(6.0),
            heading("Custom Color"),
            text_input(
                "Enter hex code or color name (e.g., #FF0066 or green)",
                self.editor.color()
            )
            .on_input(Message::ColorText)
            .padding(8),
        ]
        .spacing(8);

        let adjustments = self.editor.adjustments();
        let sliders = [
            ("Brightness", Adjustment::Brightness, BRIGHTNESS_RANGE),
            ("Opacity", Adjustment::Opacity, OPACITY_RANGE),
            ("Rotation", Adjustment::Rotation, ROTATION_RANGE),
            ("Offset X", Adjustment::OffsetX, OFFSET_RANGE),
            ("Offset Y", Adjustment::OffsetY, OFFSET_RANGE),
        ]
        .into_iter()
        .fold(column![heading("Adjustments")].spacing(8), |column, (label, adjustment, range)| {
            let value = adjustments.get(adjustment);
            column.push(
                row![
                    text(format!("{}: {:.0}", label, value)).width(Length::Fixed(120.0)),
                    slider(range, value, move |v| Message::AdjustmentChanged(adjustment, v)).step(1.0),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            )
        });

        let mode_label = match self.editor.mode() {
            Mode::Auto => "Switch to Manual Mode",
            Mode::Manual => "Switch to Auto Mode",
        };
        let actions = row![
            button("Reset Adjustments").on_press(Message::ResetAdjustments).padding(10),
            button(mode_label).on_press(Message::ToggleMode).padding(10),
            button("Clear Nail Areas")
                .on_press_maybe((self.editor.mode() == Mode::Manual).then_some(Message::ClearRegions))
                .padding(10),
        ]
        .spacing(10);

        let mut controls = column![
            text("Nail Color Visualizer").size(32),
            upload,
            colors
        ]
        .spacing(24);

        if let Some(error) = self.editor.error() {
            controls = controls.push(error_text(error));
        }

        controls.push(sliders).push(actions)
    }

    fn preview_view(&self) -> Column<Message> {
        let body: Element<Message> = if self.editor.is_loading() {
            text("Processing...").into()
        } else if let Some(preview) = &self.preview {
            image(preview.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        } else {
            text("Upload an image to see the preview").into()
        };

        let mut column = column![
            heading("Nail Color Preview"),
            pane(body),
            row![
                horizontal_space(),
                button("Save Preview")
                    .on_press_maybe(self.preview.is_some().then_some(Message::SavePreview))
                    .padding(8),
            ],
        ]
        .spacing(10);

        if let Some(notice) = &self.notice {
            column = column.push(error_text(notice));
        }

        if let (Mode::Manual, Some(source), Some(handle)) =
            (self.editor.mode(), self.editor.source(), &self.source_handle)
        {
            let overlay = SelectionOverlay {
                image_size: Size::new(source.width as f32, source.height as f32),
                regions: self.editor.regions(),
            };
            let selection = stack![
                image(handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill),
                canvas(overlay).width(Length::Fill).height(Length::Fill),
            ];

            column = column
                .push(heading("Draw Nail Areas"))
                .push(text("Drag on the image to outline each nail").size(14))
                .push(pane(selection.into()));
        }

        column
            .push(Space::with_height(Length::Fixed(20.0)))
            .push(self.grayscale.view().map(Message::Grayscale))
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn heading(label: &str) -> iced::widget::Text<'_> {
    text(label).size(20)
}

fn error_text(message: &str) -> iced::widget::Text<'_> {
    text(message).color(Color::from_rgb(0.9, 0.2, 0.2))
}

/// Bordered fixed-height box around a preview
fn pane(content: Element<Message>) -> Element<Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fixed(PANE_HEIGHT))
        .padding(8)
        .center_x(Length::Fill)
        .center_y(Length::Fixed(PANE_HEIGHT))
        .style(container::bordered_box)
        .into()
}

/// Small filled square showing a color
fn color_chip<'a>(color: Color) -> Element<'a, Message> {
    container(Space::new(Length::Fixed(36.0), Length::Fixed(36.0)))
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(color)),
            ..container::Style::default()
        })
        .into()
}

/// Clickable palette swatch
fn swatch<'a>(hex: &str) -> Element<'a, Message> {
    let fill = color::parse_color(hex)
        .map(color::to_iced)
        .unwrap_or(Color::BLACK);

    button(Space::new(Length::Fixed(48.0), Length::Fixed(28.0)))
        .style(move |_theme: &Theme, _status| button::Style {
            background: Some(Background::Color(fill)),
            ..button::Style::default()
        })
        .on_press(Message::PaletteSelected(hex.to_string()))
        .into()
}

fn main() -> iced::Result {
    // Settings are read before the logger exists; problems are reported once it does
    let loaded = Settings::load();
    let level = loaded
        .as_ref()
        .map(|settings| settings.log_level.clone())
        .unwrap_or_else(|_| config::DEFAULT_LOG_LEVEL.to_string());

    let _logger = match logging::setup_logging(&level) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Logger initialization failed: {}", e);
            None
        }
    };

    let settings = loaded.unwrap_or_else(|e| {
        log::warn!("{}; using default settings", e);
        Settings::default()
    });
    if let Ok(json) = settings.to_json() {
        log::debug!("Effective settings:\n{}", json);
    }

    iced::application(
        "Nail Color Visualizer",
        NailVisualizer::update,
        NailVisualizer::view,
    )
    .theme(NailVisualizer::theme)
    .window_size(Size::new(1280.0, 860.0))
    .centered()
    .run_with(move || NailVisualizer::new(settings))
}
