use iced::alignment;
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Frame, Path, Program, Stroke, Text};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::state::data::Region;
use crate::state::selection::Selection;
use crate::Message;

/// Stroke and label color of committed regions (#FF0066)
const REGION_COLOR: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 0.4,
    a: 1.0,
};
/// Stroke color of the rectangle being dragged (#00FF00)
const CANDIDATE_COLOR: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};
const STROKE_WIDTH: f32 = 2.0;
const LABEL_SIZE: f32 = 12.0;

/// Placement of an image drawn with "contain" fit inside a widget.
///
/// Converts between widget-local points and image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFit {
    /// Natural image size
    pub image: Size,
    /// Where the image lands inside the widget
    pub displayed: Rectangle,
}

impl ImageFit {
    /// Scale the image uniformly to fit `bounds` and center it
    pub fn contain(image: Size, bounds: Size) -> Self {
        let scale = if image.width > 0.0 && image.height > 0.0 {
            (bounds.width / image.width).min(bounds.height / image.height)
        } else {
            0.0
        };
        let size = Size::new(image.width * scale, image.height * scale);
        let origin = Point::new(
            (bounds.width - size.width) / 2.0,
            (bounds.height - size.height) / 2.0,
        );
        Self {
            image,
            displayed: Rectangle::new(origin, size),
        }
    }

    /// Image pixels per displayed pixel along x and y
    fn scale(&self) -> Option<(f32, f32)> {
        (self.displayed.width > 0.0 && self.displayed.height > 0.0).then(|| {
            (
                self.image.width / self.displayed.width,
                self.image.height / self.displayed.height,
            )
        })
    }

    /// Map a widget-local point to image space; `None` outside the image
    pub fn to_image(&self, local: Point) -> Option<Point> {
        if !self.displayed.contains(local) {
            return None;
        }
        self.to_image_clamped(local)
    }

    /// Map a widget-local point to image space, clamped to the image edges
    pub fn to_image_clamped(&self, local: Point) -> Option<Point> {
        let (scale_x, scale_y) = self.scale()?;
        let x = ((local.x - self.displayed.x) * scale_x).clamp(0.0, self.image.width);
        let y = ((local.y - self.displayed.y) * scale_y).clamp(0.0, self.image.height);
        Some(Point::new(x, y))
    }

    /// Map an image-space rectangle to widget-local coordinates
    pub fn to_widget(&self, region: &Region) -> Rectangle {
        let (scale_x, scale_y) = self.scale().unwrap_or((1.0, 1.0));
        Rectangle {
            x: self.displayed.x + region.x / scale_x,
            y: self.displayed.y + region.y / scale_y,
            width: region.width / scale_x,
            height: region.height / scale_y,
        }
    }
}

/// Manual-mode overlay drawn on top of the source image.
///
/// Shows the committed regions and lets the user drag out new ones. The
/// drag lives in the canvas state; only finished regions are sent up.
pub struct SelectionOverlay<'a> {
    /// Natural size of the source image
    pub image_size: Size,
    /// Committed regions, labelled in order
    pub regions: &'a [Region],
}

impl<'a> SelectionOverlay<'a> {
    fn fit(&self, bounds: Rectangle) -> ImageFit {
        ImageFit::contain(self.image_size, bounds.size())
    }
}

impl<'a> Program<Message> for SelectionOverlay<'a> {
    type State = Selection;

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let fit = self.fit(bounds);

        for (index, region) in self.regions.iter().enumerate() {
            let rect = fit.to_widget(region);
            frame.stroke(
                &Path::rectangle(rect.position(), rect.size()),
                Stroke::default().with_color(REGION_COLOR).with_width(STROKE_WIDTH),
            );
            frame.fill_text(Text {
                content: format!("Nail {}", index + 1),
                position: Point::new(rect.x, rect.y - 5.0),
                color: REGION_COLOR,
                size: LABEL_SIZE.into(),
                vertical_alignment: alignment::Vertical::Bottom,
                ..Text::default()
            });
        }

        if let Some(candidate) = state.candidate() {
            let rect = fit.to_widget(&candidate.normalized());
            frame.stroke(
                &Path::rectangle(rect.position(), rect.size()),
                Stroke::default().with_color(CANDIDATE_COLOR).with_width(STROKE_WIDTH),
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let fit = self.fit(bounds);
        let local = |position: Point| Point::new(position.x - bounds.x, position.y - bounds.y);

        match event {
            // Button press inside the image - start a candidate
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(point) = cursor.position_in(bounds).and_then(|p| fit.to_image(p)) {
                    state.press(point.x, point.y);
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Cursor move - resize the candidate, even outside the widget.
            // The event position is not shifted by enclosing scrollables; the cursor is.
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_drawing() {
                    if let Some(point) = cursor.position().and_then(|p| fit.to_image_clamped(local(p))) {
                        state.drag(point.x, point.y);
                        return (canvas::event::Status::Captured, None);
                    }
                }
            }

            // Button release - normalize and maybe commit
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_drawing() {
                    let committed = state.release().map(Message::RegionDrawn);
                    return (canvas::event::Status::Captured, committed);
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        let over_image = cursor
            .position_in(bounds)
            .and_then(|p| self.fit(bounds).to_image(p))
            .is_some();
        if over_image {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
