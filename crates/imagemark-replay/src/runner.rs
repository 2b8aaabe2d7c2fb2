//! Drives a marker board from a scene and writes what it reports.

use crate::error::ReplayResult;
use crate::scene::{Scene, Step};
use imagemark_core::{
    AlignmentGuide, ChangeEvent, ImageLoadError, InteractionEvent, Key, Marker, MarkerBoard, MarkerId,
    PointerInput,
};
use kurbo::{Point, Size};
use serde::Serialize;
use std::io::Write;

/// Something the board reported while a step ran.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Record<'a> {
    Change(&'a ChangeEvent),
    Interaction(&'a InteractionEvent),
    Guides(&'a [AlignmentGuide]),
}

/// One output line. Step 0 is scene setup.
#[derive(Debug, Serialize)]
struct Line<'a> {
    step: usize,
    #[serde(flatten)]
    record: Record<'a>,
}

/// Replays scene steps against a board, writing JSON lines to `out`.
pub struct Replay<W: Write> {
    board: MarkerBoard,
    out: W,
    step: usize,
}

impl<W: Write> Replay<W> {
    /// Build the board for a scene and report its image outcome.
    pub fn new(scene: &Scene, out: W) -> ReplayResult<Self> {
        let mut board = MarkerBoard::with_markers(scene.config.clone(), scene.markers.clone());
        if let Some(message) = &scene.image_error {
            board.image_failed(ImageLoadError::Other(message.clone()));
        } else if let Some(image) = scene.image {
            board.image_loaded(Size::new(image.width, image.height));
        }

        let mut replay = Self { board, out, step: 0 };
        replay.flush()?;
        Ok(replay)
    }

    /// Run every step, returning the final markers.
    pub fn run(mut self, steps: &[Step]) -> ReplayResult<Vec<Marker>> {
        for step in steps {
            self.step += 1;
            self.apply(step)?;
            self.flush()?;
        }
        log::info!("Replayed {} steps, {} markers", self.step, self.board.markers().len());
        Ok(self.board.markers().to_vec())
    }

    fn apply(&mut self, step: &Step) -> ReplayResult<()> {
        log::debug!("Step {}: {:?}", self.step, step);
        match step {
            Step::Add { marker } => {
                self.board.add_marker(marker.clone());
            }
            Step::Update { id, update } => {
                self.board.update_marker(id, update.clone());
            }
            Step::Delete { id } => {
                self.board.delete_marker(id);
            }
            Step::Select { ids } => self.board.select_markers(ids),
            Step::ClearSelection => self.board.clear_selection(),
            Step::Click { x, y, modifiers } => {
                let input = PointerInput::new(Point::new(*x, *y), *modifiers);
                match self.hit(input.position) {
                    Some(id) => self.board.click_marker(&id, input),
                    None => {
                        self.board.click_canvas(input);
                    }
                }
            }
            Step::DoubleClick { x, y, modifiers } => {
                let input = PointerInput::new(Point::new(*x, *y), *modifiers);
                if let Some(id) = self.hit(input.position) {
                    self.board.double_click_marker(&id, input);
                }
            }
            Step::Hover { id } => self.board.hover_marker(id),
            Step::Leave { id } => self.board.leave_marker(id),
            Step::Drag { id, path } => {
                if self.board.drag_start(id) {
                    for center in path {
                        self.board.drag_move(id, *center);
                        self.write_guides()?;
                    }
                    self.board.drag_end(id);
                }
            }
            Step::Resize {
                id,
                handle,
                rects,
                scale_x,
                scale_y,
                centers,
            } => {
                if self.board.transform_start(id, *handle) {
                    for rect in rects {
                        self.board.transform_move(*rect);
                        self.write_guides()?;
                    }
                    let centers: Vec<(MarkerId, Point)> =
                        centers.iter().map(|(id, p)| (id.clone(), *p)).collect();
                    self.board.transform_end(*scale_x, *scale_y, &centers);
                }
            }
            Step::Key { key, modifiers } => {
                self.board.key_down(&Key::from_name(key), *modifiers);
            }
            Step::ResizeContainer { width, height } => self.board.resize_container(*width, *height),
            Step::ImageLoaded { width, height } => self.board.image_loaded(Size::new(*width, *height)),
            Step::ImageFailed { message } => {
                self.board.image_failed(ImageLoadError::Other(message.clone()));
            }
        }
        Ok(())
    }

    fn hit(&self, point: Point) -> Option<MarkerId> {
        self.board.marker_at(point).map(|m| m.id.clone())
    }

    fn write_guides(&mut self) -> ReplayResult<()> {
        let guides = self.board.alignment_guides();
        if guides.is_empty() {
            return Ok(());
        }
        write_line(&mut self.out, self.step, Record::Guides(guides))
    }

    /// Drain the board's queues into the output.
    fn flush(&mut self) -> ReplayResult<()> {
        for event in self.board.poll_events() {
            write_line(&mut self.out, self.step, Record::Change(&event))?;
        }
        for interaction in self.board.poll_interactions() {
            write_line(&mut self.out, self.step, Record::Interaction(&interaction))?;
        }
        Ok(())
    }
}

fn write_line<W: Write>(out: &mut W, step: usize, record: Record<'_>) -> ReplayResult<()> {
    serde_json::to_writer(&mut *out, &Line { step, record })?;
    writeln!(out)?;
    Ok(())
}

/// Replay a whole scene into `out`.
pub fn replay_scene<W: Write>(scene: &Scene, out: W) -> ReplayResult<Vec<Marker>> {
    Replay::new(scene, out)?.run(&scene.steps)
}
