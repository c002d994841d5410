//! Crossterm backend that writes queued kitty graphics placements after
//! ratatui has flushed the cell diff.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::{cursor::MoveTo, queue, style::Print};
use ratatui::backend::{Backend, ClearType, CrosstermBackend, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};

use crate::artwork::KITTY_IMAGE_ID;

/// Deletes the artwork's placements and frees its image data.
fn delete_sequence() -> String {
    format!("\x1b_Ga=d,d=I,i={KITTY_IMAGE_ID}\x1b\\")
}

/// One image placement: top-left cell plus the escape sequence to draw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub sequence: String,
}

/// Placements for the next draw. Components write, the backend reads.
#[derive(Default, Debug, Clone)]
pub struct PlacementQueue {
    placements: Vec<Placement>,
}

impl PlacementQueue {
    pub fn replace(&mut self, placement: Placement) {
        self.placements.clear();
        self.placements.push(placement);
    }

    pub fn clear(&mut self) {
        self.placements.clear();
    }

    pub fn snapshot(&self) -> Vec<Placement> {
        self.placements.clone()
    }
}

static QUEUE: OnceLock<Arc<Mutex<PlacementQueue>>> = OnceLock::new();

pub fn placement_queue() -> Arc<Mutex<PlacementQueue>> {
    QUEUE
        .get_or_init(|| Arc::new(Mutex::new(PlacementQueue::default())))
        .clone()
}

/// Draw `sequence` at cell (`x`, `y`) on the next frame, replacing any
/// previous placement.
pub fn place(x: u16, y: u16, sequence: String) {
    let queue = placement_queue();
    let mut queue = queue.lock().expect("placement queue lock");
    queue.replace(Placement { x, y, sequence });
}

pub fn clear() {
    let queue = placement_queue();
    let mut queue = queue.lock().expect("placement queue lock");
    queue.clear();
}

#[derive(Debug, Clone)]
pub struct KittyBackend<W: Write> {
    inner: CrosstermBackend<W>,
    queue: Arc<Mutex<PlacementQueue>>,
    drew_image: bool,
}

impl<W: Write> KittyBackend<W> {
    pub fn new(writer: W, queue: Arc<Mutex<PlacementQueue>>) -> Self {
        Self {
            inner: CrosstermBackend::new(writer),
            queue,
            drew_image: false,
        }
    }
}

impl<W: Write> Backend for KittyBackend<W> {
    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.inner.draw(content)?;
        let placements = {
            let queue = self.queue.lock().expect("placement queue lock");
            queue.snapshot()
        };
        if self.drew_image {
            queue!(self.inner, Print(delete_sequence()))?;
        }
        self.drew_image = !placements.is_empty();
        for placement in placements {
            queue!(
                self.inner,
                MoveTo(placement.x, placement.y),
                Print(placement.sequence)
            )?;
        }
        Ok(())
    }

    fn append_lines(&mut self, n: u16) -> io::Result<()> {
        self.inner.append_lines(n)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.inner.hide_cursor()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.inner.show_cursor()
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        self.inner.get_cursor_position()
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        self.inner.set_cursor_position(position)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.inner.clear()
    }

    fn clear_region(&mut self, clear_type: ClearType) -> io::Result<()> {
        self.inner.clear_region(clear_type)
    }

    fn size(&self) -> io::Result<Size> {
        self.inner.size()
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        self.inner.window_size()
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.inner)
    }
}

impl<W: Write> Write for KittyBackend<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.inner)
    }
}
