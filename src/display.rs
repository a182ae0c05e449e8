use crate::error::Result;
use crate::graph::RenderedFigure;
use std::io::Write;

/// Receiver for finished figures (a window, a notebook cell, a byte stream)
pub trait DisplaySurface {
    fn show(&mut self, figure: RenderedFigure) -> Result<()>;
}

/// Writes each figure's PNG bytes to the wrapped writer, back to back
pub struct PngWriter<W: Write> {
    writer: W,
}

impl<W: Write> PngWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DisplaySurface for PngWriter<W> {
    fn show(&mut self, figure: RenderedFigure) -> Result<()> {
        self.writer.write_all(&figure.png)?;
        self.writer.flush()?;
        tracing::info!(
            title = figure.title.as_deref().unwrap_or(""),
            bytes = figure.png.len(),
            "figure written"
        );
        Ok(())
    }
}

/// Keeps every shown figure in memory
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    pub shown: Vec<RenderedFigure>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySurface for MemoryDisplay {
    fn show(&mut self, figure: RenderedFigure) -> Result<()> {
        self.shown.push(figure);
        Ok(())
    }
}
