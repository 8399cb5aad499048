//! Active tool, stroke style and the single live interaction.

use super::tool::ToolKind;
use crate::config::CancelPolicy;
use crate::draw::shape::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
use crate::draw::{Canvas, Color, EngineError, Point, StrokeStyle, color::BLACK};

/// Default stroke width in pixels.
pub const DEFAULT_WIDTH: f64 = 5.0;

/// Initial state for a [`ToolController`].
#[derive(Debug, Clone)]
pub struct ToolDefaults {
    pub tool: ToolKind,
    pub color: Color,
    pub width: f64,
    /// Preset widths visited by [`ToolController::adjust_width`], ascending.
    pub brush_sizes: Vec<f64>,
    pub cancel_policy: CancelPolicy,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            tool: ToolKind::Freehand,
            color: BLACK,
            width: DEFAULT_WIDTH,
            brush_sizes: vec![1.0, 3.0, 5.0, 8.0, 12.0, 16.0, 20.0],
            cancel_policy: CancelPolicy::Commit,
        }
    }
}

/// The drag currently in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveInteraction {
    pub tool: ToolKind,
    /// Where the pointer went down
    pub start: Point,
    /// Most recent pointer position seen for this drag
    pub last: Point,
}

/// Owns the active tool, color and width, plus at most one live interaction.
///
/// Setters are only honored while no interaction is live, so every primitive
/// of one stroke or shape is drawn with the same style.
#[derive(Debug)]
pub struct ToolController {
    tool: ToolKind,
    color: Color,
    width: f64,
    brush_sizes: Vec<f64>,
    cancel_policy: CancelPolicy,
    live: Option<LiveInteraction>,
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new(ToolDefaults::default())
    }
}

impl ToolController {
    pub fn new(defaults: ToolDefaults) -> Self {
        let mut brush_sizes: Vec<f64> = defaults
            .brush_sizes
            .into_iter()
            .filter(|w| w.is_finite() && *w > 0.0)
            .map(clamp_width)
            .collect();
        brush_sizes.sort_by(f64::total_cmp);
        brush_sizes.dedup();

        let width = if defaults.width.is_finite() && defaults.width > 0.0 {
            clamp_width(defaults.width)
        } else {
            DEFAULT_WIDTH
        };

        Self {
            tool: defaults.tool,
            color: defaults.color,
            width,
            brush_sizes,
            cancel_policy: defaults.cancel_policy,
            live: None,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn cancel_policy(&self) -> CancelPolicy {
        self.cancel_policy
    }

    /// The drag in progress, if any.
    pub fn live(&self) -> Option<&LiveInteraction> {
        self.live.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Current color and width as a stroke style.
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle::new(self.color, self.width)
    }

    /// Starts a drag at `point`.
    ///
    /// Clears any stale preview. Stroke tools paint a zero-length segment so
    /// a plain click leaves a dot.
    pub fn begin_interaction(&mut self, canvas: &mut Canvas, point: Point) -> Result<(), EngineError> {
        if self.live.is_some() {
            return Err(EngineError::InvalidState("interaction already in progress"));
        }
        if self.tool == ToolKind::Text {
            return Err(EngineError::UnsupportedTool(self.tool));
        }
        ensure_finite(point)?;

        canvas.clear_preview()?;
        if self.tool.is_stroke() {
            let erasing = self.tool == ToolKind::Erase;
            canvas.draw_segment(point, point, &self.style(), erasing)?;
        }

        self.live = Some(LiveInteraction {
            tool: self.tool,
            start: point,
            last: point,
        });
        Ok(())
    }

    /// Extends the drag to `point`.
    ///
    /// Stroke tools paint `last -> point` onto the surface right away. Shape
    /// tools only redraw the dashed preview from the start point.
    pub fn continue_interaction(&mut self, canvas: &mut Canvas, point: Point) -> Result<(), EngineError> {
        let style = self.style();
        let live = self
            .live
            .as_mut()
            .ok_or(EngineError::InvalidState("no interaction in progress"))?;
        ensure_finite(point)?;

        if let Some(kind) = live.tool.shape_kind() {
            canvas.draw_preview(kind, live.start, point, &style)?;
        } else {
            let erasing = live.tool == ToolKind::Erase;
            canvas.draw_segment(live.last, point, &style, erasing)?;
        }
        live.last = point;
        Ok(())
    }

    /// Finishes the drag at `point` and records one history entry.
    ///
    /// Stroke tools draw nothing further. Shape tools paint their final
    /// outline from the start point to `point` and clear the preview. The
    /// preview is cleared even when the outline cannot be drawn, in which
    /// case nothing is committed.
    pub fn end_interaction(&mut self, canvas: &mut Canvas, point: Point) -> Result<(), EngineError> {
        let live = self
            .live
            .take()
            .ok_or(EngineError::InvalidState("no interaction in progress"))?;

        if let Some(kind) = live.tool.shape_kind() {
            let drawn = ensure_finite(point)
                .and_then(|()| canvas.draw_shape(kind, live.start, point, &self.style()));
            canvas.clear_preview()?;
            drawn?;
        }
        canvas.commit()?;
        log::debug!(
            "Committed {} from ({:.1}, {:.1}) to ({:.1}, {:.1})",
            live.tool,
            live.start.x,
            live.start.y,
            point.x,
            point.y
        );
        Ok(())
    }

    /// Handles an abandoned drag (pointer left the surface) per the cancel policy.
    ///
    /// `Commit` ends the interaction at the last tracked point; `Discard`
    /// drops it as if it never happened.
    pub fn cancel_interaction(&mut self, canvas: &mut Canvas) -> Result<(), EngineError> {
        let live = *self
            .live
            .as_ref()
            .ok_or(EngineError::InvalidState("no interaction in progress"))?;

        match self.cancel_policy {
            CancelPolicy::Commit => self.end_interaction(canvas, live.last),
            CancelPolicy::Discard => self.discard_interaction(canvas),
        }
    }

    /// Drops the live interaction without recording anything.
    ///
    /// Shape previews are cleared; stroke pixels already painted are rolled
    /// back to the last committed snapshot.
    pub fn discard_interaction(&mut self, canvas: &mut Canvas) -> Result<(), EngineError> {
        let live = self
            .live
            .take()
            .ok_or(EngineError::InvalidState("no interaction in progress"))?;

        if live.tool.is_stroke() {
            canvas.revert_uncommitted()?;
        } else {
            canvas.clear_preview()?;
        }
        log::debug!("Discarded {} interaction", live.tool);
        Ok(())
    }

    /// Forgets the live interaction without touching any buffer.
    ///
    /// Used when the canvas is about to be reallocated anyway.
    pub fn abort_interaction(&mut self) {
        if let Some(live) = self.live.take() {
            log::debug!("Aborted {} interaction", live.tool);
        }
    }

    pub fn set_tool(&mut self, tool: ToolKind) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.tool = tool;
        Ok(())
    }

    pub fn set_color(&mut self, color: Color) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.color = color;
        Ok(())
    }

    /// Sets the stroke width, clamped to the supported range.
    ///
    /// Non-finite and non-positive widths are rejected.
    pub fn set_width(&mut self, width: f64) -> Result<(), EngineError> {
        self.ensure_idle()?;
        if !width.is_finite() || width <= 0.0 {
            return Err(EngineError::InvalidWidth(width));
        }
        self.width = clamp_width(width);
        Ok(())
    }

    /// Steps the width `steps` presets up (positive) or down (negative).
    ///
    /// Without presets beyond the current width, moves by one pixel per step.
    pub fn adjust_width(&mut self, steps: i32) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let mut width = self.width;
        for _ in 0..steps.unsigned_abs() {
            width = if steps > 0 {
                self.brush_sizes
                    .iter()
                    .copied()
                    .find(|w| *w > width)
                    .unwrap_or(width + 1.0)
            } else {
                self.brush_sizes
                    .iter()
                    .rev()
                    .copied()
                    .find(|w| *w < width)
                    .unwrap_or(width - 1.0)
            };
            width = clamp_width(width);
        }
        self.width = width;
        log::debug!("Width adjusted to {:.1}px", self.width);
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.live.is_some() {
            Err(EngineError::InvalidState("cannot change tool settings during an interaction"))
        } else {
            Ok(())
        }
    }
}

fn ensure_finite(point: Point) -> Result<(), EngineError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidState("non-finite pointer position"))
    }
}

fn clamp_width(width: f64) -> f64 {
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}
