//! Designer screen geometry for mouse handling
//!
//! The designer view is split into three columns:
//!
//! ```text
//! Row 0-2:  Header (3 rows with borders)
//! Row 3+:   Palette (22 cols) | Canvas | Properties (40 cols)
//! Bottom:   Status bar (1 row)
//! ```
//!
//! [`DesignerLayout`] is computed from the current designer state for every
//! frame and every mouse event, so drop regions always describe the elements
//! that are actually on screen.

use crate::builder::registry::{behavior_of, lookup, PaletteGroup};
use crate::builder::{Designer, DragSource, DropTarget, ElementId, FieldTypeTag, Half};
use ratatui::layout::Rect;

/// Height of the header bar (with borders: top + content + bottom)
pub const HEADER_HEIGHT: u16 = 3;
/// Height of the status bar
pub const STATUS_BAR_HEIGHT: u16 = 1;
pub const PALETTE_WIDTH: u16 = 22;
pub const PROPERTIES_WIDTH: u16 = 40;

/// Area between header and status bar
pub fn content_area(screen: Rect) -> Rect {
    let y = screen.y + HEADER_HEIGHT.min(screen.height);
    Rect {
        x: screen.x,
        y,
        width: screen.width,
        height: screen
            .height
            .saturating_sub(HEADER_HEIGHT + STATUS_BAR_HEIGHT),
    }
}

/// Area inside a one-cell border
pub fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

/// Vertical extent of one element box on the canvas. `top` is relative to
/// the screen and may be negative or past the bottom while scrolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSlot {
    pub id: ElementId,
    pub top: i32,
    pub height: u16,
}

impl ElementSlot {
    fn bottom(&self) -> i32 {
        self.top + i32::from(self.height)
    }

    /// Half of the box `row` falls in. The top half is the first
    /// `height / 2` rows, so an odd middle row belongs to the bottom half.
    pub fn half_at(&self, row: u16) -> Option<Half> {
        let offset = i32::from(row) - self.top;
        if offset < 0 || offset >= i32::from(self.height) {
            return None;
        }
        if offset < i32::from(self.height / 2) {
            Some(Half::Top)
        } else {
            Some(Half::Bottom)
        }
    }

    /// The part of the box inside `clip`, with the rows cut off above it
    pub fn visible(&self, clip: Rect) -> Option<(Rect, u16)> {
        let top = self.top.max(i32::from(clip.y));
        let bottom = self.bottom().min(i32::from(clip.bottom()));
        if top >= bottom {
            return None;
        }
        let hidden_above = u16::try_from(top - self.top).unwrap_or(0);
        let rect = Rect {
            x: clip.x,
            y: u16::try_from(top).unwrap_or(clip.y),
            width: clip.width,
            height: u16::try_from(bottom - top).unwrap_or(0),
        };
        Some((rect, hidden_above))
    }
}

/// What sits under a mouse cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    PaletteButton(FieldTypeTag),
    Element(ElementId, Half),
    /// Canvas outside every element box
    Canvas,
    Palette,
    Properties,
    Outside,
}

#[derive(Debug, Clone)]
pub struct DesignerLayout {
    pub palette: Rect,
    pub canvas: Rect,
    pub properties: Rect,
    /// Section headers of the palette and their row
    pub palette_sections: Vec<(PaletteGroup, u16)>,
    pub palette_buttons: Vec<(FieldTypeTag, Rect)>,
    pub slots: Vec<ElementSlot>,
}

impl DesignerLayout {
    /// Lay out the designer for a full terminal `screen`
    pub fn compute(screen: Rect, designer: &Designer, scroll: u16) -> Self {
        let content = content_area(screen);
        let palette_width = PALETTE_WIDTH.min(content.width);
        let properties_width =
            PROPERTIES_WIDTH.min(content.width.saturating_sub(palette_width));
        let canvas_width = content
            .width
            .saturating_sub(palette_width + properties_width);

        let palette = Rect {
            width: palette_width,
            ..content
        };
        let canvas = Rect {
            x: content.x + palette_width,
            width: canvas_width,
            ..content
        };
        let properties = Rect {
            x: canvas.x + canvas_width,
            width: properties_width,
            ..content
        };

        let (palette_sections, palette_buttons) = Self::palette_rows(inner(palette));
        let slots = Self::element_slots(inner(canvas), designer, scroll);

        Self {
            palette,
            canvas,
            properties,
            palette_sections,
            palette_buttons,
            slots,
        }
    }

    #[allow(clippy::type_complexity)]
    fn palette_rows(area: Rect) -> (Vec<(PaletteGroup, u16)>, Vec<(FieldTypeTag, Rect)>) {
        let mut sections = Vec::new();
        let mut buttons = Vec::new();
        let mut y = area.y;
        for group in [PaletteGroup::Layout, PaletteGroup::Input] {
            if y >= area.bottom() {
                break;
            }
            sections.push((group, y));
            y += 1;
            for tag in palette_order()
                .into_iter()
                .filter(|t| lookup(*t).palette_group() == group)
            {
                if y >= area.bottom() {
                    break;
                }
                buttons.push((
                    tag,
                    Rect {
                        x: area.x,
                        y,
                        width: area.width,
                        height: 1,
                    },
                ));
                y += 1;
            }
            // Blank row between sections
            y += 1;
        }
        (sections, buttons)
    }

    fn element_slots(area: Rect, designer: &Designer, scroll: u16) -> Vec<ElementSlot> {
        let mut top = i32::from(area.y) - i32::from(scroll);
        designer
            .elements()
            .iter()
            .map(|element| {
                let height = slot_height(element);
                let slot = ElementSlot {
                    id: element.id.clone(),
                    top,
                    height,
                };
                top += i32::from(height);
                slot
            })
            .collect()
    }

    /// Canvas rows inside the border
    pub fn canvas_inner(&self) -> Rect {
        inner(self.canvas)
    }

    /// Total height of all element boxes
    pub fn content_height(&self) -> u16 {
        self.slots.iter().map(|s| s.height).sum()
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Hit {
        if contains(self.palette, column, row) {
            return self
                .palette_buttons
                .iter()
                .find(|(_, rect)| contains(*rect, column, row))
                .map(|(tag, _)| Hit::PaletteButton(*tag))
                .unwrap_or(Hit::Palette);
        }
        if contains(self.canvas, column, row) {
            let inner = self.canvas_inner();
            if !contains(inner, column, row) {
                return Hit::Canvas;
            }
            return self
                .slots
                .iter()
                .find_map(|slot| {
                    slot.half_at(row)
                        .map(|half| Hit::Element(slot.id.clone(), half))
                })
                .unwrap_or(Hit::Canvas);
        }
        if contains(self.properties, column, row) {
            return Hit::Properties;
        }
        Hit::Outside
    }

    /// Drag source under the cell: a palette button or an element box
    pub fn source_at(&self, column: u16, row: u16) -> Option<DragSource> {
        match self.hit_test(column, row) {
            Hit::PaletteButton(tag) => Some(DragSource::Palette(tag)),
            Hit::Element(id, _) => Some(DragSource::Element(id)),
            _ => None,
        }
    }

    /// Drop target under the cell
    pub fn target_at(&self, column: u16, row: u16) -> Option<DropTarget> {
        match self.hit_test(column, row) {
            Hit::Element(id, Half::Top) => Some(DropTarget::ElementTop(id)),
            Hit::Element(id, Half::Bottom) => Some(DropTarget::ElementBottom(id)),
            Hit::Canvas => Some(DropTarget::Canvas),
            _ => None,
        }
    }

    /// Scroll offset that brings `id` fully into view, starting from `scroll`
    pub fn scroll_to_show(&self, id: &ElementId, scroll: u16) -> u16 {
        let inner = self.canvas_inner();
        let Some(slot) = self.slots.iter().find(|s| &s.id == id) else {
            return scroll;
        };
        let view_top = i32::from(inner.y);
        let view_bottom = i32::from(inner.bottom());
        let scroll = i32::from(scroll);
        let adjusted = if slot.top < view_top {
            scroll - (view_top - slot.top)
        } else if slot.bottom() > view_bottom {
            scroll + (slot.bottom() - view_bottom).min(slot.top - view_top)
        } else {
            scroll
        };
        u16::try_from(adjusted.max(0)).unwrap_or(u16::MAX)
    }
}

/// Palette buttons top to bottom: layout kinds, then input kinds
pub fn palette_order() -> Vec<FieldTypeTag> {
    let (mut layout, input): (Vec<_>, Vec<_>) = FieldTypeTag::ALL
        .into_iter()
        .partition(|t| lookup(*t).palette_group() == PaletteGroup::Layout);
    layout.extend(input);
    layout
}

/// Rows an element box occupies: its preview plus the border
pub fn slot_height(element: &crate::builder::FieldElement) -> u16 {
    let lines = behavior_of(element).design_lines(element).len();
    u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2)
}
