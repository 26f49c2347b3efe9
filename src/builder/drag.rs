//! Pointer gesture state machine
//!
//! Palette buttons and canvas elements are drag sources; the canvas and the
//! two halves of every element are drop targets. [`DragCoordinator::handle`]
//! is the only transition function. It turns a finished gesture into a
//! [`DropCommand`] for the designer and never touches the document itself.

use super::element::{ElementId, FieldTypeTag};
use tracing::debug;

/// Half of an element's rendered region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Top,
    Bottom,
}

/// What a gesture picked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// Palette button: construct a new element of this type
    Palette(FieldTypeTag),
    /// Existing canvas element
    Element(ElementId),
}

/// Region under the pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Canvas area outside every element
    Canvas,
    ElementTop(ElementId),
    ElementBottom(ElementId),
}

impl DropTarget {
    /// Element and half, for element regions
    pub fn element(&self) -> Option<(&ElementId, Half)> {
        match self {
            DropTarget::Canvas => None,
            DropTarget::ElementTop(id) => Some((id, Half::Top)),
            DropTarget::ElementBottom(id) => Some((id, Half::Bottom)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    Start(DragSource),
    Move(Option<DropTarget>),
    End(Option<DropTarget>),
    Cancel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    DraggingNew {
        tag: FieldTypeTag,
        over: Option<DropTarget>,
    },
    DraggingExisting {
        id: ElementId,
        over: Option<DropTarget>,
    },
}

/// Where a new element goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertAt {
    End,
    Before(ElementId),
    After(ElementId),
}

/// Semantic outcome of a completed gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropCommand {
    InsertNew {
        tag: FieldTypeTag,
        at: InsertAt,
    },
    MoveExisting {
        id: ElementId,
        over: ElementId,
        half: Half,
    },
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Target currently hovered by an active gesture
    pub fn hovered(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Idle => None,
            DragState::DraggingNew { over, .. } | DragState::DraggingExisting { over, .. } => {
                over.as_ref()
            }
        }
    }

    /// Feed one pointer event; returns a command when a gesture completes
    /// over a valid target
    pub fn handle(&mut self, event: PointerEvent) -> Option<DropCommand> {
        match event {
            PointerEvent::Start(source) => {
                // A start while dragging restarts the gesture
                self.state = match source {
                    DragSource::Palette(tag) => DragState::DraggingNew { tag, over: None },
                    DragSource::Element(id) => DragState::DraggingExisting { id, over: None },
                };
                debug!("Drag started: {:?}", self.state);
                None
            }
            PointerEvent::Move(target) => {
                match &mut self.state {
                    DragState::Idle => {}
                    DragState::DraggingNew { over, .. }
                    | DragState::DraggingExisting { over, .. } => *over = target,
                }
                None
            }
            PointerEvent::End(target) => {
                let state = std::mem::take(&mut self.state);
                let command = target.and_then(|target| Self::resolve(state, target));
                debug!("Drag ended: {command:?}");
                command
            }
            PointerEvent::Cancel => {
                if self.is_dragging() {
                    debug!("Drag cancelled");
                }
                self.state = DragState::Idle;
                None
            }
        }
    }

    fn resolve(state: DragState, target: DropTarget) -> Option<DropCommand> {
        match state {
            DragState::Idle => None,
            DragState::DraggingNew { tag, .. } => {
                let at = match target {
                    DropTarget::Canvas => InsertAt::End,
                    DropTarget::ElementTop(id) => InsertAt::Before(id),
                    DropTarget::ElementBottom(id) => InsertAt::After(id),
                };
                Some(DropCommand::InsertNew { tag, at })
            }
            DragState::DraggingExisting { id, .. } => {
                let (over, half) = target.element()?;
                if *over == id {
                    return None;
                }
                Some(DropCommand::MoveExisting {
                    over: over.clone(),
                    id,
                    half,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }

    mod new_elements {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_palette_over_canvas_appends() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Palette(FieldTypeTag::TextField)));
            assert!(drag.is_dragging());
            let cmd = drag.handle(PointerEvent::End(Some(DropTarget::Canvas)));
            assert_eq!(
                cmd,
                Some(DropCommand::InsertNew {
                    tag: FieldTypeTag::TextField,
                    at: InsertAt::End
                })
            );
            assert_eq!(drag.state(), &DragState::Idle);
        }

        #[test]
        fn test_palette_over_element_halves() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Palette(FieldTypeTag::DateField)));
            let cmd = drag.handle(PointerEvent::End(Some(DropTarget::ElementTop(id("x")))));
            assert_eq!(
                cmd,
                Some(DropCommand::InsertNew {
                    tag: FieldTypeTag::DateField,
                    at: InsertAt::Before(id("x"))
                })
            );

            drag.handle(PointerEvent::Start(DragSource::Palette(FieldTypeTag::DateField)));
            let cmd = drag.handle(PointerEvent::End(Some(DropTarget::ElementBottom(id("x")))));
            assert_eq!(
                cmd,
                Some(DropCommand::InsertNew {
                    tag: FieldTypeTag::DateField,
                    at: InsertAt::After(id("x"))
                })
            );
        }

        #[test]
        fn test_end_over_nothing_is_no_command() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Palette(FieldTypeTag::TextField)));
            assert_eq!(drag.handle(PointerEvent::End(None)), None);
            assert!(!drag.is_dragging());
        }
    }

    mod existing_elements {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_move_over_other_element() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Element(id("a"))));
            let cmd = drag.handle(PointerEvent::End(Some(DropTarget::ElementBottom(id("b")))));
            assert_eq!(
                cmd,
                Some(DropCommand::MoveExisting {
                    id: id("a"),
                    over: id("b"),
                    half: Half::Bottom
                })
            );
        }

        #[test]
        fn test_self_drop_is_no_command() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Element(id("a"))));
            assert_eq!(
                drag.handle(PointerEvent::End(Some(DropTarget::ElementTop(id("a"))))),
                None
            );
        }

        #[test]
        fn test_existing_over_canvas_is_no_command() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Element(id("a"))));
            assert_eq!(drag.handle(PointerEvent::End(Some(DropTarget::Canvas))), None);
        }
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_move_tracks_hover() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Element(id("a"))));
            assert_eq!(drag.hovered(), None);
            drag.handle(PointerEvent::Move(Some(DropTarget::ElementTop(id("b")))));
            assert_eq!(drag.hovered(), Some(&DropTarget::ElementTop(id("b"))));
            drag.handle(PointerEvent::Move(None));
            assert_eq!(drag.hovered(), None);
        }

        #[test]
        fn test_cancel_discards_gesture() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Palette(FieldTypeTag::TextField)));
            drag.handle(PointerEvent::Move(Some(DropTarget::Canvas)));
            assert_eq!(drag.handle(PointerEvent::Cancel), None);
            assert_eq!(drag.state(), &DragState::Idle);
            assert_eq!(drag.handle(PointerEvent::End(Some(DropTarget::Canvas))), None);
        }

        #[test]
        fn test_start_while_dragging_restarts() {
            let mut drag = DragCoordinator::new();
            drag.handle(PointerEvent::Start(DragSource::Palette(FieldTypeTag::TextField)));
            drag.handle(PointerEvent::Start(DragSource::Element(id("a"))));
            assert_eq!(
                drag.state(),
                &DragState::DraggingExisting {
                    id: id("a"),
                    over: None
                }
            );
        }

        #[test]
        fn test_events_while_idle_are_ignored() {
            let mut drag = DragCoordinator::new();
            assert_eq!(drag.handle(PointerEvent::Move(Some(DropTarget::Canvas))), None);
            assert_eq!(drag.handle(PointerEvent::End(Some(DropTarget::Canvas))), None);
            assert_eq!(drag.state(), &DragState::Idle);
        }
    }
}
