//! Application state definitions

use super::forms::FormDialog;
use crate::builder::registry::{behavior_of, Property};
use crate::builder::{Designer, DragCoordinator, SubmissionSession};
use crate::store::{DailyCount, FormId, FormRecord, FormStats, PublishedForm, SubmissionRecord};

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    /// Create dialog over the dashboard
    NewForm,
    FormDetail,
    Designer,
    /// Entry view of the current draft, nothing is submitted
    Preview,
    /// Public fill-in by share token
    Submit,
    Submitted,
    Admin,
    NotFound,
}

impl View {
    /// Views skipped when going back
    pub fn is_transient(&self) -> bool {
        matches!(self, View::NewForm | View::Submitted)
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::NewForm => "New form",
            View::FormDetail => "Form",
            View::Designer => "Designer",
            View::Preview => "Preview",
            View::Submit => "Submit",
            View::Submitted => "Submitted",
            View::Admin => "Admin",
            View::NotFound => "Not found",
        }
    }
}

/// Keyboard focus inside the designer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DesignerPane {
    Palette,
    #[default]
    Canvas,
    Properties,
}

impl DesignerPane {
    pub fn next(&self) -> Self {
        match self {
            Self::Palette => Self::Canvas,
            Self::Canvas => Self::Properties,
            Self::Properties => Self::Palette,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Palette => Self::Properties,
            Self::Canvas => Self::Palette,
            Self::Properties => Self::Canvas,
        }
    }
}

/// A property of the selected element being typed in
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEdit {
    pub key: &'static str,
    pub label: &'static str,
    pub buffer: String,
    /// Rejection shown beside the property
    pub error: Option<String>,
}

impl PropertyEdit {
    pub fn new(property: &Property) -> Self {
        Self {
            key: property.key,
            label: property.label,
            buffer: property.value.to_input(),
            error: None,
        }
    }
}

/// One-line notification in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Admin delete waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub form_id: FormId,
    pub name: String,
    /// `true` when "Delete" is highlighted
    pub selected_option: bool,
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Dashboard
    pub forms: Vec<FormRecord>,
    pub stats: FormStats,
    pub selected_index: usize,

    // Form detail
    pub current_form: Option<FormRecord>,
    pub submissions: Vec<SubmissionRecord>,
    pub scroll_offset: usize,
    pub dialog: Option<FormDialog>,

    // Designer
    pub designer: Designer,
    pub designer_pane: DesignerPane,
    pub canvas_scroll: u16,
    pub palette_index: usize,
    pub property_index: usize,
    pub property_edit: Option<PropertyEdit>,
    pub drag: DragCoordinator,
    /// Set once the pointer moved during the current press
    pub pointer_moved: bool,
    /// Saves spawned but not reported back yet
    pub saves_in_flight: usize,

    // Preview / submit
    pub session: Option<SubmissionSession>,
    pub published: Option<PublishedForm>,
    pub share_token: Option<String>,

    // Admin
    pub all_forms: Vec<FormRecord>,
    pub form_count: u64,
    pub forms_per_day: Vec<DailyCount>,
    pub pending_delete: Option<PendingDelete>,

    pub status: Option<StatusMessage>,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn scroll_down(&mut self, max: usize) {
        if self.scroll_offset + 1 < max {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Dashboard form under the cursor
    pub fn selected_form(&self) -> Option<&FormRecord> {
        self.forms.get(self.selected_index)
    }

    /// Admin table row under the cursor
    pub fn selected_admin_form(&self) -> Option<&FormRecord> {
        self.all_forms.get(self.selected_index)
    }

    /// Load a form into the designer, resetting all designer UI state
    pub fn open_designer(&mut self, designer: Designer) {
        self.designer = designer;
        self.designer_pane = DesignerPane::Canvas;
        self.canvas_scroll = 0;
        self.palette_index = 0;
        self.property_index = 0;
        self.property_edit = None;
        self.drag = DragCoordinator::new();
        self.pointer_moved = false;
    }

    /// Property rows of the selected element
    pub fn selected_properties(&self) -> Vec<Property> {
        self.designer
            .selected_element()
            .map(|element| behavior_of(element).properties(element))
            .unwrap_or_default()
    }

    /// Keep the property cursor on an existing row after the selection
    /// changed
    pub fn clamp_property_index(&mut self) {
        let count = self.selected_properties().len();
        if self.property_index >= count {
            self.property_index = count.saturating_sub(1);
        }
    }

    /// Start a preview session over the current draft
    pub fn open_preview(&mut self) {
        self.session = Some(SubmissionSession::new(self.designer.elements().to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::registry::construct_new;
    use crate::builder::FieldTypeTag;

    #[test]
    fn test_move_selection_stays_in_bounds() {
        let mut state = AppState::default();
        state.move_selection_up();
        assert_eq!(state.selected_index, 0);
        state.move_selection_down(2);
        state.move_selection_down(2);
        assert_eq!(state.selected_index, 1);
        state.move_selection_down(0);
        assert_eq!(state.selected_index, 1);
    }

    #[test]
    fn test_scroll_limits() {
        let mut state = AppState::default();
        state.scroll_down(2);
        state.scroll_down(2);
        assert_eq!(state.scroll_offset, 1);
        state.scroll_up();
        state.scroll_up();
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_status_messages() {
        let mut state = AppState::default();
        state.set_status("Saved");
        assert_eq!(
            state.status,
            Some(StatusMessage {
                text: "Saved".to_string(),
                is_error: false
            })
        );
        state.set_error("Failed");
        assert!(state.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn test_designer_pane_cycle() {
        let pane = DesignerPane::default();
        assert_eq!(pane, DesignerPane::Canvas);
        assert_eq!(pane.next(), DesignerPane::Properties);
        assert_eq!(pane.next().next(), DesignerPane::Palette);
        assert_eq!(pane.prev(), DesignerPane::Palette);
    }

    #[test]
    fn test_transient_views() {
        assert!(View::NewForm.is_transient());
        assert!(View::Submitted.is_transient());
        assert!(!View::Designer.is_transient());
    }

    #[test]
    fn test_selected_properties_follow_selection() {
        let element = construct_new(FieldTypeTag::TextField);
        let id = element.id.clone();
        let mut state = AppState::default();
        let mut designer = Designer::new();
        designer.add_element(0, element).unwrap();
        state.open_designer(designer);
        assert!(state.selected_properties().is_empty());

        state.designer.set_selected_element(Some(id)).unwrap();
        let keys: Vec<_> = state.selected_properties().iter().map(|p| p.key).collect();
        assert!(keys.contains(&"label"));
        assert!(keys.contains(&"required"));
    }

    #[test]
    fn test_clamp_property_index() {
        let mut state = AppState::default();
        state.property_index = 5;
        state.clamp_property_index();
        assert_eq!(state.property_index, 0);
    }

    #[test]
    fn test_open_preview_snapshots_draft() {
        let mut state = AppState::default();
        let mut designer = Designer::new();
        designer
            .add_element(0, construct_new(FieldTypeTag::TitleField))
            .unwrap();
        state.open_designer(designer);
        state.open_preview();
        assert_eq!(state.session.as_ref().map(|s| s.elements().len()), Some(1));
    }
}
