//! Application state and core logic

use crate::builder::registry::behavior_of;
use crate::builder::{
    Designer, DropCommand, ElementId, FieldElement, FieldTypeTag, InputKind, InsertAt,
    PointerEvent, PropertyValue, SubmissionSession, SubmissionStatus, SubmitOutcome,
};
use crate::config::FormsmithConfig;
use crate::identity::Actor;
use crate::platform::is_save_key;
use crate::state::canvas::{palette_order, Hit};
use crate::state::{
    AppState, DesignerLayout, DesignerPane, DialogKind, Form, FormDialog, PendingDelete,
    PropertyEdit, View,
};
use crate::store::{FormId, FormStore, StoreError};
use anyhow::Result;
use chrono::{Days, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Days shown in the admin creation overview, today included
const ADMIN_DAYS: u64 = 7;

/// Outcome of a background save, reported back to the event loop
#[derive(Debug)]
pub struct SaveResult {
    pub form_id: FormId,
    /// Elements the save wrote
    pub elements: Vec<FieldElement>,
    pub result: Result<(), String>,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    store: Arc<dyn FormStore>,
    /// Acting user; `None` only allows opening share links
    pub actor: Option<Actor>,
    pub config: FormsmithConfig,
    /// Whether the app should quit
    quit: bool,
    /// Copy feedback message
    pub copy_message: Option<String>,
    /// Terminal size (height, width) for mouse geometry
    pub terminal_size: Option<(u16, u16)>,
    save_tx: mpsc::UnboundedSender<SaveResult>,
    save_rx: mpsc::UnboundedReceiver<SaveResult>,
}

impl App {
    /// Create the app and load the dashboard
    pub async fn new(
        store: Arc<dyn FormStore>,
        actor: Option<Actor>,
        config: FormsmithConfig,
    ) -> Result<Self> {
        let mut app = Self::with_store(store, actor, config);
        if app.actor.is_some() {
            app.load_dashboard().await;
        } else {
            app.state.current_view = View::NotFound;
        }
        Ok(app)
    }

    /// Create the app without touching the store
    pub fn with_store(
        store: Arc<dyn FormStore>,
        actor: Option<Actor>,
        config: FormsmithConfig,
    ) -> Self {
        let (save_tx, save_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::default(),
            store,
            actor,
            config,
            quit: false,
            copy_message: None,
            terminal_size: None,
            save_tx,
            save_rx,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Full screen area used for mouse hit-testing
    fn screen(&self) -> Rect {
        let (height, width) = self.terminal_size.unwrap_or((24, 80));
        Rect::new(0, 0, width, height)
    }

    fn designer_layout(&self) -> DesignerLayout {
        DesignerLayout::compute(self.screen(), &self.state.designer, self.state.canvas_scroll)
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        self.state.view_history.push(self.state.current_view);
        self.state.current_view = view;
        self.state.status = None;
    }

    /// Go back to previous view, quitting when there is none
    pub fn go_back(&mut self) {
        while let Some(view) = self.state.view_history.pop() {
            if view.is_transient() {
                continue;
            }
            self.state.current_view = view;
            return;
        }
        self.quit = true;
    }

    /// Reload the actor's forms and stats
    pub async fn load_dashboard(&mut self) {
        let Some(actor) = self.actor.clone() else {
            return;
        };
        match self.store.list_forms(&actor).await {
            Ok(forms) => self.state.forms = forms,
            Err(e) => self.state.set_error(format!("Failed to load forms: {e}")),
        }
        match self.store.form_stats(&actor).await {
            Ok(stats) => self.state.stats = stats,
            Err(e) => self.state.set_error(format!("Failed to load stats: {e}")),
        }
        let len = self.state.forms.len();
        if self.state.selected_index >= len {
            self.state.selected_index = len.saturating_sub(1);
        }
    }

    /// Load a form with its submissions and show its detail view
    async fn open_form(&mut self, id: FormId) {
        if self.reload_form(id).await {
            self.state.scroll_offset = 0;
            self.navigate(View::FormDetail);
        }
    }

    async fn reload_form(&mut self, id: FormId) -> bool {
        let Some(actor) = self.actor.clone() else {
            return false;
        };
        let form = match self.store.load_form(&actor, id).await {
            Ok(form) => form,
            Err(e) => {
                self.state.set_error(format!("Failed to load form: {e}"));
                return false;
            }
        };
        match self.store.list_submissions(&actor, id).await {
            Ok(submissions) => self.state.submissions = submissions,
            Err(e) => {
                self.state.submissions.clear();
                self.state.set_error(format!("Failed to load submissions: {e}"));
            }
        }
        self.state.current_form = Some(form);
        true
    }

    async fn load_admin(&mut self) {
        let Some(actor) = self.actor.clone() else {
            return;
        };
        let today = Utc::now().date_naive();
        let start = today
            .checked_sub_days(Days::new(ADMIN_DAYS - 1))
            .unwrap_or(today);

        let loaded = async {
            let forms = self.store.list_all_forms(&actor).await?;
            let count = self.store.count_forms(&actor).await?;
            let per_day = self
                .store
                .forms_created_per_day(&actor, start, today)
                .await?;
            Ok::<_, StoreError>((forms, count, per_day))
        }
        .await;

        match loaded {
            Ok((forms, count, per_day)) => {
                self.state.all_forms = forms;
                self.state.form_count = count;
                self.state.forms_per_day = per_day;
                let len = self.state.all_forms.len();
                if self.state.selected_index >= len {
                    self.state.selected_index = len.saturating_sub(1);
                }
            }
            Err(e) => self.state.set_error(format!("Failed to load admin data: {e}")),
        }
    }

    /// Open a published form by its share token for filling in
    pub async fn open_share(&mut self, token: &str) {
        match self.store.load_published_form(token).await {
            Ok(form) => {
                info!("Opened shared form {}", form.id);
                self.state.session = Some(SubmissionSession::new(form.content.clone()));
                self.state.published = Some(form);
                self.state.share_token = Some(token.to_string());
                self.state.view_history.clear();
                self.state.current_view = View::Submit;
            }
            Err(e) => {
                warn!("Cannot open shared form: {e}");
                self.state.share_token = Some(token.to_string());
                self.state.view_history.clear();
                self.state.current_view = View::NotFound;
            }
        }
    }

    /// Save the designer draft without blocking the UI
    pub fn start_save(&mut self) {
        let Some(actor) = self.actor.clone() else {
            return;
        };
        let Some(form_id) = self.state.current_form.as_ref().map(|f| f.id) else {
            return;
        };
        let elements = self.state.designer.elements().to_vec();
        let store = Arc::clone(&self.store);
        let tx = self.save_tx.clone();
        self.state.saves_in_flight += 1;
        debug!("Saving form {form_id} ({} elements)", elements.len());

        tokio::spawn(async move {
            let result = store
                .save_form_content(&actor, form_id, elements.clone())
                .await
                .map_err(|e| e.to_string());
            // Receiver only disappears when the app is gone
            let _ = tx.send(SaveResult {
                form_id,
                elements,
                result,
            });
        });
    }

    /// Apply every finished save
    pub fn drain_save_results(&mut self) {
        while let Ok(saved) = self.save_rx.try_recv() {
            self.apply_save_result(saved);
        }
    }

    /// Save an open draft and wait for every running save before exit
    pub async fn shutdown(&mut self) {
        let draft_open = matches!(self.state.current_view, View::Designer | View::Preview);
        if draft_open && self.state.designer.is_dirty() {
            self.start_save();
        }
        if self.state.saves_in_flight > 0 {
            info!("Waiting for {} save(s) before exit", self.state.saves_in_flight);
        }
        while self.state.saves_in_flight > 0 {
            match self.save_rx.recv().await {
                Some(saved) => self.apply_save_result(saved),
                None => break,
            }
        }
    }

    fn apply_save_result(&mut self, saved: SaveResult) {
        self.state.saves_in_flight = self.state.saves_in_flight.saturating_sub(1);
        match saved.result {
            Ok(()) => self.record_saved(saved.form_id, saved.elements),
            Err(e) => {
                warn!("Failed to save form {}: {e}", saved.form_id);
                self.state.set_error(format!("Failed to save form: {e}"));
            }
        }
    }

    /// Remember what the store now holds for `form_id`
    fn record_saved(&mut self, form_id: FormId, elements: Vec<FieldElement>) {
        let Some(form) = self
            .state
            .current_form
            .as_mut()
            .filter(|f| f.id == form_id)
        else {
            return;
        };
        form.content = elements;
        // Edits made while the save was running keep the draft dirty
        if self.state.designer.elements() == form.content.as_slice() {
            self.state.designer.mark_saved();
        }
        self.state.set_status("Form saved");
    }

    /// Handle key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        self.copy_message = None;

        // Modal dialogs first
        if self.state.pending_delete.is_some() {
            return self.handle_confirm_delete_key(key).await;
        }
        if self.state.dialog.is_some() {
            return self.handle_dialog_key(key).await;
        }

        match self.state.current_view {
            View::Dashboard => self.handle_dashboard_key(key).await?,
            View::NewForm => self.go_back(),
            View::FormDetail => self.handle_detail_key(key).await?,
            View::Designer => self.handle_designer_key(key).await?,
            View::Preview | View::Submit => self.handle_entry_key(key).await?,
            View::Submitted | View::NotFound => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.go_back();
                }
            }
            View::Admin => self.handle_admin_key(key).await?,
        }
        Ok(())
    }

    async fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.move_selection_down(self.state.forms.len());
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter => {
                if let Some(id) = self.state.selected_form().map(|f| f.id) {
                    self.open_form(id).await;
                }
            }
            KeyCode::Char('n') => {
                self.state.dialog = Some(FormDialog::new_form());
                self.navigate(View::NewForm);
            }
            KeyCode::Char('r') => self.load_dashboard().await,
            KeyCode::Char('a') if self.actor.as_ref().is_some_and(|a| a.is_admin) => {
                self.state.reset_selection();
                self.load_admin().await;
                self.navigate(View::Admin);
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(dialog) = self.state.dialog.as_mut() else {
            return Ok(());
        };
        if is_save_key(&key) {
            self.commit_dialog().await;
            return Ok(());
        }
        match key.code {
            KeyCode::Esc => {
                self.state.dialog = None;
                if self.state.current_view == View::NewForm {
                    self.go_back();
                }
            }
            KeyCode::Tab => dialog.next_field(),
            KeyCode::BackTab => dialog.prev_field(),
            KeyCode::Enter => {
                let multiline = dialog
                    .get_active_field_mut()
                    .is_some_and(|f| f.is_multiline);
                if multiline {
                    dialog.input_char('\n');
                } else {
                    self.commit_dialog().await;
                }
            }
            KeyCode::Backspace => dialog.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                dialog.input_char(c);
            }
            _ => {}
        }
        Ok(())
    }

    /// Send the dialog's values to the store; rejections stay in the dialog
    async fn commit_dialog(&mut self) {
        let Some(dialog) = self.state.dialog.clone() else {
            return;
        };
        let Some(actor) = self.actor.clone() else {
            return;
        };
        let form_id = self.state.current_form.as_ref().map(|f| f.id);

        let result = match (dialog.kind, form_id) {
            (DialogKind::NewForm, _) => self
                .store
                .create_form(&actor, dialog.value("name"), dialog.value("description"))
                .await
                .map(Some),
            (DialogKind::Rename, Some(id)) => self
                .store
                .rename_form(&actor, id, dialog.value("name"))
                .await
                .map(|_| None),
            (DialogKind::Description, Some(id)) => self
                .store
                .update_description(&actor, id, dialog.value("description"))
                .await
                .map(|_| None),
            _ => Ok(None),
        };

        match result {
            Ok(created) => {
                self.state.dialog = None;
                if let Some(id) = created {
                    // Replace the create dialog with the new form's designer
                    self.go_back();
                    self.load_dashboard().await;
                    self.open_form(id).await;
                    self.open_designer();
                } else if let Some(id) = form_id {
                    self.reload_form(id).await;
                    self.state.set_status("Form updated");
                }
            }
            Err(e) => {
                if let Some(dialog) = self.state.dialog.as_mut() {
                    dialog.error = Some(match e {
                        StoreError::InvalidInput(msg) => msg,
                        other => other.to_string(),
                    });
                }
            }
        }
    }

    async fn handle_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(form) = self.state.current_form.as_ref() else {
            self.go_back();
            return Ok(());
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.go_back();
                self.load_dashboard().await;
            }
            KeyCode::Char('o') | KeyCode::Enter => self.open_designer(),
            KeyCode::Char('e') => self.state.dialog = Some(FormDialog::rename(&form.name)),
            KeyCode::Char('d') => {
                self.state.dialog = Some(FormDialog::description(&form.description));
            }
            KeyCode::Char('P') => self.toggle_publish().await,
            KeyCode::Char('y') => self.copy_share_link(),
            KeyCode::Char('r') => {
                let id = form.id;
                self.reload_form(id).await;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.scroll_down(self.state.submissions.len());
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            _ => {}
        }
        Ok(())
    }

    /// Load the current form's content into the designer
    fn open_designer(&mut self) {
        let Some(form) = self.state.current_form.as_ref() else {
            return;
        };
        match Designer::from_elements(form.content.clone()) {
            Ok(designer) => {
                self.state.open_designer(designer);
                self.navigate(View::Designer);
            }
            Err(e) => self.state.set_error(format!("Cannot open designer: {e}")),
        }
    }

    async fn toggle_publish(&mut self) {
        let Some(actor) = self.actor.clone() else {
            return;
        };
        let Some((id, published)) = self.state.current_form.as_ref().map(|f| (f.id, f.published))
        else {
            return;
        };

        // Publishing from the designer publishes what is on the canvas
        if self.state.current_view == View::Designer && self.state.designer.is_dirty() {
            let elements = self.state.designer.elements().to_vec();
            if let Err(e) = self
                .store
                .save_form_content(&actor, id, elements.clone())
                .await
            {
                self.state.set_error(format!("Failed to save form: {e}"));
                return;
            }
            self.record_saved(id, elements);
        }

        match self.store.set_published(&actor, id, !published).await {
            Ok(()) => {
                if let Some(form) = self.state.current_form.as_mut() {
                    form.published = !published;
                }
                self.state.set_status(if published {
                    "Form unpublished"
                } else {
                    "Form published"
                });
            }
            Err(e) => self.state.set_error(format!("Failed to publish form: {e}")),
        }
    }

    fn copy_share_link(&mut self) {
        let Some(form) = self.state.current_form.as_ref() else {
            return;
        };
        if !form.published {
            self.state.set_error("Publish the form before sharing it");
            return;
        }
        let link = self.config.share_link(&form.share_token);
        match copy_to_clipboard(&link) {
            Ok(()) => self.copy_message = Some("Copied share link".to_string()),
            Err(e) => {
                warn!("Clipboard unavailable: {e}");
                self.state.set_error(format!("Copy failed: {e}"));
            }
        }
    }

    async fn handle_designer_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.property_edit.is_some() {
            self.handle_property_edit_key(key);
            return Ok(());
        }
        if key.code == KeyCode::Esc && self.state.drag.is_dragging() {
            self.state.drag.handle(PointerEvent::Cancel);
            self.state.pointer_moved = false;
            return Ok(());
        }
        if is_save_key(&key) {
            self.start_save();
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                if self.state.designer.is_dirty() {
                    self.start_save();
                }
                self.go_back();
                return Ok(());
            }
            KeyCode::Tab => {
                self.state.designer_pane = self.state.designer_pane.next();
                return Ok(());
            }
            KeyCode::BackTab => {
                self.state.designer_pane = self.state.designer_pane.prev();
                return Ok(());
            }
            KeyCode::Char('p') => {
                self.state.open_preview();
                self.navigate(View::Preview);
                return Ok(());
            }
            KeyCode::Char('P') => {
                self.toggle_publish().await;
                return Ok(());
            }
            _ => {}
        }

        match self.state.designer_pane {
            DesignerPane::Palette => self.handle_palette_key(key),
            DesignerPane::Canvas => self.handle_canvas_key(key),
            DesignerPane::Properties => self.handle_properties_key(key),
        }
        Ok(())
    }

    fn handle_palette_key(&mut self, key: KeyEvent) {
        let tags = palette_order();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.palette_index + 1 < tags.len() {
                    self.state.palette_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.palette_index = self.state.palette_index.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(tag) = tags.get(self.state.palette_index) {
                    self.insert_at_end(*tag);
                }
            }
            _ => {}
        }
    }

    /// Append a new element and select it
    fn insert_at_end(&mut self, tag: FieldTypeTag) {
        let command = DropCommand::InsertNew {
            tag,
            at: InsertAt::End,
        };
        if let Some(id) = self.apply_drop(command) {
            if self.state.designer.set_selected_element(Some(id)).is_ok() {
                self.state.clamp_property_index();
                self.scroll_to_selected();
            }
        }
    }

    fn handle_canvas_key(&mut self, key: KeyEvent) {
        let moved = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.designer.select_adjacent(true);
                Ok(true)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.designer.select_adjacent(false);
                Ok(true)
            }
            KeyCode::Char('J') => self.state.designer.move_selected_down(),
            KeyCode::Char('K') => self.state.designer.move_selected_up(),
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.state.designer.selected().cloned() {
                    self.state.designer.remove_element(&id);
                }
                Ok(false)
            }
            KeyCode::Enter if self.state.designer.selected().is_some() => {
                self.state.designer_pane = DesignerPane::Properties;
                Ok(false)
            }
            _ => Ok(false),
        };
        match moved {
            Ok(true) => {
                self.state.clamp_property_index();
                self.scroll_to_selected();
            }
            Ok(false) => self.state.clamp_property_index(),
            Err(e) => self.state.set_error(e.to_string()),
        }
    }

    fn handle_properties_key(&mut self, key: KeyEvent) {
        let properties = self.state.selected_properties();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.property_index + 1 < properties.len() {
                    self.state.property_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.property_index = self.state.property_index.saturating_sub(1);
            }
            KeyCode::Enter => {
                let Some(property) = properties.get(self.state.property_index) else {
                    return;
                };
                if let PropertyValue::Flag(on) = property.value {
                    // Flags toggle in place
                    self.commit_property(property.key, &(!on).to_string());
                } else {
                    self.state.property_edit = Some(PropertyEdit::new(property));
                }
            }
            _ => {}
        }
    }

    fn handle_property_edit_key(&mut self, key: KeyEvent) {
        let Some(edit) = self.state.property_edit.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.property_edit = None,
            KeyCode::Enter => {
                let (property_key, raw) = (edit.key, edit.buffer.clone());
                self.commit_property(property_key, &raw);
            }
            KeyCode::Backspace => {
                edit.buffer.pop();
                edit.error = None;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                edit.buffer.push(c);
                edit.error = None;
            }
            _ => {}
        }
    }

    /// Apply one property edit to the selected element
    fn commit_property(&mut self, property_key: &str, raw: &str) {
        let Some(element) = self.state.designer.selected_element().cloned() else {
            self.state.property_edit = None;
            return;
        };
        let updated = match behavior_of(&element).apply_property(&element, property_key, raw) {
            Ok(updated) => updated,
            Err(e) => {
                match self.state.property_edit.as_mut() {
                    Some(edit) => edit.error = Some(e.to_string()),
                    None => self.state.set_error(e.to_string()),
                }
                return;
            }
        };
        match self.state.designer.update_element(&element.id, updated) {
            Ok(()) => self.state.property_edit = None,
            Err(e) => self.state.set_error(e.to_string()),
        }
    }

    fn scroll_to_selected(&mut self) {
        if let Some(id) = self.state.designer.selected().cloned() {
            let layout = self.designer_layout();
            self.state.canvas_scroll = layout.scroll_to_show(&id, self.state.canvas_scroll);
        }
    }

    /// Apply a drop command, reporting rejections in the status bar
    fn apply_drop(&mut self, command: DropCommand) -> Option<ElementId> {
        match self.state.designer.apply_drop(command) {
            Ok(id) => id,
            Err(e) => {
                self.state.set_error(e.to_string());
                None
            }
        }
    }

    async fn handle_entry_key(&mut self, key: KeyEvent) -> Result<()> {
        let is_preview = self.state.current_view == View::Preview;
        if key.code == KeyCode::Esc {
            if is_preview {
                self.state.session = None;
            }
            self.go_back();
            return Ok(());
        }
        if is_save_key(&key) {
            if is_preview {
                self.state.set_status("Submitting is disabled in preview");
            } else {
                self.submit_form().await;
            }
            return Ok(());
        }

        let Some(session) = self.state.session.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Tab => session.focus_next(),
            KeyCode::BackTab => session.focus_prev(),
            KeyCode::Down => session.move_cursor(true),
            KeyCode::Up => session.move_cursor(false),
            KeyCode::Enter => match session.focused_kind() {
                Some(InputKind::Multiline { .. }) => session.newline(),
                Some(InputKind::Choice(_)) | Some(InputKind::MultiChoice(_)) => {
                    session.toggle_option();
                }
                _ => session.focus_next(),
            },
            KeyCode::Backspace => session.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                session.input_char(c);
            }
            _ => {}
        }
        Ok(())
    }

    /// Validate and hand the respondent's values to the store
    async fn submit_form(&mut self) {
        let Some(token) = self.state.share_token.clone() else {
            return;
        };
        let Some(session) = self.state.session.as_mut() else {
            return;
        };
        if session.status() == SubmissionStatus::Submitted {
            self.state.current_view = View::Submitted;
            return;
        }
        let outcome = session.submit(self.store.as_ref(), &token).await;
        match outcome {
            Ok(SubmitOutcome::Submitted) => {
                info!("Form submitted");
                self.state.status = None;
                self.state.current_view = View::Submitted;
            }
            Ok(SubmitOutcome::Invalid(failed)) => {
                if let Some(first) = session
                    .elements()
                    .iter()
                    .find(|e| failed.contains(&e.id))
                    .map(|e| e.id.clone())
                {
                    session.focus_element(&first);
                }
                let noun = if failed.len() == 1 { "field" } else { "fields" };
                self.state
                    .set_error(format!("{} {noun} need attention", failed.len()));
            }
            Err(e) => self.state.set_error(format!("Failed to submit form: {e}")),
        }
    }

    async fn handle_admin_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state.reset_selection();
                self.go_back();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.move_selection_down(self.state.all_forms.len());
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('r') => self.load_admin().await,
            KeyCode::Enter => {
                if let Some(id) = self.state.selected_admin_form().map(|f| f.id) {
                    self.open_form(id).await;
                }
            }
            KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(form) = self.state.selected_admin_form() {
                    self.state.pending_delete = Some(PendingDelete {
                        form_id: form.id,
                        name: form.name.clone(),
                        selected_option: false,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_confirm_delete_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(action) = self.state.pending_delete.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => self.state.pending_delete = None,
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::Char('j')
            | KeyCode::Char('k')
            | KeyCode::Tab => action.selected_option = !action.selected_option,
            KeyCode::Enter => {
                let confirmed = action.selected_option;
                let form_id = action.form_id;
                self.state.pending_delete = None;
                if confirmed {
                    self.delete_form(form_id).await;
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn delete_form(&mut self, form_id: FormId) {
        let Some(actor) = self.actor.clone() else {
            return;
        };
        match self.store.delete_form(&actor, form_id).await {
            Ok(()) => {
                self.state.set_status(format!("Deleted form #{form_id}"));
                self.load_admin().await;
            }
            Err(e) => self.state.set_error(format!("Failed to delete form: {e}")),
        }
    }

    /// Handle mouse event; only the designer reacts to the pointer
    pub async fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.state.current_view != View::Designer
            || self.state.dialog.is_some()
            || self.state.property_edit.is_some()
        {
            return Ok(());
        }
        self.copy_message = None;

        let layout = self.designer_layout();
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(&layout, column, row),
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.state.drag.is_dragging() {
                    self.state.pointer_moved = true;
                    let target = layout.target_at(column, row);
                    self.state.drag.handle(PointerEvent::Move(target));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(&layout, column, row),
            MouseEventKind::ScrollDown => {
                let max = layout
                    .content_height()
                    .saturating_sub(layout.canvas_inner().height);
                self.state.canvas_scroll = (self.state.canvas_scroll + 1).min(max);
            }
            MouseEventKind::ScrollUp => {
                self.state.canvas_scroll = self.state.canvas_scroll.saturating_sub(1);
            }
            _ => {}
        }
        Ok(())
    }

    fn pointer_down(&mut self, layout: &DesignerLayout, column: u16, row: u16) {
        self.state.pointer_moved = false;
        match layout.hit_test(column, row) {
            Hit::PaletteButton(tag) => {
                self.state.designer_pane = DesignerPane::Palette;
                if let Some(index) = palette_order().iter().position(|t| *t == tag) {
                    self.state.palette_index = index;
                }
            }
            Hit::Element(id, _) => {
                self.state.designer_pane = DesignerPane::Canvas;
                if let Err(e) = self.state.designer.set_selected_element(Some(id)) {
                    self.state.set_error(e.to_string());
                    return;
                }
                self.state.clamp_property_index();
            }
            Hit::Canvas => {
                self.state.designer_pane = DesignerPane::Canvas;
                // Clicking empty canvas clears the selection
                let _ = self.state.designer.set_selected_element(None);
            }
            Hit::Palette => self.state.designer_pane = DesignerPane::Palette,
            Hit::Properties => self.state.designer_pane = DesignerPane::Properties,
            Hit::Outside => {}
        }
        if let Some(source) = layout.source_at(column, row) {
            self.state.drag.handle(PointerEvent::Start(source));
        }
    }

    fn pointer_up(&mut self, layout: &DesignerLayout, column: u16, row: u16) {
        if !self.state.drag.is_dragging() {
            return;
        }
        if self.state.pointer_moved {
            let target = layout.target_at(column, row);
            if let Some(command) = self.state.drag.handle(PointerEvent::End(target)) {
                debug!("Drop: {command:?}");
                self.apply_drop(command);
            }
        } else {
            // A click without movement: palette buttons append their kind
            let clicked = match layout.hit_test(column, row) {
                Hit::PaletteButton(tag) => Some(tag),
                _ => None,
            };
            self.state.drag.handle(PointerEvent::Cancel);
            if let Some(tag) = clicked {
                self.insert_at_end(tag);
            }
        }
        self.state.pointer_moved = false;
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::registry::lookup;
    use crate::builder::{DragState, FieldValue};
    use crate::store::{FormRecord, FormStats, MockFormStore, PublishedForm};

    fn alice() -> Actor {
        Actor {
            id: "alice".to_string(),
            is_admin: false,
        }
    }

    fn record(id: FormId, content: Vec<FieldElement>) -> FormRecord {
        FormRecord {
            id,
            owner_id: "alice".to_string(),
            created_at: Utc::now(),
            published: false,
            name: "Survey".to_string(),
            description: String::new(),
            content,
            visits: 0,
            submissions: 0,
            share_token: "tok".to_string(),
        }
    }

    fn element(tag: FieldTypeTag, id: &str) -> FieldElement {
        lookup(tag).construct(ElementId::from(id))
    }

    fn app_with(store: MockFormStore) -> App {
        let mut app = App::with_store(Arc::new(store), Some(alice()), FormsmithConfig::default());
        app.terminal_size = Some((40, 120));
        app
    }

    /// App sitting in the designer of form 1
    fn designer_app(store: MockFormStore, content: Vec<FieldElement>) -> App {
        let mut app = app_with(store);
        app.state.current_form = Some(record(1, content.clone()));
        app.state
            .open_designer(Designer::from_elements(content).unwrap());
        app.navigate(View::Designer);
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn ids(app: &App) -> Vec<&str> {
        app.state
            .designer
            .elements()
            .iter()
            .map(|e| e.id.as_str())
            .collect()
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_no_actor_shows_not_found() {
            let app = App::new(
                Arc::new(MockFormStore::new()),
                None,
                FormsmithConfig::default(),
            )
            .await
            .unwrap();
            assert_eq!(app.state.current_view, View::NotFound);
        }

        #[tokio::test]
        async fn test_new_loads_dashboard() {
            let mut store = MockFormStore::new();
            store
                .expect_list_forms()
                .times(1)
                .returning(|_| Ok(vec![record(1, vec![])]));
            store
                .expect_form_stats()
                .times(1)
                .returning(|_| Ok(FormStats::new(4, 1)));

            let app = App::new(Arc::new(store), Some(alice()), FormsmithConfig::default())
                .await
                .unwrap();
            assert_eq!(app.state.current_view, View::Dashboard);
            assert_eq!(app.state.forms.len(), 1);
            assert_eq!(app.state.stats.submissions, 1);
        }

        #[test]
        fn test_go_back_skips_transient_views() {
            let mut app = app_with(MockFormStore::new());
            app.navigate(View::NewForm);
            app.navigate(View::FormDetail);
            app.go_back();
            assert_eq!(app.state.current_view, View::Dashboard);
            assert!(!app.should_quit());
        }

        #[test]
        fn test_go_back_from_root_quits() {
            let mut app = app_with(MockFormStore::new());
            app.go_back();
            assert!(app.should_quit());
        }
    }

    mod dialogs {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_rejected_name_stays_in_dialog() {
            let mut store = MockFormStore::new();
            store.expect_create_form().times(1).returning(|_, _, _| {
                Err(StoreError::InvalidInput(
                    "name must be 4 to 50 characters".to_string(),
                ))
            });
            let mut app = app_with(store);
            app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            assert_eq!(app.state.current_view, View::NewForm);
            app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            let dialog = app.state.dialog.as_ref().unwrap();
            assert_eq!(
                dialog.error.as_deref(),
                Some("name must be 4 to 50 characters")
            );
            assert_eq!(app.state.current_view, View::NewForm);
        }

        #[tokio::test]
        async fn test_create_opens_designer() {
            let mut store = MockFormStore::new();
            store
                .expect_create_form()
                .withf(|_, name, description| name.to_string() == "Poll" && description.is_empty())
                .times(1)
                .returning(|_, _, _| Ok(7));
            store.expect_list_forms().returning(|_| Ok(vec![]));
            store
                .expect_form_stats()
                .returning(|_| Ok(FormStats::default()));
            store
                .expect_load_form()
                .returning(|_, id| Ok(record(id, vec![])));
            store.expect_list_submissions().returning(|_, _| Ok(vec![]));

            let mut app = app_with(store);
            app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            for c in "Poll".chars() {
                app.handle_key(key(KeyCode::Char(c))).await.unwrap();
            }
            app.handle_key(ctrl_s()).await.unwrap();

            assert!(app.state.dialog.is_none());
            assert_eq!(app.state.current_view, View::Designer);
            assert_eq!(app.state.current_form.as_ref().map(|f| f.id), Some(7));

            // Back goes to the detail view, then the dashboard
            app.go_back();
            assert_eq!(app.state.current_view, View::FormDetail);
            app.go_back();
            assert_eq!(app.state.current_view, View::Dashboard);
        }

        #[tokio::test]
        async fn test_escape_closes_new_form_dialog() {
            let mut app = app_with(MockFormStore::new());
            app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert!(app.state.dialog.is_none());
            assert_eq!(app.state.current_view, View::Dashboard);
        }
    }

    mod saving {
        use super::*;
        use pretty_assertions::assert_eq;

        async fn wait_for_save(app: &mut App) {
            let saved = app.save_rx.recv().await.unwrap();
            app.apply_save_result(saved);
        }

        #[tokio::test]
        async fn test_save_marks_clean() {
            let mut store = MockFormStore::new();
            store
                .expect_save_form_content()
                .withf(|_, id, elements| *id == 1 && elements.len() == 2)
                .times(1)
                .returning(|_, _, _| Ok(()));
            let mut app = designer_app(store, vec![element(FieldTypeTag::TextField, "a")]);
            app.state
                .designer
                .add_element(1, element(FieldTypeTag::DateField, "b"))
                .unwrap();
            assert!(app.state.designer.is_dirty());

            app.handle_key(ctrl_s()).await.unwrap();
            assert_eq!(app.state.saves_in_flight, 1);
            wait_for_save(&mut app).await;

            assert_eq!(app.state.saves_in_flight, 0);
            assert!(!app.state.designer.is_dirty());
            let saved = &app.state.current_form.as_ref().unwrap().content;
            assert_eq!(saved.as_slice(), app.state.designer.elements());
        }

        #[tokio::test]
        async fn test_edits_during_save_stay_dirty() {
            let mut store = MockFormStore::new();
            store
                .expect_save_form_content()
                .times(1)
                .returning(|_, _, _| Ok(()));
            let mut app = designer_app(store, vec![]);
            app.state
                .designer
                .add_element(0, element(FieldTypeTag::TextField, "a"))
                .unwrap();
            app.start_save();
            // Keep editing while the save is in flight
            app.state
                .designer
                .add_element(1, element(FieldTypeTag::TextField, "b"))
                .unwrap();
            wait_for_save(&mut app).await;

            assert!(app.state.designer.is_dirty());
            assert_eq!(app.state.current_form.as_ref().unwrap().content.len(), 1);
        }

        #[tokio::test]
        async fn test_failed_save_keeps_draft() {
            let mut store = MockFormStore::new();
            store
                .expect_save_form_content()
                .times(1)
                .returning(|_, _, _| Err(StoreError::NotFound));
            let mut app = designer_app(store, vec![]);
            app.state
                .designer
                .add_element(0, element(FieldTypeTag::TextField, "a"))
                .unwrap();
            app.start_save();
            wait_for_save(&mut app).await;

            assert!(app.state.designer.is_dirty());
            assert_eq!(ids(&app), vec!["a"]);
            assert!(app.state.status.as_ref().is_some_and(|s| s.is_error));
        }

        #[tokio::test]
        async fn test_quit_writes_dirty_draft() {
            let mut store = MockFormStore::new();
            store
                .expect_save_form_content()
                .withf(|_, id, elements| *id == 1 && elements.len() == 1)
                .times(1)
                .returning(|_, _, _| Ok(()));
            let mut app = designer_app(store, vec![]);
            app.state
                .designer
                .add_element(0, element(FieldTypeTag::TextField, "a"))
                .unwrap();

            app.shutdown().await;
            assert_eq!(app.state.saves_in_flight, 0);
            assert!(!app.state.designer.is_dirty());
        }

        #[tokio::test]
        async fn test_quit_waits_for_running_save() {
            let data_dir = std::env::temp_dir()
                .join(format!("formsmith-app-{}", uuid::Uuid::new_v4()));
            let store = Arc::new(crate::store::JsonFileStore::open(&data_dir).await.unwrap());
            let id = store.create_form(&alice(), "Survey", "").await.unwrap();
            let form = store.load_form(&alice(), id).await.unwrap();

            let mut app = App::with_store(store, Some(alice()), FormsmithConfig::default());
            app.state.current_form = Some(form);
            app.state.open_designer(Designer::new());
            app.navigate(View::Designer);
            app.state
                .designer
                .add_element(0, element(FieldTypeTag::DateField, "when"))
                .unwrap();
            app.handle_key(ctrl_s()).await.unwrap();
            assert_eq!(app.state.saves_in_flight, 1);
            app.shutdown().await;
            drop(app);

            let reopened = crate::store::JsonFileStore::open(&data_dir).await.unwrap();
            let saved = reopened.load_form(&alice(), id).await.unwrap();
            assert_eq!(saved.content.len(), 1);
            assert_eq!(saved.content[0].id.as_str(), "when");
            let _ = std::fs::remove_dir_all(&data_dir);
        }
    }

    mod designer_keys {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_palette_enter_appends_and_selects() {
            let mut app = designer_app(MockFormStore::new(), vec![]);
            app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
                .await
                .unwrap();
            assert_eq!(app.state.designer_pane, DesignerPane::Palette);
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            let elements = app.state.designer.elements();
            assert_eq!(elements.len(), 1);
            assert_eq!(elements[0].tag(), palette_order()[0]);
            assert_eq!(app.state.designer.selected(), Some(&elements[0].id));
        }

        #[tokio::test]
        async fn test_shift_j_moves_selection_down() {
            let content = vec![
                element(FieldTypeTag::TextField, "a"),
                element(FieldTypeTag::TextField, "b"),
            ];
            let mut app = designer_app(MockFormStore::new(), content);
            app.handle_key(key(KeyCode::Char('j'))).await.unwrap();
            app.handle_key(KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT))
                .await
                .unwrap();
            assert_eq!(ids(&app), vec!["b", "a"]);
        }

        #[tokio::test]
        async fn test_x_removes_selected() {
            let content = vec![element(FieldTypeTag::TextField, "a")];
            let mut app = designer_app(MockFormStore::new(), content);
            app.handle_key(key(KeyCode::Char('j'))).await.unwrap();
            app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
            assert!(app.state.designer.elements().is_empty());
            assert!(app.state.designer.selected().is_none());
        }

        #[tokio::test]
        async fn test_property_edit_updates_label() {
            let content = vec![element(FieldTypeTag::TextField, "a")];
            let mut app = designer_app(MockFormStore::new(), content);
            app.handle_key(key(KeyCode::Char('j'))).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(app.state.designer_pane, DesignerPane::Properties);

            let label_index = app
                .state
                .selected_properties()
                .iter()
                .position(|p| p.key == "label")
                .unwrap();
            app.state.property_index = label_index;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            let edit = app.state.property_edit.as_mut().unwrap();
            edit.buffer.clear();
            for c in "Email".chars() {
                app.handle_key(key(KeyCode::Char(c))).await.unwrap();
            }
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            assert!(app.state.property_edit.is_none());
            let element = &app.state.designer.elements()[0];
            assert_eq!(element.attributes.label(), Some("Email"));
        }

        #[tokio::test]
        async fn test_rejected_property_shows_error() {
            let content = vec![element(FieldTypeTag::TextField, "a")];
            let mut app = designer_app(MockFormStore::new(), content);
            app.handle_key(key(KeyCode::Char('j'))).await.unwrap();
            app.state.designer_pane = DesignerPane::Properties;
            app.state.property_index = app
                .state
                .selected_properties()
                .iter()
                .position(|p| p.key == "label")
                .unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            app.state.property_edit.as_mut().unwrap().buffer = "x".to_string();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            let edit = app.state.property_edit.as_ref().unwrap();
            assert!(edit.error.is_some());
            assert_eq!(
                app.state.designer.elements()[0].attributes.label(),
                Some("Text field")
            );
        }

        #[tokio::test]
        async fn test_flag_property_toggles() {
            let content = vec![element(FieldTypeTag::TextField, "a")];
            let mut app = designer_app(MockFormStore::new(), content);
            app.handle_key(key(KeyCode::Char('j'))).await.unwrap();
            app.state.designer_pane = DesignerPane::Properties;
            app.state.property_index = app
                .state
                .selected_properties()
                .iter()
                .position(|p| p.key == "required")
                .unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(app.state.designer.elements()[0].attributes.is_required());
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(!app.state.designer.elements()[0].attributes.is_required());
        }
    }

    mod pointer {
        use super::*;
        use pretty_assertions::assert_eq;

        fn palette_cell(app: &App, tag: FieldTypeTag) -> (u16, u16) {
            let layout = app.designer_layout();
            let (_, rect) = layout
                .palette_buttons
                .iter()
                .find(|(t, _)| *t == tag)
                .unwrap();
            (rect.x + 2, rect.y)
        }

        /// Column inside the canvas and the first / last row of slot `index`
        fn slot_rows(app: &App, index: usize) -> (u16, u16, u16) {
            let layout = app.designer_layout();
            let slot = &layout.slots[index];
            let top = u16::try_from(slot.top).unwrap();
            (layout.canvas.x + 5, top, top + slot.height - 1)
        }

        async fn drag(app: &mut App, from: (u16, u16), to: (u16, u16)) {
            let (fc, fr) = from;
            let (tc, tr) = to;
            let down = MouseEventKind::Down(MouseButton::Left);
            let drag = MouseEventKind::Drag(MouseButton::Left);
            let up = MouseEventKind::Up(MouseButton::Left);
            app.handle_mouse(mouse(down, fc, fr)).await.unwrap();
            app.handle_mouse(mouse(drag, tc, tr)).await.unwrap();
            app.handle_mouse(mouse(up, tc, tr)).await.unwrap();
        }

        #[tokio::test]
        async fn test_drag_from_palette_onto_empty_canvas() {
            let mut app = designer_app(MockFormStore::new(), vec![]);
            let from = palette_cell(&app, FieldTypeTag::DateField);
            let canvas = app.designer_layout().canvas_inner();
            drag(&mut app, from, (canvas.x + 5, canvas.y + 5)).await;

            let elements = app.state.designer.elements();
            assert_eq!(elements.len(), 1);
            assert_eq!(elements[0].tag(), FieldTypeTag::DateField);
            assert_eq!(app.state.drag.state(), &DragState::Idle);
            // Drops leave the selection alone
            assert!(app.state.designer.selected().is_none());
        }

        #[tokio::test]
        async fn test_drag_from_palette_onto_top_half_inserts_before() {
            let content = vec![element(FieldTypeTag::TextField, "a")];
            let mut app = designer_app(MockFormStore::new(), content);
            let from = palette_cell(&app, FieldTypeTag::TitleField);
            let (column, top, _) = slot_rows(&app, 0);
            drag(&mut app, from, (column, top)).await;

            let elements = app.state.designer.elements();
            assert_eq!(elements.len(), 2);
            assert_eq!(elements[0].tag(), FieldTypeTag::TitleField);
            assert_eq!(elements[1].id.as_str(), "a");
        }

        #[tokio::test]
        async fn test_drag_existing_onto_bottom_half_moves_after() {
            let content = vec![
                element(FieldTypeTag::TextField, "a"),
                element(FieldTypeTag::TextField, "b"),
                element(FieldTypeTag::TextField, "c"),
            ];
            let mut app = designer_app(MockFormStore::new(), content);
            let (column, a_top, _) = slot_rows(&app, 0);
            let (_, _, b_bottom) = slot_rows(&app, 1);
            drag(&mut app, (column, a_top), (column, b_bottom)).await;

            assert_eq!(ids(&app), vec!["b", "a", "c"]);
        }

        #[tokio::test]
        async fn test_drop_on_itself_changes_nothing() {
            let content = vec![
                element(FieldTypeTag::TextField, "a"),
                element(FieldTypeTag::TextField, "b"),
            ];
            let mut app = designer_app(MockFormStore::new(), content);
            let (column, a_top, a_bottom) = slot_rows(&app, 0);
            drag(&mut app, (column, a_top), (column, a_bottom)).await;

            assert_eq!(ids(&app), vec!["a", "b"]);
            assert!(!app.state.designer.is_dirty());
        }

        #[tokio::test]
        async fn test_escape_cancels_drag() {
            let mut app = designer_app(MockFormStore::new(), vec![]);
            let (column, row) = palette_cell(&app, FieldTypeTag::TextField);
            let canvas = app.designer_layout().canvas_inner();
            app.handle_mouse(mouse(
                MouseEventKind::Down(MouseButton::Left),
                column,
                row,
            ))
            .await
            .unwrap();
            app.handle_mouse(mouse(
                MouseEventKind::Drag(MouseButton::Left),
                canvas.x + 3,
                canvas.y + 3,
            ))
            .await
            .unwrap();
            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert!(!app.state.drag.is_dragging());
            assert_eq!(app.state.current_view, View::Designer);

            app.handle_mouse(mouse(
                MouseEventKind::Up(MouseButton::Left),
                canvas.x + 3,
                canvas.y + 3,
            ))
            .await
            .unwrap();
            assert!(app.state.designer.elements().is_empty());
        }

        #[tokio::test]
        async fn test_palette_click_appends_and_selects() {
            let content = vec![element(FieldTypeTag::TextField, "a")];
            let mut app = designer_app(MockFormStore::new(), content);
            let (column, row) = palette_cell(&app, FieldTypeTag::NumberField);
            app.handle_mouse(mouse(
                MouseEventKind::Down(MouseButton::Left),
                column,
                row,
            ))
            .await
            .unwrap();
            app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), column, row))
                .await
                .unwrap();

            let elements = app.state.designer.elements();
            assert_eq!(elements.len(), 2);
            assert_eq!(elements[1].tag(), FieldTypeTag::NumberField);
            assert_eq!(app.state.designer.selected(), Some(&elements[1].id));
        }

        #[tokio::test]
        async fn test_click_on_empty_canvas_clears_selection() {
            let content = vec![element(FieldTypeTag::TextField, "a")];
            let mut app = designer_app(MockFormStore::new(), content);
            let (column, top, _) = slot_rows(&app, 0);
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), column, top))
                .await
                .unwrap();
            app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), column, top))
                .await
                .unwrap();
            assert_eq!(
                app.state.designer.selected().map(ElementId::as_str),
                Some("a")
            );

            let canvas = app.designer_layout().canvas_inner();
            let empty_row = canvas.bottom() - 1;
            app.handle_mouse(mouse(
                MouseEventKind::Down(MouseButton::Left),
                column,
                empty_row,
            ))
            .await
            .unwrap();
            assert!(app.state.designer.selected().is_none());
        }
    }

    mod submitting {
        use super::*;
        use pretty_assertions::assert_eq;

        fn published() -> PublishedForm {
            let mut name = element(FieldTypeTag::TextField, "name");
            name = behavior_of(&name)
                .apply_property(&name, "required", "true")
                .unwrap();
            PublishedForm {
                id: 1,
                name: "Survey".to_string(),
                description: String::new(),
                content: vec![
                    element(FieldTypeTag::TitleField, "title"),
                    name,
                    element(FieldTypeTag::TextField, "city"),
                ],
            }
        }

        #[tokio::test]
        async fn test_unknown_token_shows_not_found() {
            let mut store = MockFormStore::new();
            store
                .expect_load_published_form()
                .returning(|_| Err(StoreError::NotFound));
            let mut app = app_with(store);
            app.open_share("nope").await;
            assert_eq!(app.state.current_view, View::NotFound);
        }

        #[tokio::test]
        async fn test_missing_required_field_blocks_submit() {
            let mut store = MockFormStore::new();
            store
                .expect_load_published_form()
                .returning(|_| Ok(published()));
            store.expect_record_submission().times(0);
            let mut app = app_with(store);
            app.open_share("tok").await;
            assert_eq!(app.state.current_view, View::Submit);

            app.handle_key(ctrl_s()).await.unwrap();
            assert_eq!(app.state.current_view, View::Submit);
            let session = app.state.session.as_ref().unwrap();
            assert!(session.invalid().contains(&ElementId::from("name")));
            assert_eq!(session.invalid().len(), 1);
        }

        #[tokio::test]
        async fn test_filled_form_submits_once() {
            let mut store = MockFormStore::new();
            store
                .expect_load_published_form()
                .returning(|_| Ok(published()));
            store
                .expect_record_submission()
                .withf(|token, values| {
                    token.to_string() == "tok"
                        && values.len() == 3
                        && values.get(&ElementId::from("name"))
                            == Some(&FieldValue::Text("Ada".to_string()))
                })
                .times(1)
                .returning(|_, _| Ok(()));
            let mut app = app_with(store);
            app.open_share("tok").await;
            for c in "Ada".chars() {
                app.handle_key(key(KeyCode::Char(c))).await.unwrap();
            }
            app.handle_key(ctrl_s()).await.unwrap();
            assert_eq!(app.state.current_view, View::Submitted);

            // Terminal: a second submit never reaches the store
            app.state.current_view = View::Submit;
            app.handle_key(ctrl_s()).await.unwrap();
            assert_eq!(app.state.current_view, View::Submitted);
        }

        #[tokio::test]
        async fn test_preview_never_submits() {
            let mut store = MockFormStore::new();
            store.expect_record_submission().times(0);
            let content = vec![element(FieldTypeTag::TextField, "a")];
            let mut app = designer_app(store, content);
            app.handle_key(key(KeyCode::Char('p'))).await.unwrap();
            assert_eq!(app.state.current_view, View::Preview);
            app.handle_key(ctrl_s()).await.unwrap();
            assert_eq!(app.state.current_view, View::Preview);

            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert_eq!(app.state.current_view, View::Designer);
            assert!(app.state.session.is_none());
        }
    }
}
