use ratatui::widgets::ListState;

use crate::config::Flow;
use crate::domain::{Contact, RecipientKind, Recipients, RecordId, Resource, Template};
use crate::inject::{InjectionRequest, TemplateContent};
use crate::popup::form::{RecordForm, Submission};
use crate::popup::rows::{RenderedList, SelectMode, render_list};
use crate::popup::tooltip::PreviewTooltip;
use crate::popup::wizard::{Step, Wizard};
use crate::store::RemoteStore;
use crate::tab::{TabError, TabHost, WRONG_TAB_ALERT, apply_to_active_tab};

pub const NO_CONTACTS: &str = "No contacts saved.";
pub const NO_TEMPLATES: &str = "No templates saved.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub resource: Resource,
    pub id: RecordId,
    pub label: String,
}

/// Everything the popup knows during one session. Collections are only ever
/// replaced wholesale by [`AppState::reload`].
pub struct AppState {
    pub flow: Flow,
    pub contacts: Vec<Contact>,
    pub templates: Vec<Template>,
    /// Set when the last load failed; the UI shows only this.
    pub load_error: Option<String>,

    pub wizard: Wizard,
    pub recipients: Recipients,
    pub active_kind: RecipientKind,
    pub chosen_template: Option<RecordId>,

    pub contact_list: ListState,
    pub template_list: ListState,
    pub tooltip: PreviewTooltip,
    pub hovered: Option<usize>,

    pub form: Option<RecordForm>,
    pub pending_delete: Option<PendingDelete>,
    /// Blocking message; swallows the next key press.
    pub alert: Option<String>,
    pub should_close: bool,
}

fn clamp_selection(list: &mut ListState, len: usize) {
    if len == 0 {
        list.select(None);
    } else {
        let cur = list.selected().unwrap_or(0);
        list.select(Some(cur.min(len - 1)));
    }
}

impl AppState {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            contacts: vec![],
            templates: vec![],
            load_error: None,
            wizard: Wizard::for_flow(flow),
            recipients: Recipients::default(),
            active_kind: RecipientKind::To,
            chosen_template: None,
            contact_list: ListState::default(),
            template_list: ListState::default(),
            tooltip: PreviewTooltip::default(),
            hovered: None,
            form: None,
            pending_delete: None,
            alert: None,
            should_close: false,
        }
    }

    pub fn reload(&mut self, store: &dyn RemoteStore) {
        let loaded = match self.flow {
            Flow::Wizard => store
                .list_contacts()
                .and_then(|c| Ok((c, store.list_templates()?))),
            Flow::TemplateOnly => store.list_templates().map(|t| (Vec::new(), t)),
        };

        match loaded {
            Ok((contacts, templates)) => {
                self.contacts = contacts;
                self.templates = templates;
                self.load_error = None;

                self.recipients
                    .retain_known(self.contacts.iter().map(|c| c.email.as_str()));
                if let Some(id) = &self.chosen_template
                    && !self.templates.iter().any(|t| &t.id == id)
                {
                    self.chosen_template = None;
                }
                clamp_selection(&mut self.contact_list, self.contacts.len());
                clamp_selection(&mut self.template_list, self.templates.len());
                self.hovered = None;
                self.tooltip.on_leave();
            }
            Err(e) => {
                log::error!("failed to fetch data: {e}");
                self.load_error = Some(e.to_string());
            }
        }
    }

    pub fn step(&self) -> Step {
        self.wizard.step()
    }

    pub fn contact_rows(&self) -> RenderedList {
        render_list(
            &self.contacts,
            SelectMode::Multi,
            |c| self.recipients.contains(self.active_kind, &c.email),
            NO_CONTACTS,
        )
    }

    pub fn template_rows(&self) -> RenderedList {
        let mode = match self.flow {
            Flow::Wizard => SelectMode::Single,
            Flow::TemplateOnly => SelectMode::ActionOnly,
        };
        render_list(
            &self.templates,
            mode,
            |t| self.chosen_template.as_ref() == Some(&t.id),
            NO_TEMPLATES,
        )
    }

    pub fn highlighted_template(&self) -> Option<&Template> {
        self.templates.get(self.template_list.selected()?)
    }

    pub fn chosen(&self) -> Option<&Template> {
        let id = self.chosen_template.as_ref()?;
        self.templates.iter().find(|t| &t.id == id)
    }

    fn active_list(&mut self) -> Option<(&mut ListState, usize)> {
        match self.step() {
            Step::Recipients => Some((&mut self.contact_list, self.contacts.len())),
            Step::Template => Some((&mut self.template_list, self.templates.len())),
            Step::Review => None,
        }
    }

    pub fn move_selection(&mut self, delta: i32) {
        let Some((list, len)) = self.active_list() else {
            return;
        };
        if len == 0 {
            list.select(None);
            return;
        }
        let cur = list.selected().unwrap_or(0) as i32;
        let next = (cur + delta).clamp(0, len as i32 - 1) as usize;
        list.select(Some(next));
    }

    /// Space on the highlighted row: checkbox toggle for contacts, radio
    /// pick for templates.
    pub fn toggle_highlighted(&mut self) {
        match self.step() {
            Step::Recipients => {
                let Some(c) = self.contact_list.selected().and_then(|i| self.contacts.get(i))
                else {
                    return;
                };
                let email = c.email.clone();
                self.recipients.toggle(self.active_kind, &email);
            }
            Step::Template if self.flow == Flow::Wizard => {
                self.chosen_template = self.highlighted_template().map(|t| t.id.clone());
            }
            _ => {}
        }
    }

    pub fn cycle_kind(&mut self) {
        self.active_kind = self.active_kind.cycle();
    }

    pub fn next_step(&mut self) {
        if self.wizard.next() {
            self.clear_hover();
        }
    }

    pub fn previous_step(&mut self) {
        if self.wizard.previous() {
            self.clear_hover();
        }
    }

    /// Pointer over template row `index` (or over nothing) at `(x, y)`.
    pub fn hover_template(&mut self, index: Option<usize>, x: u16, y: u16) {
        let rows = self.template_rows();
        match index.and_then(|i| rows.item(i).map(|row| (i, row))) {
            Some((i, row)) => {
                if self.hovered != Some(i) {
                    self.tooltip.on_enter(row);
                    self.hovered = Some(i);
                }
                self.tooltip.on_move(x, y);
            }
            None => self.clear_hover(),
        }
    }

    pub fn clear_hover(&mut self) {
        if self.hovered.take().is_some() {
            self.tooltip.on_leave();
        }
    }

    // ----- Add / delete -----

    pub fn open_form(&mut self) {
        let resource = match self.step() {
            Step::Recipients => Resource::Contact,
            Step::Template => Resource::Template,
            Step::Review => return,
        };
        self.form = Some(RecordForm::new(resource));
    }

    /// Dropping the form discards whatever was typed.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Creates the record if every field is filled, then reloads. An
    /// incomplete form stays open and nothing is sent.
    pub fn submit_form(&mut self, store: &dyn RemoteStore) {
        let Some(submission) = self.form.as_ref().and_then(RecordForm::submission) else {
            log::debug!("form incomplete; not submitting");
            return;
        };
        let res = match &submission {
            Submission::Contact(c) => store.create_contact(c),
            Submission::Template(t) => store.create_template(t),
        };
        if let Err(e) = res {
            log::warn!("{e}");
        }
        self.close_form();
        self.reload(store);
    }

    pub fn request_delete(&mut self) {
        let (rows, index) = match self.step() {
            Step::Recipients => (self.contact_rows(), self.contact_list.selected()),
            Step::Template => (self.template_rows(), self.template_list.selected()),
            Step::Review => return,
        };
        let Some(row) = index.and_then(|i| rows.item(i)) else {
            return;
        };
        self.pending_delete = Some(PendingDelete {
            resource: row.delete.resource,
            id: row.delete.id.clone(),
            label: row.label.clone(),
        });
    }

    pub fn confirm_delete(&mut self, store: &dyn RemoteStore) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        if let Err(e) = store.delete(pending.resource, &pending.id) {
            log::warn!("{e}");
        }
        self.reload(store);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    // ----- Apply -----

    pub fn build_request(&self) -> InjectionRequest {
        match self.flow {
            Flow::Wizard => InjectionRequest {
                template: self.chosen().map(TemplateContent::from),
                recipients: self.recipients.clone(),
            },
            Flow::TemplateOnly => InjectionRequest {
                template: self.highlighted_template().map(TemplateContent::from),
                recipients: Recipients::default(),
            },
        }
    }

    /// Sends the current selection to the active tab. Success closes the
    /// popup; refusal raises an alert instead.
    pub fn apply(&mut self, host: &dyn TabHost, gmail_origin: &str) {
        let request = self.build_request();
        if request.is_empty() {
            log::debug!("nothing selected; apply ignored");
            return;
        }
        match apply_to_active_tab(host, gmail_origin, &request) {
            Ok(_) => self.should_close = true,
            Err(TabError::WrongTab { url }) => {
                log::info!("refusing to inject into {url}");
                self.alert = Some(WRONG_TAB_ALERT.to_string());
            }
            Err(e) => {
                log::error!("apply failed: {e}");
                self.alert = Some(format!("Could not reach the Gmail tab: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::fakes::{FakeHost, GMAIL, seeded};

    fn type_form(state: &mut AppState, values: &[&str]) {
        let form = state.form.as_mut().expect("form open");
        for (i, v) in values.iter().enumerate() {
            form.focus = i;
            for c in v.chars() {
                form.push_char(c);
            }
        }
    }

    #[test]
    fn load_failure_replaces_the_ui_with_an_error() {
        let store = seeded();
        store.offline.set(true);
        let mut state = AppState::new(Flow::Wizard);
        state.reload(&store);
        let err = state.load_error.as_deref().expect("error recorded");
        assert!(err.contains("could not load contacts"));
    }

    #[test]
    fn creating_a_contact_reloads_the_full_snapshot() {
        let store = seeded();
        let mut state = AppState::new(Flow::Wizard);
        state.reload(&store);
        assert_eq!(state.contacts.len(), 2);

        state.open_form();
        type_form(&mut state, &["Jo", "jo@x.com"]);
        state.submit_form(&store);

        assert!(state.form.is_none());
        assert_eq!(state.contacts.len(), 3);
        assert_eq!(state.contacts[2].email, "jo@x.com");
        assert_eq!(state.contacts, *store.contacts.borrow());
    }

    #[test]
    fn incomplete_form_sends_nothing_and_stays_open() {
        let store = seeded();
        let mut state = AppState::new(Flow::Wizard);
        state.reload(&store);
        state.open_form();
        type_form(&mut state, &["Jo"]);
        state.submit_form(&store);

        assert!(state.form.is_some());
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn deleting_prunes_selection_state() {
        let store = seeded();
        let mut state = AppState::new(Flow::Wizard);
        state.reload(&store);

        state.contact_list.select(Some(1));
        state.toggle_highlighted();
        assert_eq!(state.recipients.to, vec!["bob@x.com".to_string()]);

        state.request_delete();
        let pending = state.pending_delete.clone().expect("pending delete");
        assert_eq!(pending.resource, Resource::Contact);
        assert_eq!(pending.label, "Bob <bob@x.com>");
        state.confirm_delete(&store);

        assert_eq!(state.contacts.len(), 1);
        assert!(state.recipients.is_empty());
        assert_eq!(state.contact_list.selected(), Some(0));
    }

    #[test]
    fn cancelled_delete_leaves_the_store_alone() {
        let store = seeded();
        let mut state = AppState::new(Flow::Wizard);
        state.reload(&store);
        state.contact_list.select(Some(0));
        state.request_delete();
        state.cancel_delete();
        state.confirm_delete(&store);
        assert_eq!(store.writes.get(), 0);
        assert_eq!(state.contacts.len(), 2);
    }

    #[test]
    fn wizard_apply_sends_template_and_recipients() {
        let store = seeded();
        let host = FakeHost::at("https://mail.google.com/mail/u/0/#inbox");
        let mut state = AppState::new(Flow::Wizard);
        state.reload(&store);

        state.contact_list.select(Some(0));
        state.toggle_highlighted();
        state.cycle_kind();
        state.contact_list.select(Some(1));
        state.toggle_highlighted();

        state.next_step();
        state.template_list.select(Some(0));
        state.toggle_highlighted();
        assert!(state.template_rows().item(0).is_some_and(|r| r
            .select
            .as_ref()
            .is_some_and(|s| s.checked)));
        state.next_step();
        assert_eq!(state.step(), Step::Review);

        state.apply(&host, GMAIL);
        assert!(state.should_close);
        let sent = host.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients.to, vec!["ann@x.com".to_string()]);
        assert_eq!(sent[0].recipients.cc, vec!["bob@x.com".to_string()]);
        assert_eq!(
            sent[0].template.as_ref().map(|t| t.subject.as_str()),
            Some("Hi there")
        );
    }

    #[test]
    fn wrong_tab_raises_alert_and_keeps_popup_open() {
        let store = seeded();
        let host = FakeHost::at("https://news.ycombinator.com/");
        let mut state = AppState::new(Flow::TemplateOnly);
        state.reload(&store);
        assert!(state.contacts.is_empty());

        state.apply(&host, GMAIL);
        assert_eq!(state.alert.as_deref(), Some(WRONG_TAB_ALERT));
        assert!(!state.should_close);
        assert!(host.sent.borrow().is_empty());
    }

    #[test]
    fn nothing_selected_means_nothing_sent() {
        let store = seeded();
        let host = FakeHost::at(GMAIL);
        let mut state = AppState::new(Flow::Wizard);
        state.reload(&store);
        state.apply(&host, GMAIL);
        assert!(host.sent.borrow().is_empty());
        assert!(!state.should_close);
    }

    #[test]
    fn hovering_template_rows_drives_the_tooltip() {
        let store = seeded();
        let mut state = AppState::new(Flow::TemplateOnly);
        state.reload(&store);

        state.hover_template(Some(0), 4, 6);
        assert!(state.tooltip.visible);
        assert_eq!(state.tooltip.subject, "Hi there");
        assert_eq!((state.tooltip.x, state.tooltip.y), (19, 6));

        state.hover_template(Some(5), 4, 7);
        assert!(!state.tooltip.visible);
        assert_eq!(state.hovered, None);
    }
}
