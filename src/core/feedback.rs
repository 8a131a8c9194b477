use crate::domain::form::{ErrorAnchor, ErrorResponse, FormDocument, INVALID_CLASS};
use std::collections::{BTreeMap, BTreeSet};

/// Maps a server validation response onto form inputs: attaches error lists,
/// marks controls invalid and clears the marking again on the next user edit.
///
/// Field keys are resolved as `prefix + key`, by input id first and submitted
/// name second. Radio/checkbox controls are handled as a group sharing one
/// list.
#[derive(Debug, Default)]
pub struct ErrorFilter {
    prefix: String,
    active: BTreeMap<ErrorAnchor, Vec<String>>,
    watched: BTreeSet<ErrorAnchor>,
}

impl ErrorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Apply a response to the form. Returns the deduplicated messages that
    /// were actually attached; entries without a matching input are logged and
    /// skipped.
    pub fn apply(&mut self, form: &mut FormDocument, response: &ErrorResponse) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut applied = Vec::new();

        for (key, messages) in &response.errors {
            let full_key = format!("{}{}", self.prefix, key);

            let Some(input) = form.find_by_id_or_name(&full_key) else {
                tracing::error!("Input element not found for {}", full_key);
                continue;
            };
            let (id, name, grouped) = (input.id.clone(), input.name.clone(), input.kind.is_grouped());

            if grouped {
                self.attach_to_group(form, &name, messages);
            } else {
                self.attach_to_input(form, &id, messages);
            }

            for message in messages {
                if seen.insert(message.as_str()) {
                    applied.push(message.clone());
                }
            }
        }

        applied
    }

    fn attach_to_input(&mut self, form: &mut FormDocument, id: &str, messages: &[String]) {
        form.attach_errors(ErrorAnchor::Input(id.to_string()), messages.to_vec());
        if let Some(input) = form.input_mut(id) {
            input.classes.insert(INVALID_CLASS.to_string());
        }

        let anchor = ErrorAnchor::Input(id.to_string());
        self.watched.insert(anchor.clone());
        self.active.insert(anchor, messages.to_vec());
    }

    fn attach_to_group(&mut self, form: &mut FormDocument, name: &str, messages: &[String]) {
        form.attach_errors(ErrorAnchor::Group(name.to_string()), messages.to_vec());
        for member in form.group_members_mut(name) {
            member.classes.insert(INVALID_CLASS.to_string());
        }

        let anchor = ErrorAnchor::Group(name.to_string());
        self.watched.insert(anchor.clone());
        self.active.insert(anchor, messages.to_vec());
    }

    /// Input event on a single control: drop its marker and list.
    pub fn notify_input(&mut self, form: &mut FormDocument, id: &str) {
        let anchor = ErrorAnchor::Input(id.to_string());
        if !self.watched.contains(&anchor) {
            return;
        }

        if let Some(input) = form.input_mut(id) {
            input.classes.remove(INVALID_CLASS);
        }
        form.detach_errors(&anchor);
        self.active.remove(&anchor);
        self.watched.remove(&anchor);
    }

    /// Change event on any member of a group: clear the whole group.
    pub fn notify_change(&mut self, form: &mut FormDocument, group_name: &str) {
        let anchor = ErrorAnchor::Group(group_name.to_string());
        if !self.watched.contains(&anchor) {
            return;
        }

        for member in form.group_members_mut(group_name) {
            member.classes.remove(INVALID_CLASS);
        }
        form.detach_errors(&anchor);
        self.active.remove(&anchor);
        self.watched.remove(&anchor);
    }

    pub fn clear_all(&mut self, form: &mut FormDocument) {
        let anchors: Vec<ErrorAnchor> = self.active.keys().cloned().collect();
        for anchor in anchors {
            match &anchor {
                ErrorAnchor::Input(id) => {
                    let id = id.clone();
                    self.notify_input(form, &id);
                }
                ErrorAnchor::Group(name) => {
                    let name = name.clone();
                    self.notify_change(form, &name);
                }
            }
        }
    }

    pub fn active_errors(&self) -> &BTreeMap<ErrorAnchor, Vec<String>> {
        &self.active
    }

    /// Structured dump of everything currently attached.
    pub fn log_errors(&self) {
        for (anchor, messages) in &self.active {
            match anchor {
                ErrorAnchor::Input(id) => {
                    tracing::error!("Errors for input {}: {:?}", id, messages);
                }
                ErrorAnchor::Group(name) => {
                    tracing::error!("Errors for group {}: {:?}", name, messages);
                }
            }
        }
    }
}
