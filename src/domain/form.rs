use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Class the surrounding stylesheet styles as an invalid control.
pub const INVALID_CLASS: &str = "is-invalid";

/// Classes every rendered error list carries.
pub const ERROR_LIST_CLASSES: [&str; 3] = ["error-list", "list-unstyled", "text-danger"];

/// Control kind. Radio and checkbox controls are grouped: same-named inputs
/// share one error list anchored at their common parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Email,
    Password,
    TextArea,
    Select,
    Radio,
    Checkbox,
}

impl InputKind {
    pub const fn is_grouped(self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }
}

/// One form control: id, submitted name, kind and its current class set.
#[derive(Debug, Clone)]
pub struct FormInput {
    pub id: String,
    pub name: String,
    pub kind: InputKind,
    pub classes: BTreeSet<String>,
}

impl FormInput {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: InputKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            classes: BTreeSet::new(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.classes.contains(INVALID_CLASS)
    }
}

/// Where an error list is attached: after a single input, or inside the parent
/// of a same-named radio/checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorAnchor {
    Input(String),
    Group(String),
}

/// A rendered list of error messages for one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorList {
    pub messages: Vec<String>,
}

/// Headless stand-in for the form the error filter mutates: a flat set of
/// inputs plus the error lists currently attached to them.
#[derive(Debug, Default)]
pub struct FormDocument {
    inputs: Vec<FormInput>,
    error_lists: BTreeMap<ErrorAnchor, ErrorList>,
}

impl FormDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, input: FormInput) {
        self.inputs.push(input);
    }

    pub fn input(&self, id: &str) -> Option<&FormInput> {
        self.inputs.iter().find(|input| input.id == id)
    }

    pub fn input_mut(&mut self, id: &str) -> Option<&mut FormInput> {
        self.inputs.iter_mut().find(|input| input.id == id)
    }

    /// Lookup order matches the document: id first, then submitted name.
    pub fn find_by_id_or_name(&self, key: &str) -> Option<&FormInput> {
        self.input(key)
            .or_else(|| self.inputs.iter().find(|input| input.name == key))
    }

    pub fn group_members<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormInput> + 'a {
        self.inputs.iter().filter(move |input| input.name == name)
    }

    pub fn group_members_mut<'a>(&'a mut self, name: &'a str) -> impl Iterator<Item = &'a mut FormInput> + 'a {
        self.inputs.iter_mut().filter(move |input| input.name == name)
    }

    /// Attach an error list, replacing whatever list the anchor already had.
    pub fn attach_errors(&mut self, anchor: ErrorAnchor, messages: Vec<String>) {
        self.error_lists.insert(anchor, ErrorList { messages });
    }

    pub fn detach_errors(&mut self, anchor: &ErrorAnchor) -> Option<ErrorList> {
        self.error_lists.remove(anchor)
    }

    pub fn error_list(&self, anchor: &ErrorAnchor) -> Option<&ErrorList> {
        self.error_lists.get(anchor)
    }

    pub fn error_lists(&self) -> impl Iterator<Item = (&ErrorAnchor, &ErrorList)> {
        self.error_lists.iter()
    }

    pub fn error_count(&self) -> usize {
        self.error_lists.len()
    }
}

/// Shape of the server's field-validation response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorResponse {
    pub fn from_json(body: &str) -> crate::utils::error::Result<Self> {
        serde_json::from_str(body).map_err(Into::into)
    }
}
