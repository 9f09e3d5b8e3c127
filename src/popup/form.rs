use crate::domain::{NewContact, NewTemplate, Resource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub multiline: bool,
}

impl FormField {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            multiline: false,
        }
    }
}

/// What a complete form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Contact(NewContact),
    Template(NewTemplate),
}

/// The "add contact" / "add template" modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordForm {
    pub resource: Resource,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl RecordForm {
    pub fn new(resource: Resource) -> Self {
        let fields = match resource {
            Resource::Contact => vec![FormField::new("Name"), FormField::new("Email")],
            Resource::Template => vec![
                FormField::new("Title"),
                FormField::new("Subject"),
                FormField {
                    multiline: true,
                    ..FormField::new("Body")
                },
            ],
        };
        Self {
            resource,
            fields,
            focus: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.resource {
            Resource::Contact => " Add contact ",
            Resource::Template => " Add template ",
        }
    }

    pub fn focused(&self) -> &FormField {
        &self.fields[self.focus]
    }

    pub fn is_last_field(&self) -> bool {
        self.focus + 1 == self.fields.len()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push_char(&mut self, c: char) {
        self.fields[self.focus].value.push(c);
    }

    pub fn newline(&mut self) {
        if self.focused().multiline {
            self.fields[self.focus].value.push('\n');
        }
    }

    pub fn backspace(&mut self) {
        self.fields[self.focus].value.pop();
    }

    fn value(&self, i: usize) -> String {
        self.fields[i].value.trim().to_string()
    }

    /// `None` while any field is blank after trimming.
    pub fn submission(&self) -> Option<Submission> {
        if self.fields.iter().any(|f| f.value.trim().is_empty()) {
            return None;
        }
        Some(match self.resource {
            Resource::Contact => Submission::Contact(NewContact {
                name: self.value(0),
                email: self.value(1),
            }),
            Resource::Template => Submission::Template(NewTemplate {
                title: self.value(0),
                subject: self.value(1),
                body: self.value(2),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_in(form: &mut RecordForm, s: &str) {
        for c in s.chars() {
            form.push_char(c);
        }
    }

    #[test]
    fn blank_fields_block_submission() {
        let mut form = RecordForm::new(Resource::Contact);
        type_in(&mut form, "Jo");
        assert_eq!(form.submission(), None);
        form.focus_next();
        type_in(&mut form, "   ");
        assert_eq!(form.submission(), None);
    }

    #[test]
    fn values_are_trimmed() {
        let mut form = RecordForm::new(Resource::Contact);
        type_in(&mut form, " Jo ");
        form.focus_next();
        type_in(&mut form, "jo@x.com ");
        assert_eq!(
            form.submission(),
            Some(Submission::Contact(NewContact {
                name: "Jo".into(),
                email: "jo@x.com".into()
            }))
        );
    }

    #[test]
    fn only_the_body_accepts_newlines() {
        let mut form = RecordForm::new(Resource::Template);
        form.newline();
        assert_eq!(form.fields[0].value, "");
        form.focus_prev();
        assert!(form.is_last_field());
        type_in(&mut form, "a");
        form.newline();
        type_in(&mut form, "b");
        assert_eq!(form.fields[2].value, "a\nb");
    }
}
