use std::collections::HashMap;

use crate::{
    domain::{FormField, NewVolunteer},
    error::ValidationError,
};

impl NewVolunteer {
    /// Builds a submission from raw form values.
    ///
    /// Values are trimmed. A required field that is absent or blank is
    /// reported as missing; fields are checked in form order and the first
    /// problem wins. A blank date of birth becomes `None`.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, ValidationError> {
        for field in FormField::ALL {
            let value = field_value(form, field);
            match value {
                None if field.is_required() => return Err(ValidationError::MissingField(field)),
                Some(value) => {
                    if let Some(max) = field.max_len() {
                        if value.chars().count() > max {
                            return Err(ValidationError::TooLong { field, max });
                        }
                    }
                }
                None => {}
            }
        }

        let required = |field: FormField| {
            field_value(form, field)
                .map(str::to_string)
                .ok_or(ValidationError::MissingField(field))
        };

        Ok(Self {
            name: required(FormField::Name)?,
            email: required(FormField::Email)?,
            phone: required(FormField::Phone)?,
            date_of_birth: field_value(form, FormField::DateOfBirth).map(str::to_string),
            gender: required(FormField::Gender)?,
            interest: required(FormField::Interest)?,
            motivation: required(FormField::Motivation)?,
        })
    }
}

fn field_value(form: &HashMap<String, String>, field: FormField) -> Option<&str> {
    form.get(field.form_key())
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
