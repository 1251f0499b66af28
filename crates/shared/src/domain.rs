#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolunteerId(pub i64);

/// A validated submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVolunteer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<String>,
    pub gender: String,
    pub interest: String,
    pub motivation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerRecord {
    pub id: VolunteerId,
    pub volunteer: NewVolunteer,
}

/// Inputs of the sign-up form, in the order they appear on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
    DateOfBirth,
    Gender,
    Interest,
    Motivation,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::DateOfBirth,
        FormField::Gender,
        FormField::Interest,
        FormField::Motivation,
    ];

    /// The `name` attribute used by the HTML form.
    pub fn form_key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::DateOfBirth => "dob",
            FormField::Gender => "gender",
            FormField::Interest => "interest",
            FormField::Motivation => "why",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
            FormField::DateOfBirth => "Date of Birth",
            FormField::Gender => "Gender",
            FormField::Interest => "Area of Interest",
            FormField::Motivation => "Motivation",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, FormField::DateOfBirth)
    }

    /// Column width in characters; `None` for free text.
    pub fn max_len(self) -> Option<usize> {
        match self {
            FormField::Name => Some(100),
            FormField::Email => Some(120),
            FormField::Phone => Some(20),
            FormField::DateOfBirth => Some(20),
            FormField::Gender => Some(10),
            FormField::Interest => Some(50),
            FormField::Motivation => None,
        }
    }
}
