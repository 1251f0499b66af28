use super::*;

fn asha_form() -> HashMap<String, String> {
    [
        ("name", "Asha"),
        ("email", "a@x.com"),
        ("phone", "555"),
        ("dob", "2000-01-01"),
        ("gender", "F"),
        ("interest", "Outreach"),
        ("why", "Want to help"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn builds_volunteer_from_complete_form() {
    let volunteer = NewVolunteer::from_form(&asha_form()).expect("valid form");
    assert_eq!(volunteer.name, "Asha");
    assert_eq!(volunteer.email, "a@x.com");
    assert_eq!(volunteer.date_of_birth.as_deref(), Some("2000-01-01"));
    assert_eq!(volunteer.motivation, "Want to help");
}

#[test]
fn missing_motivation_is_reported() {
    let mut form = asha_form();
    form.remove("why");
    let err = NewVolunteer::from_form(&form).expect_err("should fail");
    assert_eq!(err, ValidationError::MissingField(FormField::Motivation));
}

#[test]
fn blank_required_field_counts_as_missing() {
    let mut form = asha_form();
    form.insert("phone".into(), "   ".into());
    let err = NewVolunteer::from_form(&form).expect_err("should fail");
    assert_eq!(err, ValidationError::MissingField(FormField::Phone));
}

#[test]
fn first_missing_field_in_form_order_wins() {
    let mut form = asha_form();
    form.remove("why");
    form.remove("email");
    let err = NewVolunteer::from_form(&form).expect_err("should fail");
    assert_eq!(err.field(), FormField::Email);
}

#[test]
fn date_of_birth_is_optional() {
    let mut form = asha_form();
    form.remove("dob");
    let volunteer = NewVolunteer::from_form(&form).expect("valid form");
    assert_eq!(volunteer.date_of_birth, None);

    form.insert("dob".into(), "".into());
    let volunteer = NewVolunteer::from_form(&form).expect("valid form");
    assert_eq!(volunteer.date_of_birth, None);
}

#[test]
fn values_are_trimmed() {
    let mut form = asha_form();
    form.insert("name".into(), "  Asha \n".into());
    let volunteer = NewVolunteer::from_form(&form).expect("valid form");
    assert_eq!(volunteer.name, "Asha");
}

#[test]
fn rejects_values_wider_than_their_column() {
    let mut form = asha_form();
    form.insert("gender".into(), "x".repeat(11));
    let err = NewVolunteer::from_form(&form).expect_err("should fail");
    assert_eq!(
        err,
        ValidationError::TooLong {
            field: FormField::Gender,
            max: 10
        }
    );
}

#[test]
fn motivation_has_no_length_limit() {
    let mut form = asha_form();
    form.insert("why".into(), "help ".repeat(2000));
    assert!(NewVolunteer::from_form(&form).is_ok());
}

#[test]
fn ignores_unknown_fields() {
    let mut form = asha_form();
    form.insert("csrf".into(), "token".into());
    assert!(NewVolunteer::from_form(&form).is_ok());
}
