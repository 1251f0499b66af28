use mailer::OutgoingEmail;
use shared::domain::NewVolunteer;

use crate::Organization;

/// Summary for the organization inbox. Replies go straight to the volunteer.
pub fn organization_notification(org: &Organization, volunteer: &NewVolunteer) -> OutgoingEmail {
    let dob = volunteer.date_of_birth.as_deref().unwrap_or("Not provided");
    let body = format!(
        "Hello {org_name} Team,

You have a new volunteer submission! 🎉

Here are the details:

Name: {name}
Email: {email}
Phone: {phone}
Date of Birth: {dob}
Gender: {gender}
Area of Interest: {interest}

Motivation:
{motivation}

Please reach out to them promptly to welcome them aboard.

Warm regards,
Your Website Bot 🤖
",
        org_name = org.name,
        name = volunteer.name,
        email = volunteer.email,
        phone = volunteer.phone,
        gender = volunteer.gender,
        interest = volunteer.interest,
        motivation = volunteer.motivation,
    );

    OutgoingEmail {
        from: org.email.clone(),
        to: vec![org.email.clone()],
        reply_to: Some(volunteer.email.clone()),
        subject: format!("🎉 New Volunteer Registration - {}", org.name),
        body,
    }
}

pub fn volunteer_confirmation(org: &Organization, volunteer: &NewVolunteer) -> OutgoingEmail {
    let body = format!(
        "Dear {name},

Thank you so much for your interest in volunteering with {org_name}!

We have received your application and will get in touch with you shortly. Your willingness to contribute to our cause means the world to us. 🌍

In the meantime, feel free to follow us on our social platforms and stay updated on our activities.

Warm regards,
The {org_name}
📧 {org_email}
",
        name = volunteer.name,
        org_name = org.name,
        org_email = org.email,
    );

    OutgoingEmail {
        from: org.email.clone(),
        to: vec![volunteer.email.clone()],
        reply_to: None,
        subject: format!("Thank You for Volunteering with {}!", org.name),
        body,
    }
}
