use crate::models::{Application, ApplicationStatus, NewApplication};

/// Built-in starter set, installed when no saved applications exist so a
/// first run has a populated dashboard to explore.
pub fn default_applications() -> Vec<Application> {
    let seeds: [(&str, NewApplication); 6] = [
        (
            "1",
            NewApplication {
                company: "Acme Inc".to_string(),
                position: "Senior Frontend Developer".to_string(),
                status: Some(ApplicationStatus::Applied),
                date_applied: Some("2025-03-10".to_string()),
                location: Some("Remote".to_string()),
                job_type: Some("full-time".to_string()),
                salary: Some("$120,000 - $150,000".to_string()),
                description: Some(
                    "Senior Frontend Developer position with focus on React and Next.js"
                        .to_string(),
                ),
                url: Some("https://acme.com/careers".to_string()),
                ..Default::default()
            },
        ),
        (
            "2",
            NewApplication {
                company: "Globex Corp".to_string(),
                position: "React Developer".to_string(),
                status: Some(ApplicationStatus::Applied),
                date_applied: Some("2025-03-08".to_string()),
                location: Some("New York, NY".to_string()),
                job_type: Some("full-time".to_string()),
                url: Some("https://globex.com/jobs".to_string()),
                ..Default::default()
            },
        ),
        (
            "3",
            NewApplication {
                company: "Initech".to_string(),
                position: "UI/UX Developer".to_string(),
                status: Some(ApplicationStatus::PhoneScreen),
                date_applied: Some("2025-03-05".to_string()),
                location: Some("San Francisco, CA".to_string()),
                job_type: Some("contract".to_string()),
                url: Some("https://initech.com/careers".to_string()),
                ..Default::default()
            },
        ),
        (
            "4",
            NewApplication {
                company: "Massive Dynamic".to_string(),
                position: "Full Stack Developer".to_string(),
                status: Some(ApplicationStatus::TechnicalInterview),
                date_applied: Some("2025-03-01".to_string()),
                location: Some("Boston, MA".to_string()),
                job_type: Some("full-time".to_string()),
                url: Some("https://massivedynamic.com/jobs".to_string()),
                ..Default::default()
            },
        ),
        (
            "5",
            NewApplication {
                company: "Cyberdyne Systems".to_string(),
                position: "Frontend Engineer".to_string(),
                status: Some(ApplicationStatus::Rejected),
                date_applied: Some("2025-02-28".to_string()),
                location: Some("Austin, TX".to_string()),
                job_type: Some("full-time".to_string()),
                url: Some("https://cyberdyne.com/careers".to_string()),
                ..Default::default()
            },
        ),
        (
            "6",
            NewApplication {
                company: "Stark Industries".to_string(),
                position: "React Native Developer".to_string(),
                status: Some(ApplicationStatus::Offer),
                date_applied: Some("2025-02-25".to_string()),
                location: Some("Remote".to_string()),
                job_type: Some("full-time".to_string()),
                url: Some("https://stark.com/jobs".to_string()),
                ..Default::default()
            },
        ),
    ];

    seeds
        .into_iter()
        .map(|(id, new)| new.into_application(id.to_string()))
        .collect()
}
