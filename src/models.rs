use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stage of an application within the fixed pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    #[serde(rename = "Phone Screen")]
    PhoneScreen,
    #[serde(rename = "Technical Interview")]
    TechnicalInterview,
    #[serde(rename = "Onsite Interview")]
    OnsiteInterview,
    Offer,
    Rejected,
    Accepted,
    Declined,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Applied,
        ApplicationStatus::PhoneScreen,
        ApplicationStatus::TechnicalInterview,
        ApplicationStatus::OnsiteInterview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
        ApplicationStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::PhoneScreen => "Phone Screen",
            ApplicationStatus::TechnicalInterview => "Technical Interview",
            ApplicationStatus::OnsiteInterview => "Onsite Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Declined => "Declined",
        }
    }

    /// The three interview stages, between the initial application and an offer.
    pub fn is_interview_stage(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::PhoneScreen
                | ApplicationStatus::TechnicalInterview
                | ApplicationStatus::OnsiteInterview
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| anyhow!("Unknown status '{}'. Valid statuses: {}", s, status_names()))
    }
}

fn status_names() -> String {
    ApplicationStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One tracked job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    /// ISO date, yyyy-MM-dd.
    pub date_applied: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Input for creating an application. The store assigns the id.
#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub company: String,
    pub position: String,
    pub status: Option<ApplicationStatus>,
    pub date_applied: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
}

impl NewApplication {
    pub fn into_application(self, id: String) -> Application {
        let date_applied = self
            .date_applied
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
        Application {
            id,
            company: self.company,
            position: self.position,
            status: self.status.unwrap_or(ApplicationStatus::Applied),
            date_applied,
            location: self.location,
            job_type: self.job_type,
            salary: self.salary,
            description: self.description,
            url: self.url,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            notes: self.notes,
        }
    }
}

/// Partial update for an application. `None` fields keep their prior value;
/// the id is never touched.
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub date_applied: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.position.is_none()
            && self.status.is_none()
            && self.date_applied.is_none()
            && self.location.is_none()
            && self.job_type.is_none()
            && self.salary.is_none()
            && self.description.is_none()
            && self.url.is_none()
            && self.contact_name.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
            && self.notes.is_none()
    }

    pub fn apply(&self, app: &mut Application) {
        if let Some(company) = &self.company {
            app.company = company.clone();
        }
        if let Some(position) = &self.position {
            app.position = position.clone();
        }
        if let Some(status) = self.status {
            app.status = status;
        }
        if let Some(date_applied) = &self.date_applied {
            app.date_applied = date_applied.clone();
        }
        if let Some(location) = &self.location {
            app.location = Some(location.clone());
        }
        if let Some(job_type) = &self.job_type {
            app.job_type = Some(job_type.clone());
        }
        if let Some(salary) = &self.salary {
            app.salary = Some(salary.clone());
        }
        if let Some(description) = &self.description {
            app.description = Some(description.clone());
        }
        if let Some(url) = &self.url {
            app.url = Some(url.clone());
        }
        if let Some(contact_name) = &self.contact_name {
            app.contact_name = Some(contact_name.clone());
        }
        if let Some(contact_email) = &self.contact_email {
            app.contact_email = Some(contact_email.clone());
        }
        if let Some(contact_phone) = &self.contact_phone {
            app.contact_phone = Some(contact_phone.clone());
        }
        if let Some(notes) = &self.notes {
            app.notes = Some(notes.clone());
        }
    }
}

/// Kind of timeline event. The fixed set matches the stages an application
/// can move through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Applied,
    #[serde(rename = "Phone Screen")]
    PhoneScreen,
    #[serde(rename = "Technical Interview")]
    TechnicalInterview,
    #[serde(rename = "Onsite Interview")]
    OnsiteInterview,
    Offer,
    Rejected,
    Accepted,
    Declined,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Applied,
        EventType::PhoneScreen,
        EventType::TechnicalInterview,
        EventType::OnsiteInterview,
        EventType::Offer,
        EventType::Rejected,
        EventType::Accepted,
        EventType::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Applied => "Applied",
            EventType::PhoneScreen => "Phone Screen",
            EventType::TechnicalInterview => "Technical Interview",
            EventType::OnsiteInterview => "Onsite Interview",
            EventType::Offer => "Offer",
            EventType::Rejected => "Rejected",
            EventType::Accepted => "Accepted",
            EventType::Declined => "Declined",
        }
    }

    pub fn is_interview(&self) -> bool {
        matches!(
            self,
            EventType::PhoneScreen | EventType::TechnicalInterview | EventType::OnsiteInterview
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                let names = Self::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow!("Unknown event type '{}'. Valid types: {}", s, names)
            })
    }
}

/// Dated milestone attached to one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub application_id: String,
    /// ISO date, yyyy-MM-dd.
    pub date: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Free-form note attached to one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub application_id: String,
    /// Creation date, yyyy-MM-dd.
    pub date: String,
    pub title: String,
    pub content: String,
}

/// User profile, persisted under its own key. Thin support only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}
