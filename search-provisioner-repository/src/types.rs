//! Request and response types for management API operations.

/// Outcome of a delete request.
///
/// A delete of a resource that does not exist is reported as `NotFound` rather
/// than as an error, so teardown can be repeated safely. Any other rejection is
/// still raised as `ManagementError::ApiRejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The resource existed and was removed.
    Deleted,
    /// The resource was already absent.
    NotFound,
}

impl DeleteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "deleted",
            DeleteOutcome::NotFound => "not found",
        }
    }
}

impl std::fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Values substituted into a skillset template.
///
/// The enrichment account and key belong to the cognitive services resource
/// billed for built-in skills; the custom skill URI and key point at the
/// custom enrichment endpoint.
#[derive(Clone)]
pub struct SkillsetParameters {
    pub cognitive_services_account: String,
    pub cognitive_services_key: String,
    pub custom_skill_uri: String,
    pub custom_skill_api_key: String,
}

impl std::fmt::Debug for SkillsetParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillsetParameters")
            .field("cognitive_services_account", &self.cognitive_services_account)
            .field("cognitive_services_key", &"<redacted>")
            .field("custom_skill_uri", &self.custom_skill_uri)
            .field("custom_skill_api_key", &"<redacted>")
            .finish()
    }
}
