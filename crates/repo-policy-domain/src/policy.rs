use repo_policy_types::{JobType, Property};

/// Whether a property the policy document does not mention is enabled.
pub const ENABLED_IF_ABSENT: bool = true;

/// State of one `(JobType, Property)` cell after resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Toggle {
    Enabled,
    Disabled,
    /// The document did not mention this property (or its job type).
    #[default]
    Unspecified,
}

impl Toggle {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Toggle::Enabled
        } else {
            Toggle::Disabled
        }
    }
}

/// Resolved policy: a fixed-size table indexed by job type and property.
///
/// Built once from a validated document; orchestrators only read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectivePolicy {
    /// Label for reports: `default:<preset>` or `custom`.
    pub name: String,
    toggles: [[Toggle; Property::ALL.len()]; JobType::ALL.len()],
    absent_default: bool,
}

impl EffectivePolicy {
    /// A policy that mentions nothing; every lookup falls back to the absent default.
    pub fn unspecified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            toggles: [[Toggle::Unspecified; Property::ALL.len()]; JobType::ALL.len()],
            absent_default: ENABLED_IF_ABSENT,
        }
    }

    pub fn with_absent_default(mut self, enabled: bool) -> Self {
        self.absent_default = enabled;
        self
    }

    pub fn set(&mut self, job_type: JobType, property: Property, toggle: Toggle) {
        self.toggles[job_type.index()][property.index()] = toggle;
    }

    pub fn toggle(&self, job_type: JobType, property: Property) -> Toggle {
        self.toggles[job_type.index()][property.index()]
    }

    pub fn enabled(&self, job_type: JobType, property: Property) -> bool {
        match self.toggle(job_type, property) {
            Toggle::Enabled => true,
            Toggle::Disabled => false,
            Toggle::Unspecified => self.absent_default,
        }
    }

    /// Properties of `job_type` that will run, in evaluation order.
    pub fn enabled_properties(&self, job_type: JobType) -> impl Iterator<Item = Property> + '_ {
        job_type
            .properties()
            .iter()
            .copied()
            .filter(move |property| self.enabled(job_type, *property))
    }

    /// Disable every property of every job type.
    pub fn all_disabled(name: impl Into<String>) -> Self {
        let mut policy = Self::unspecified(name);
        for job_type in JobType::ALL {
            for property in job_type.properties() {
                policy.set(job_type, *property, Toggle::Disabled);
            }
        }
        policy
    }
}
