use crate::model::PolicyDocument;
use repo_policy_types::{JobType, Property};
use std::fmt;

/// Built-in policy documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolicyPreset {
    /// Every property of every job type enabled.
    All,
    /// [`PolicyPreset::All`] with `pull_request.disallow_fork` disabled.
    AllowFork,
}

impl PolicyPreset {
    pub const ALL: [PolicyPreset; 2] = [PolicyPreset::All, PolicyPreset::AllowFork];

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyPreset::All => "all",
            PolicyPreset::AllowFork => "allow-fork",
        }
    }

    pub fn parse(s: &str) -> Option<PolicyPreset> {
        match s {
            "all" => Some(PolicyPreset::All),
            "allow-fork" | "allow_fork" => Some(PolicyPreset::AllowFork),
            _ => None,
        }
    }

    pub fn document(self) -> PolicyDocument {
        let mut doc = PolicyDocument::uniform(true);
        if self == PolicyPreset::AllowFork {
            doc.set(JobType::PullRequest, Property::DisallowFork, false);
        }
        doc
    }

    /// Preset applied when a job comes without a policy document.
    ///
    /// Pull requests allow forks unless `disallow_forks` is set; other job types use `All`.
    pub fn default_for(job_type: JobType, disallow_forks: bool) -> PolicyPreset {
        match job_type {
            JobType::PullRequest if !disallow_forks => PolicyPreset::AllowFork,
            _ => PolicyPreset::All,
        }
    }

    /// Label recorded in reports.
    pub fn label(self) -> String {
        format!("default:{}", self.as_str())
    }
}

impl fmt::Display for PolicyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_enables_every_property() {
        let doc = PolicyPreset::All.document();
        for job_type in JobType::ALL {
            for property in job_type.properties() {
                assert_eq!(doc.get(job_type, *property), Some(true));
            }
        }
    }

    #[test]
    fn allow_fork_differs_from_all_only_in_disallow_fork() {
        let mut all = PolicyPreset::All.document();
        let allow_fork = PolicyPreset::AllowFork.document();
        assert_eq!(
            allow_fork.get(JobType::PullRequest, Property::DisallowFork),
            Some(false)
        );

        all.set(JobType::PullRequest, Property::DisallowFork, false);
        assert_eq!(all, allow_fork);
    }

    #[test]
    fn defaults_per_job_type() {
        assert_eq!(
            PolicyPreset::default_for(JobType::PullRequest, false),
            PolicyPreset::AllowFork
        );
        assert_eq!(
            PolicyPreset::default_for(JobType::PullRequest, true),
            PolicyPreset::All
        );
        assert_eq!(
            PolicyPreset::default_for(JobType::Push, false),
            PolicyPreset::All
        );
    }

    #[test]
    fn names_round_trip() {
        for preset in PolicyPreset::ALL {
            assert_eq!(PolicyPreset::parse(preset.as_str()), Some(preset));
        }
        assert_eq!(PolicyPreset::parse("strict"), None);
    }
}
