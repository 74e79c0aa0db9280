use crate::error::{Result, VitaeError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSection {
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmploymentSection {
    pub employer: String,
    #[serde(default)]
    pub role: Option<String>,
    pub since: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevelopmentSection {
    pub os: String,
    pub editor: String,
    #[serde(default)]
    pub shell: Option<String>,
    /// Start of the aggregation window: the date the user began committing.
    pub coding_since: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationSection {
    /// GitHub login the statistics are aggregated for.
    pub login: String,
    /// Repository (in the user's own namespace) holding the profile document.
    pub repository: String,
    #[serde(default = "default_document_path")]
    pub document_path: String,
}

fn default_document_path() -> String {
    "README.md".to_string()
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub profile: ProfileSection,
    pub employment: EmploymentSection,
    pub development: DevelopmentSection,
    pub authentication: AuthenticationSection,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VitaeError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, today: NaiveDate) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.authentication.login.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "authentication.login is empty".to_string(),
            });
        }

        if self.authentication.repository.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "authentication.repository is empty".to_string(),
            });
        }

        if self.authentication.document_path.starts_with('/') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "authentication.document_path '{}' is absolute — contents paths are repository-relative",
                    self.authentication.document_path
                ),
            });
        }

        if self.profile.birth_date > today {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("profile.birth_date {} is in the future", self.profile.birth_date),
            });
        }

        // A future start merely yields an empty aggregation window, so this
        // is not fatal.
        if self.development.coding_since > today {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "development.coding_since {} is in the future — all aggregates will be zero",
                    self.development.coding_since
                ),
            });
        }

        if self.employment.since > today {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("employment.since {} is in the future", self.employment.since),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
profile:
  name: Jane Doe
  birth_date: 1990-04-12
  location: Berlin, Germany
employment:
  employer: ACME GmbH
  role: Systems Engineer
  since: 2018-09-01
development:
  os: Debian
  editor: Helix
  shell: zsh
  coding_since: 2010-06-01
authentication:
  login: janedoe
  repository: janedoe
"#
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn sample_config_parses() {
        let cfg: Config = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(cfg.profile.name, "Jane Doe");
        assert_eq!(cfg.employment.employer, "ACME GmbH");
        assert_eq!(cfg.development.editor, "Helix");
        assert_eq!(cfg.authentication.login, "janedoe");
    }

    #[test]
    fn document_path_defaults_to_readme() {
        let cfg: Config = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(cfg.authentication.document_path, "README.md");
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let yaml = r#"
profile:
  name: Jane Doe
  birth_date: 1990-04-12
employment:
  employer: ACME GmbH
  since: 2018-09-01
development:
  os: Debian
  editor: Helix
  coding_since: 2010-06-01
authentication:
  login: janedoe
  repository: janedoe
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.profile.location.is_none());
        assert!(cfg.employment.role.is_none());
        assert!(cfg.development.shell.is_none());
    }

    #[test]
    fn load_missing_file_is_config_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("vitae.yaml")).unwrap_err();
        assert!(matches!(err, VitaeError::ConfigNotFound(_)));
    }

    #[test]
    fn load_roundtrip_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("vitae.yaml");
        std::fs::write(&path, sample_yaml()).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.authentication.repository, "janedoe");
    }

    #[test]
    fn valid_config_no_warnings() {
        let cfg: Config = serde_yaml::from_str(sample_yaml()).unwrap();
        assert!(cfg.validate(today()).is_empty());
    }

    #[test]
    fn empty_login_is_error_level() {
        let mut cfg: Config = serde_yaml::from_str(sample_yaml()).unwrap();
        cfg.authentication.login = "  ".to_string();
        let warnings = cfg.validate(today());
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("login")));
    }

    #[test]
    fn future_birth_date_is_error_level() {
        let mut cfg: Config = serde_yaml::from_str(sample_yaml()).unwrap();
        cfg.profile.birth_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let warnings = cfg.validate(today());
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("birth_date")));
    }

    #[test]
    fn future_coding_since_is_warning_level() {
        let mut cfg: Config = serde_yaml::from_str(sample_yaml()).unwrap();
        cfg.development.coding_since = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let warnings = cfg.validate(today());
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Warning && w.message.contains("coding_since")));
    }

    #[test]
    fn absolute_document_path_is_warning_level() {
        let mut cfg: Config = serde_yaml::from_str(sample_yaml()).unwrap();
        cfg.authentication.document_path = "/README.md".to_string();
        let warnings = cfg.validate(today());
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Warning && w.message.contains("document_path")));
    }
}
