//! The configure command.
//!
//! A [`ConfigureCommand`] moves through `Uninitialized -> DefaultsApplied ->
//! Validated` and is consumed by [`ConfigureCommand::run`], which persists
//! the resolved mapping. The state is a type parameter, so `run` cannot be
//! called before `finalize` succeeded.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::options::{bool_string, OptionSchema, OptionSpec};
use crate::store::{ConfigurationStore, ResolvedConfiguration};

/// Fresh command, no values yet.
pub struct Uninitialized;
/// Every option holds its default and may be overridden.
pub struct DefaultsApplied;
/// Values are normalized and passed their checks.
pub struct Validated;

pub struct ConfigureCommand<'a, S> {
    schema: &'a OptionSchema,
    store: ConfigurationStore,
    values: BTreeMap<String, Option<String>>,
    _state: PhantomData<S>,
}

impl<'a> ConfigureCommand<'a, Uninitialized> {
    pub fn new(schema: &'a OptionSchema, store: ConfigurationStore) -> Self {
        Self {
            schema,
            store,
            values: BTreeMap::new(),
            _state: PhantomData,
        }
    }

    /// Set every option to its default. Boolean options start out false.
    pub fn initialize(self) -> ConfigureCommand<'a, DefaultsApplied> {
        let values = self
            .schema
            .iter()
            .map(|spec| {
                let value = if spec.is_boolean {
                    Some(bool_string(false).to_string())
                } else {
                    spec.default.clone()
                };
                (spec.name.clone(), value)
            })
            .collect();

        ConfigureCommand {
            schema: self.schema,
            store: self.store,
            values,
            _state: PhantomData,
        }
    }
}

impl<'a> ConfigureCommand<'a, DefaultsApplied> {
    /// Override the value of option `name`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| Error::UnknownOption(name.to_string()))?;
        *slot = Some(value.into());
        Ok(())
    }

    /// Switch a boolean option on.
    pub fn set_flag(&mut self, name: &str) -> Result<()> {
        match self.schema.get(name) {
            Some(spec) if spec.is_boolean => self.set(name, bool_string(true)),
            Some(_) => Err(Error::OptionValidation {
                option: name.to_string(),
                value: "<flag without value>".to_string(),
            }),
            None => Err(Error::UnknownOption(name.to_string())),
        }
    }

    /// Normalize and check every option.
    ///
    /// Booleans become `TRUE`/`FALSE`, path options become absolute, then
    /// each non-null value is run through its check.
    pub fn finalize(mut self) -> Result<ConfigureCommand<'a, Validated>> {
        let cwd = std::env::current_dir()?;
        let schema = self.schema;

        for spec in schema.iter() {
            let slot = self.values.entry(spec.name.clone()).or_insert(None);

            if spec.is_boolean {
                let on = slot.as_deref().is_some_and(is_truthy);
                *slot = Some(bool_string(on).to_string());
            } else if spec.path {
                if let Some(value) = slot.as_mut() {
                    let path = Path::new(value.as_str());
                    if path.is_relative() {
                        *value = cwd.join(path).to_string_lossy().into_owned();
                    }
                }
            }

            check_value(spec, slot.as_deref())?;
        }

        Ok(ConfigureCommand {
            schema,
            store: self.store,
            values: self.values,
            _state: PhantomData,
        })
    }
}

impl<'a> ConfigureCommand<'a, Validated> {
    /// Resolved value of option `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_deref())
    }

    /// External-key view of the resolved values.
    pub fn resolved(&self) -> ResolvedConfiguration {
        self.schema
            .iter()
            .map(|spec| {
                let value = self.values.get(&spec.name).cloned().flatten();
                (spec.external_key.clone(), value)
            })
            .collect()
    }

    /// Print the resolved values and persist them to the store.
    pub fn run(self) -> Result<ResolvedConfiguration> {
        println!("Configuration:");
        for spec in self.schema.iter() {
            match self.value(&spec.name) {
                Some(value) => println!("  {} = {}", spec.name, value),
                None => println!("  {} = (unset)", spec.name),
            }
        }

        let resolved = self.resolved();
        self.store.save(&resolved)?;
        info!(path = %self.store.path().display(), "configuration saved");
        Ok(resolved)
    }
}

/// Boolean spellings accepted on input.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn check_value(spec: &OptionSpec, value: Option<&str>) -> Result<()> {
    let (Some(check), Some(value)) = (&spec.check, value) else {
        return Ok(());
    };
    debug!(option = %spec.name, value, ?check, "checking option");
    check.verify(&spec.name, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Check, OptionDecl};

    fn schema() -> OptionSchema {
        OptionSchema::build(&[
            OptionDecl::new("catch", "CATCH_INCLUDE")
                .help("path to catch")
                .check(Check::Directory),
            OptionDecl::new("openmp", "USE_OPENMP").boolean(),
        ])
        .unwrap()
    }

    fn store(dir: &Path) -> ConfigurationStore {
        ConfigurationStore::new(dir.join("build/configure.out.json"))
    }

    #[test]
    fn test_defaults_applied() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();
        let cmd = ConfigureCommand::new(&schema, store(dir.path()))
            .initialize()
            .finalize()
            .unwrap();

        assert_eq!(cmd.value("catch"), None);
        assert_eq!(cmd.value("openmp"), Some("FALSE"));
        assert_eq!(cmd.value("build_type"), Some("DEVEL"));
        assert_eq!(cmd.value("compiler"), None);
    }

    #[test]
    fn test_boolean_coerced_to_uppercase() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();

        let mut cmd = ConfigureCommand::new(&schema, store(dir.path())).initialize();
        cmd.set("openmp", "yes").unwrap();
        assert_eq!(cmd.finalize().unwrap().value("openmp"), Some("TRUE"));

        let mut cmd = ConfigureCommand::new(&schema, store(dir.path())).initialize();
        cmd.set_flag("openmp").unwrap();
        assert_eq!(cmd.finalize().unwrap().value("openmp"), Some("TRUE"));

        let mut cmd = ConfigureCommand::new(&schema, store(dir.path())).initialize();
        cmd.set("openmp", "nope").unwrap();
        assert_eq!(cmd.finalize().unwrap().value("openmp"), Some("FALSE"));
    }

    #[test]
    fn test_validation_failure_names_option_and_value() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();
        let mut cmd = ConfigureCommand::new(&schema, store(dir.path())).initialize();
        cmd.set("catch", "/nonexistent_path_12345").unwrap();

        match cmd.finalize() {
            Err(Error::OptionValidation { option, value }) => {
                assert_eq!(option, "catch");
                assert_eq!(value, "/nonexistent_path_12345");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("finalize accepted a missing directory"),
        }
    }

    #[test]
    fn test_bad_build_type_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();
        let mut cmd = ConfigureCommand::new(&schema, store(dir.path())).initialize();
        cmd.set("build_type", "FAST").unwrap();
        assert!(matches!(
            cmd.finalize(),
            Err(Error::OptionValidation { .. })
        ));
    }

    #[test]
    fn test_unknown_option() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();
        let mut cmd = ConfigureCommand::new(&schema, store(dir.path())).initialize();
        assert!(matches!(
            cmd.set("nope", "x"),
            Err(Error::UnknownOption(_))
        ));
        assert!(matches!(cmd.set_flag("catch"), Err(Error::OptionValidation { .. })));
    }

    #[test]
    fn test_run_persists_external_keys() {
        let dir = tempfile::tempdir().unwrap();
        let catch = dir.path().join("catch");
        std::fs::create_dir(&catch).unwrap();
        let schema = schema();

        let mut cmd = ConfigureCommand::new(&schema, store(dir.path())).initialize();
        cmd.set("catch", catch.to_str().unwrap()).unwrap();
        let resolved = cmd.finalize().unwrap().run().unwrap();

        let loaded = store(dir.path()).load().unwrap();
        assert_eq!(loaded, resolved);
        assert_eq!(loaded.get("CATCH_INCLUDE"), catch.to_str());
        assert_eq!(loaded.get("CMAKE_BUILD_TYPE"), Some("DEVEL"));
        assert_eq!(loaded.get("USE_OPENMP"), Some("FALSE"));
        assert!(loaded.contains_key("CMAKE_CXX_COMPILER"));
    }

    #[test]
    fn test_path_option_made_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let schema =
            OptionSchema::build(&[OptionDecl::new("prefix", "INSTALL_PREFIX").path()]).unwrap();
        let mut cmd = ConfigureCommand::new(&schema, store(dir.path())).initialize();
        cmd.set("prefix", "relative/dir").unwrap();
        let cmd = cmd.finalize().unwrap();
        assert!(Path::new(cmd.value("prefix").unwrap()).is_absolute());
    }

    #[test]
    fn test_truthy_spellings() {
        for v in ["1", "true", "TRUE", "Yes", " on "] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["0", "false", "off", "", "maybe"] {
            assert!(!is_truthy(v), "{v}");
        }
    }
}
