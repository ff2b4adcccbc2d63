//! Option declarations and the schema built from them.

use serde::Deserialize;
use tracing::warn;

use super::check::Check;
use crate::error::{Error, Result};

/// Names the configure command itself owns. Declaring one is fatal.
pub const RESERVED_NAMES: &[&str] = &[
    "help",
    "version",
    "verbose",
    "description",
    "user_options",
    "boolean_options",
];

/// Long flags the command line already uses.
pub const RESERVED_LONG_FLAGS: &[&str] = &["help", "version", "verbose"];

/// Short flags the command line already uses.
pub const RESERVED_SHORT_FLAGS: &[char] = &['h', 'v'];

/// Build types accepted by the built-in `build_type` option.
pub const BUILD_TYPES: &[&str] = &["DEVEL", "DEBUG", "RELEASE", "RELWITHDEBINFO", "MINSIZEREL"];

/// Default for the built-in `build_type` option.
pub const DEFAULT_BUILD_TYPE: &str = "DEVEL";

/// Scalar default as written in the project descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl DefaultValue {
    fn into_string(self) -> String {
        match self {
            DefaultValue::Text(s) => s,
            DefaultValue::Number(n) => n.to_string(),
            DefaultValue::Bool(b) => bool_string(b).to_string(),
        }
    }
}

/// One option as the user declares it. Missing fields get defaults in
/// [`OptionSchema::build`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionDecl {
    pub name: String,
    #[serde(default)]
    pub short: Option<char>,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub boolean: bool,
    #[serde(default)]
    pub default: Option<DefaultValue>,
    #[serde(default, alias = "cmake")]
    pub external_key: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub path: bool,
    #[serde(default)]
    pub check: Option<Check>,
}

impl OptionDecl {
    pub fn new(name: &str, external_key: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            help: None,
            boolean: false,
            default: None,
            external_key: Some(external_key.to_string()),
            flag: None,
            path: false,
            check: None,
        }
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn boolean(mut self) -> Self {
        self.boolean = true;
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(DefaultValue::Text(value.to_string()));
        self
    }

    pub fn path(mut self) -> Self {
        self.path = true;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.check = Some(check);
        self
    }

    pub fn flag(mut self, flag: &str) -> Self {
        self.flag = Some(flag.to_string());
        self
    }
}

/// A fully normalized option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub name: String,
    pub short: Option<char>,
    pub help: String,
    pub is_boolean: bool,
    /// Always `None` for boolean options; they start out false.
    pub default: Option<String>,
    pub external_key: String,
    /// Command-line flag: `<name>=` for value options, `<name>` for flags.
    pub flag: String,
    /// Value is a path, made absolute during finalize.
    pub path: bool,
    pub check: Option<Check>,
}

impl OptionSpec {
    /// Long command-line flag, without the value marker.
    pub fn long_flag(&self) -> String {
        self.flag.trim_end_matches('=').replace('_', "-")
    }

    pub fn takes_value(&self) -> bool {
        !self.is_boolean
    }
}

/// Ordered option schema: user declarations followed by the built-ins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSchema {
    options: Vec<OptionSpec>,
}

impl OptionSchema {
    /// Build the schema from user declarations.
    pub fn build(decls: &[OptionDecl]) -> Result<Self> {
        let builtins = builtin_options();
        let mut options: Vec<OptionSpec> = Vec::with_capacity(decls.len() + builtins.len());

        for decl in decls {
            if is_private(&decl.name) {
                continue;
            }
            if RESERVED_NAMES.contains(&decl.name.as_str()) {
                return Err(Error::declaration(&decl.name, "name is reserved"));
            }
            if builtins.iter().any(|b| b.name == decl.name) {
                warn!(option = %decl.name, "option shadows a built-in option, keeping the built-in");
                continue;
            }
            if options.iter().any(|o| o.name == decl.name) {
                return Err(Error::declaration(&decl.name, "declared more than once"));
            }
            let spec = normalize(decl)?;
            check_unique(&spec, options.iter().chain(builtins.iter()))?;
            options.push(spec);
        }

        options.extend(builtins);

        let mut seen = Vec::new();
        for option in &options {
            if let Some(short) = option.short {
                if RESERVED_SHORT_FLAGS.contains(&short) || seen.contains(&short) {
                    return Err(Error::declaration(
                        &option.name,
                        format!("short flag '-{}' is already taken", short),
                    ));
                }
                seen.push(short);
            }
        }

        Ok(Self { options })
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// External tool spelling of a boolean.
pub fn bool_string(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

// Two options must never share a command-line flag or an external key.
// `earlier` holds every option already accepted plus the built-ins.
fn check_unique<'a>(
    spec: &OptionSpec,
    earlier: impl Iterator<Item = &'a OptionSpec>,
) -> Result<()> {
    let long = spec.long_flag();
    if RESERVED_LONG_FLAGS.contains(&long.as_str()) {
        return Err(Error::declaration(
            &spec.name,
            format!("flag '--{}' is reserved", long),
        ));
    }
    for other in earlier {
        if other.long_flag() == long {
            return Err(Error::declaration(
                &spec.name,
                format!("flag '--{}' is already used by '{}'", long, other.name),
            ));
        }
        if other.external_key == spec.external_key {
            return Err(Error::declaration(
                &spec.name,
                format!(
                    "external key '{}' is already used by '{}'",
                    spec.external_key, other.name
                ),
            ));
        }
    }
    Ok(())
}

// `_name_` style attributes are never options.
fn is_private(name: &str) -> bool {
    name.len() > 1 && name.starts_with('_') && name.ends_with('_')
}

fn normalize(decl: &OptionDecl) -> Result<OptionSpec> {
    if decl.name.is_empty()
        || !decl
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::declaration(
            &decl.name,
            "name must be non-empty and use only letters, digits, '_' or '-'",
        ));
    }

    let external_key = match decl.external_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => return Err(Error::declaration(&decl.name, "missing external key")),
    };

    let flag = decl.flag.clone().unwrap_or_else(|| {
        if decl.boolean {
            decl.name.clone()
        } else {
            format!("{}=", decl.name)
        }
    });

    let default = if decl.boolean {
        None
    } else {
        decl.default.clone().map(DefaultValue::into_string)
    };

    Ok(OptionSpec {
        name: decl.name.clone(),
        short: decl.short,
        help: decl.help.clone().unwrap_or_default(),
        is_boolean: decl.boolean,
        default,
        external_key,
        flag,
        path: decl.path,
        check: decl.check.clone(),
    })
}

fn builtin_options() -> Vec<OptionSpec> {
    vec![
        OptionSpec {
            name: "compiler".to_string(),
            short: None,
            help: "C++ compiler".to_string(),
            is_boolean: false,
            default: None,
            external_key: "CMAKE_CXX_COMPILER".to_string(),
            flag: "compiler=".to_string(),
            path: false,
            check: Some(Check::Executable),
        },
        OptionSpec {
            name: "build_type".to_string(),
            short: None,
            help: format!("CMake build type, one of {}", BUILD_TYPES.join(", ")),
            is_boolean: false,
            default: Some(DEFAULT_BUILD_TYPE.to_string()),
            external_key: "CMAKE_BUILD_TYPE".to_string(),
            flag: "build_type=".to_string(),
            path: false,
            check: Some(Check::OneOf(
                BUILD_TYPES.iter().map(|s| s.to_string()).collect(),
            )),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_always_present() {
        let schema = OptionSchema::build(&[]).unwrap();
        assert_eq!(schema.len(), 2);
        let build_type = schema.get("build_type").unwrap();
        assert_eq!(build_type.external_key, "CMAKE_BUILD_TYPE");
        assert_eq!(build_type.default.as_deref(), Some("DEVEL"));
        assert_eq!(
            schema.get("compiler").unwrap().external_key,
            "CMAKE_CXX_COMPILER"
        );
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let schema = OptionSchema::build(&[OptionDecl::new("catch", "CATCH_INCLUDE")]).unwrap();
        let catch = schema.get("catch").unwrap();
        assert_eq!(catch.short, None);
        assert_eq!(catch.help, "");
        assert!(!catch.is_boolean);
        assert_eq!(catch.default, None);
        assert_eq!(catch.check, None);
        assert_eq!(catch.flag, "catch=");
    }

    #[test]
    fn test_boolean_flag_has_no_value_marker() {
        let schema =
            OptionSchema::build(&[OptionDecl::new("with_tests", "BUILD_TESTS").boolean()])
                .unwrap();
        let spec = schema.get("with_tests").unwrap();
        assert_eq!(spec.flag, "with_tests");
        assert_eq!(spec.long_flag(), "with-tests");
        assert!(!spec.takes_value());
    }

    #[test]
    fn test_boolean_default_is_dropped() {
        let schema = OptionSchema::build(&[OptionDecl::new("lto", "ENABLE_LTO")
            .boolean()
            .default_value("TRUE")])
        .unwrap();
        assert_eq!(schema.get("lto").unwrap().default, None);
    }

    #[test]
    fn test_missing_external_key_names_option() {
        let mut decl = OptionDecl::new("catch", "X");
        decl.external_key = None;
        let err = OptionSchema::build(&[decl]).unwrap_err();
        match err {
            Error::SchemaDeclaration { option, reason } => {
                assert_eq!(option, "catch");
                assert!(reason.contains("external key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_external_key_rejected() {
        let err = OptionSchema::build(&[OptionDecl::new("catch", "  ")]).unwrap_err();
        assert!(matches!(err, Error::SchemaDeclaration { .. }));
    }

    #[test]
    fn test_reserved_name_rejected() {
        let err = OptionSchema::build(&[OptionDecl::new("description", "DESC")]).unwrap_err();
        assert!(matches!(err, Error::SchemaDeclaration { ref option, .. } if option == "description"));
    }

    #[test]
    fn test_builtin_wins_on_collision() {
        let schema = OptionSchema::build(&[OptionDecl::new("build_type", "MY_BUILD_TYPE")
            .default_value("RELEASE")])
        .unwrap();
        let spec = schema.get("build_type").unwrap();
        assert_eq!(spec.external_key, "CMAKE_BUILD_TYPE");
        assert_eq!(spec.default.as_deref(), Some("DEVEL"));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_private_names_skipped() {
        let schema = OptionSchema::build(&[OptionDecl::new("__doc__", "DOC")]).unwrap();
        assert!(schema.get("__doc__").is_none());
    }

    #[test]
    fn test_duplicate_short_flag_rejected() {
        let err = OptionSchema::build(&[
            OptionDecl::new("catch", "CATCH_INCLUDE").short('c'),
            OptionDecl::new("cuda", "USE_CUDA").boolean().short('c'),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::SchemaDeclaration { ref option, .. } if option == "cuda"));
    }

    #[test]
    fn test_help_short_flag_reserved() {
        let err = OptionSchema::build(&[OptionDecl::new("home", "HOME_DIR").short('h')])
            .unwrap_err();
        assert!(matches!(err, Error::SchemaDeclaration { .. }));
    }

    #[test]
    fn test_flag_spellings_collide() {
        let err = OptionSchema::build(&[
            OptionDecl::new("foo_bar", "FOO_BAR"),
            OptionDecl::new("foo-bar", "FOO_BAR_2"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::SchemaDeclaration { ref option, .. } if option == "foo-bar"));
    }

    #[test]
    fn test_explicit_flag_cannot_take_help() {
        let err = OptionSchema::build(&[OptionDecl::new("assist", "ASSIST").boolean().flag("help")])
            .unwrap_err();
        assert!(matches!(err, Error::SchemaDeclaration { ref option, .. } if option == "assist"));
    }

    #[test]
    fn test_explicit_flag_cannot_take_builtin_flag() {
        let err = OptionSchema::build(&[OptionDecl::new("kind", "KIND").flag("build_type=")])
            .unwrap_err();
        assert!(matches!(err, Error::SchemaDeclaration { ref option, .. } if option == "kind"));
    }

    #[test]
    fn test_external_key_shared_with_builtin_rejected() {
        let err = OptionSchema::build(&[OptionDecl::new("mode", "CMAKE_BUILD_TYPE")]).unwrap_err();
        assert!(matches!(err, Error::SchemaDeclaration { ref option, .. } if option == "mode"));
    }

    #[test]
    fn test_external_key_shared_between_user_options_rejected() {
        let err = OptionSchema::build(&[
            OptionDecl::new("catch", "TEST_INCLUDE"),
            OptionDecl::new("gtest", "TEST_INCLUDE"),
        ])
        .unwrap_err();
        match err {
            Error::SchemaDeclaration { option, reason } => {
                assert_eq!(option, "gtest");
                assert!(reason.contains("TEST_INCLUDE"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_user_options_come_first() {
        let schema = OptionSchema::build(&[
            OptionDecl::new("zeta", "ZETA"),
            OptionDecl::new("alpha", "ALPHA"),
        ])
        .unwrap();
        let names: Vec<_> = schema.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "compiler", "build_type"]);
    }

    #[test]
    fn test_decl_from_json() {
        let decl: OptionDecl = serde_json::from_str(
            r#"{"name": "catch", "help": "path to catch", "cmake": "CATCH_INCLUDE", "check": "directory"}"#,
        )
        .unwrap();
        assert_eq!(decl.external_key.as_deref(), Some("CATCH_INCLUDE"));
        assert_eq!(decl.check, Some(Check::Directory));

        let numeric: OptionDecl =
            serde_json::from_str(r#"{"name": "jobs", "external_key": "JOBS", "default": 4}"#)
                .unwrap();
        let schema = OptionSchema::build(&[numeric]).unwrap();
        assert_eq!(schema.get("jobs").unwrap().default.as_deref(), Some("4"));
    }
}
