//! Configure command - resolves options and writes the Configuration Store.

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches};

use crate::config::Config;
use crate::configure::ConfigureCommand;
use crate::options::OptionSchema;
use crate::store::ConfigurationStore;

/// One command-line flag per option in `schema`.
pub fn option_args(schema: &OptionSchema) -> Vec<Arg> {
    schema
        .iter()
        .map(|spec| {
            let help = match &spec.default {
                Some(default) if !spec.help.is_empty() => {
                    format!("{} [default: {}]", spec.help, default)
                }
                Some(default) => format!("[default: {}]", default),
                None => spec.help.clone(),
            };

            let mut arg = Arg::new(spec.name.clone())
                .long(spec.long_flag())
                .help(help);
            if let Some(short) = spec.short {
                arg = arg.short(short);
            }
            if spec.is_boolean {
                arg.action(ArgAction::SetTrue)
            } else {
                arg.action(ArgAction::Set).value_name("VALUE")
            }
        })
        .collect()
}

/// Execute the configure command with values parsed from `matches`.
pub fn cmd_configure(config: &Config, schema: &OptionSchema, matches: &ArgMatches) -> Result<()> {
    let store = ConfigurationStore::new(&config.config_file);
    let mut command = ConfigureCommand::new(schema, store).initialize();

    for spec in schema.iter() {
        if spec.is_boolean {
            if matches.get_flag(&spec.name) {
                command.set_flag(&spec.name)?;
            }
        } else if let Some(value) = matches.get_one::<String>(&spec.name) {
            command.set(&spec.name, value.as_str())?;
        }
    }

    let resolved = command.finalize()?.run()?;
    println!(
        "\nWrote {} ({} entries)",
        config.config_file.display(),
        resolved.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionDecl;
    use clap::Command;

    fn schema() -> OptionSchema {
        OptionSchema::build(&[
            OptionDecl::new("catch", "CATCH_INCLUDE")
                .help("path to catch")
                .short('c'),
            OptionDecl::new("openmp", "USE_OPENMP").boolean(),
        ])
        .unwrap()
    }

    fn command(schema: &OptionSchema) -> Command {
        Command::new("configure").args(option_args(schema))
    }

    #[test]
    fn test_flags_generated_from_schema() {
        let schema = schema();
        let matches = command(&schema)
            .try_get_matches_from([
                "configure",
                "-c",
                "/usr/include/catch",
                "--openmp",
                "--build-type",
                "RELEASE",
            ])
            .unwrap();

        assert_eq!(
            matches.get_one::<String>("catch").map(String::as_str),
            Some("/usr/include/catch")
        );
        assert!(matches.get_flag("openmp"));
        assert_eq!(
            matches.get_one::<String>("build_type").map(String::as_str),
            Some("RELEASE")
        );
        assert!(matches.get_one::<String>("compiler").is_none());
    }

    #[test]
    fn test_boolean_flag_takes_no_value() {
        let schema = schema();
        let result = command(&schema).try_get_matches_from(["configure", "--openmp=yes"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_mentions_default() {
        let schema = schema();
        let args = option_args(&schema);
        let build_type = args
            .iter()
            .find(|a| a.get_id().as_str() == "build_type")
            .unwrap();
        let help = build_type.get_help().unwrap().to_string();
        assert!(help.contains("[default: DEVEL]"));
    }

    #[test]
    fn test_cmd_configure_writes_store() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::new(tmp.path());
        let schema = schema();
        let matches = command(&schema)
            .try_get_matches_from(["configure", "--openmp"])
            .unwrap();

        cmd_configure(&config, &schema, &matches).unwrap();

        let stored = ConfigurationStore::new(&config.config_file).load().unwrap();
        assert_eq!(stored.get("USE_OPENMP"), Some("TRUE"));
        assert_eq!(stored.get("CMAKE_BUILD_TYPE"), Some("DEVEL"));
        assert_eq!(stored.get("CATCH_INCLUDE"), None);
    }
}
