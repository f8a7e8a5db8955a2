use clap::Parser;
use std::path::Path;

use super::args::CliArgs;
use super::config::{load_config, parse_config, resolve_options};

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["irfit", "--ir", "build", "--source", "src"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("args should parse")
}

#[test]
fn parses_camel_case_keys() {
    let config = parse_config(
        r#"{
            "lossy": true,
            "verifyOrdering": false,
            "varargMethods": { "p.Log.log": [2, 3] }
        }"#,
    )
    .expect("config should parse");

    assert_eq!(config.lossy, Some(true));
    assert_eq!(config.verify_ordering, Some(false));
    assert_eq!(config.resolve_invocations, None);
    assert_eq!(config.vararg_methods["p.Log.log"], vec![2, 3]);
}

#[test]
fn rejects_unknown_keys() {
    let err = parse_config(r#"{ "lossyAllocations": true }"#).unwrap_err();
    assert!(format!("{err:#}").contains("lossyAllocations"));
}

#[test]
fn rejects_unqualified_vararg_method() {
    assert!(parse_config(r#"{ "varargMethods": { "log": [2] } }"#).is_err());
    assert!(parse_config(r#"{ "varargMethods": { "p.Log.log": [] } }"#).is_err());
}

#[test]
fn flags_override_config() {
    let config = parse_config(r#"{ "lossy": false, "verifyOrdering": true, "synthesizeTypes": true }"#)
        .expect("config should parse");

    let options = resolve_options(Some(&config), &args(&["--lossy", "--no-ordering-check"]));
    assert!(options.lossy);
    assert!(!options.verify_ordering);
    assert!(options.synthesize_types);
    assert!(!options.resolve_invocations);

    let defaults = resolve_options(None, &args(&[]));
    assert!(!defaults.lossy);
    assert!(defaults.verify_ordering);
    assert!(defaults.extra_vararg_methods.is_empty());
}

#[test]
fn vararg_methods_reach_options() {
    let config = parse_config(r#"{ "varargMethods": { "p.Log.log": [2] } }"#).unwrap();
    let options = resolve_options(Some(&config), &args(&[]));
    assert_eq!(options.extra_vararg_methods.get("p.Log.log"), Some(&vec![2]));
}

#[test]
fn facts_dir_is_relative_to_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("irfit.json");
    std::fs::write(&path, r#"{ "facts": "facts" }"#).unwrap();

    let config = load_config(&path).expect("config should load");
    assert_eq!(config.facts.as_deref(), Some(dir.path().join("facts").as_path()));
}

#[test]
fn missing_config_file_is_an_error() {
    let err = load_config(Path::new("/nonexistent/irfit.json")).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read config"));
}
