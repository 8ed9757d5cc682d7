// tests/config_loading.rs

mod common;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use watchpoints::config::{config_root_dir, load_and_validate, validate_config, ConfigFile};
use watchpoints::errors::WatchpointsError;
use watchpoints::types::MergePolicy;
use watchpoints_test_utils::builders::{
    ConfigFileBuilder, RequestConfigBuilder, TreeConfigBuilder,
};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn full_config_resolves_against_its_directory() {
    common::init_tracing();
    let file = write_config(
        r#"
[config]
merge_policy = "append"

[default]
exclude = ["**/target/**"]

[request.manifest]
files = ["Cargo.toml"]

[request.sources]
files = ["/etc/hosts"]

[[request.sources.tree]]
dir = "src"
include = ["**/*.rs"]
append_default_exclude = true
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.config.merge_policy, MergePolicy::Append);
    assert_eq!(cfg.requests().len(), 2);

    let base = config_root_dir(file.path()).unwrap();
    let sets = cfg.path_sets(&base).unwrap();
    let names: Vec<&str> = sets.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["manifest", "sources"]);

    let (_, sources) = &sets[1];
    assert!(sources.contains(Path::new("/etc/hosts")));
    assert!(sources.contains(&base.join("src/main.rs")));
    assert!(!sources.contains(&base.join("src/README.md")));
    assert!(!sources.contains(&base.join("src/target/gen.rs")));
}

#[test]
fn merge_policy_defaults_to_collapse() {
    let file = write_config(
        r#"
[request.only]
files = ["a"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.config.merge_policy, MergePolicy::Collapse);
}

#[test]
fn config_without_requests_is_rejected() {
    let file = write_config(
        r#"
[config]
merge_policy = "collapse"
"#,
    );

    match load_and_validate(file.path()) {
        Err(WatchpointsError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn empty_request_is_rejected() {
    let file = write_config(
        r#"
[request.nothing]
"#,
    );

    match load_and_validate(file.path()) {
        Err(WatchpointsError::ConfigError(msg)) => assert!(msg.contains("nothing")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn invalid_glob_is_a_pattern_error() {
    let file = write_config(
        r#"
[request.broken]
[[request.broken.tree]]
dir = "src"
include = ["src/[abc"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(WatchpointsError::Pattern(msg)) => assert!(msg.contains("broken")),
        Err(e) => panic!("Expected Pattern error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_merge_policy_fails_to_parse() {
    let file = write_config(
        r#"
[config]
merge_policy = "nested"

[request.only]
files = ["a"]
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(WatchpointsError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_and_validate(dir.path().join("Watchpoints.toml")),
        Err(WatchpointsError::IoError(_))
    ));
}

#[test]
fn tree_defaults_follow_append_flags() {
    let cfg: ConfigFile = ConfigFileBuilder::new()
        .with_default_include("**/*.toml")
        .with_default_exclude("**/gen/**")
        .with_request(
            "own",
            RequestConfigBuilder::new()
                .tree(TreeConfigBuilder::new("own").include("**/*.rs").build())
                .build(),
        )
        .with_request(
            "merged",
            RequestConfigBuilder::new()
                .tree(
                    TreeConfigBuilder::new("merged")
                        .include("**/*.rs")
                        .append_default_include(true)
                        .build(),
                )
                .build(),
        )
        .build();

    let sets = cfg.path_sets(Path::new("/p")).unwrap();
    let (_, merged) = &sets[0];
    let (_, own) = &sets[1];

    // Own include list replaces the default; exclude falls back to it.
    assert!(own.contains(Path::new("/p/own/lib.rs")));
    assert!(!own.contains(Path::new("/p/own/Cargo.toml")));
    assert!(!own.contains(Path::new("/p/own/gen/out.rs")));

    assert!(merged.contains(Path::new("/p/merged/lib.rs")));
    assert!(merged.contains(Path::new("/p/merged/Cargo.toml")));
}

#[test]
fn builder_config_with_blank_file_entry_is_invalid() {
    let raw = ConfigFileBuilder::new()
        .with_request("blank", RequestConfigBuilder::new().file("  ").build())
        .build_raw();

    assert!(matches!(
        validate_config(&raw),
        Err(WatchpointsError::ConfigError(_))
    ));
}
