use std::path::PathBuf;

use ghidra_provision::ui;
use ghidra_provision::warnings::ProvisionWarning;

#[test]
fn test_missing_config_key_display() {
    let warning = ProvisionWarning::MissingConfigKey {
        key: "ppath",
        path: PathBuf::from("ghidra-server.toml"),
        default: "./projects".to_string(),
    };

    let display_msg = warning.to_string();
    assert_eq!(
        display_msg,
        "'ppath' config not found in ghidra-server.toml. Defaulting to ppath: ./projects"
    );
}

#[test]
fn test_config_file_missing_display() {
    let warning = ProvisionWarning::ConfigFileMissing {
        path: PathBuf::from("/etc/ghidra-server.toml"),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("/etc/ghidra-server.toml"),
        "Message should contain the path, got: {}",
        display_msg
    );
}

#[test]
fn test_daemon_not_running_display() {
    let display_msg = ProvisionWarning::DaemonNotRunning.to_string();
    assert!(display_msg.contains("not running"));
}

#[test]
fn test_display_warning_does_not_panic() {
    ui::display_warning(&ProvisionWarning::DaemonNotRunning);
}

#[test]
fn test_warning_equality() {
    let a = ProvisionWarning::ConfigFileMissing {
        path: PathBuf::from("a"),
    };
    assert_eq!(a.clone(), a);
    assert_ne!(a, ProvisionWarning::DaemonNotRunning);
}
