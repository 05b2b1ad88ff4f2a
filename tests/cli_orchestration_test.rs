use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use ghidra_provision::cli::orchestration::ensure_project_dir;
use ghidra_provision::cli::{persist_config, ProvisionArgs, Provisioner};
use ghidra_provision::config::{load_config, ServerConfig};
use ghidra_provision::docker::MockImages;
use ghidra_provision::release::ReleaseFetcher;
use ghidra_provision::version::Version;
use ghidra_provision::ProvisionError;
use mockito::{Mock, Server, ServerGuard};
use tempfile::TempDir;

const LATEST_BODY: &str = r#"{"tag_name":"Ghidra_11.0_build",
    "assets":[{"browser_download_url":"http://x/y.zip","name":"y.zip"}]}"#;

fn loopback(_local: bool) -> ghidra_provision::Result<IpAddr> {
    Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn always_yes(_prompt: &str) -> bool {
    true
}

fn always_no(_prompt: &str) -> bool {
    false
}

struct Fixture {
    dir: TempDir,
    _mocks: Vec<Mock>,
    _server: ServerGuard,
    fetcher: ReleaseFetcher,
}

impl Fixture {
    fn new(known_releases: &str) -> Self {
        Self::with_latest(known_releases, LATEST_BODY)
    }

    fn with_latest(known_releases: &str, latest_body: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("releases.json"),
            format!(r#"{{"release-hashes": {}}}"#, known_releases),
        )
        .unwrap();

        let mut server = Server::new();
        let mocks = vec![
            server
                .mock("GET", "/repos/owner/repo/releases/latest")
                .with_body(latest_body)
                .create(),
            server
                .mock("GET", "/repos/owner/repo/git/ref/tags/Ghidra_11.0_build")
                .with_body(r#"{"object":{"sha":"c0ffee","type":"commit"}}"#)
                .create(),
        ];

        let client = ReleaseFetcher::default_client(Duration::from_secs(5)).unwrap();
        let fetcher = ReleaseFetcher::new(client, server.url(), "owner/repo");
        Fixture {
            dir,
            _server: server,
            _mocks: mocks,
            fetcher,
        }
    }

    fn args(&self) -> ProvisionArgs {
        ProvisionArgs {
            releases_path: self.dir.path().join("releases.json"),
            env_path: self.dir.path().join(".env"),
            launch: true,
        }
    }

    fn config(&self) -> ServerConfig {
        ServerConfig {
            users: vec!["alice".to_string()],
            local: true,
            ppath: self.dir.path().join("projects"),
        }
    }
}

#[test]
fn test_new_release_is_built_and_launched() {
    let fixture = Fixture::new(r#"{"10.9": "old"}"#);
    let images = MockImages::new().building("11.0");
    let provisioner = Provisioner {
        fetcher: &fixture.fetcher,
        images: &images,
        confirm: &always_no,
        lookup_ip: loopback,
    };

    let outcome = provisioner.run(&fixture.config(), &fixture.args()).unwrap();

    assert_eq!(outcome.version, Version::parse("11.0"));
    assert!(outcome.built);
    assert!(outcome.launched);
    assert_eq!(outcome.bind_ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(images.builds(), 1);
    assert_eq!(images.launches(), 1);
    assert!(fixture.dir.path().join("projects").is_dir());

    let env = fs::read_to_string(fixture.dir.path().join(".env")).unwrap();
    assert!(env.contains("version_number=11.0\n"));
    assert!(env.contains("commit_sha=c0ffee\n"));
    assert!(env.contains("BUILD_TYPE=prebuild\n"));
    assert!(env.contains("GHIDRA_USERS=alice\n"));
    assert!(env.contains("GHIDRA_BIND_IP=127.0.0.1\n"));
}

#[test]
fn test_up_to_date_release_is_only_launched() {
    let fixture = Fixture::new(r#"{"11.0": "c0ffee"}"#);
    let images = MockImages::new().with_image("11.0");
    let provisioner = Provisioner {
        fetcher: &fixture.fetcher,
        images: &images,
        confirm: &always_no,
        lookup_ip: loopback,
    };

    let mut args = fixture.args();
    args.launch = false;
    let outcome = provisioner.run(&fixture.config(), &args).unwrap();

    assert!(!outcome.built);
    assert!(!outcome.launched);
    assert_eq!(images.builds(), 0);
    assert_eq!(images.launches(), 0);

    let env = fs::read_to_string(fixture.dir.path().join(".env")).unwrap();
    assert!(env.contains("GHIDRA_VERSION=11.0\n"));
    assert!(!env.contains("BUILD_TYPE"));
}

#[test]
fn test_build_that_produces_no_image_fails() {
    let fixture = Fixture::new(r#"{"10.9": "old"}"#);
    let images = MockImages::new();
    let provisioner = Provisioner {
        fetcher: &fixture.fetcher,
        images: &images,
        confirm: &always_no,
        lookup_ip: loopback,
    };

    let err = provisioner
        .run(&fixture.config(), &fixture.args())
        .unwrap_err();
    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::Image(msg)) => {
            assert_eq!(msg, "Could not build image ghidra:ghidra11.0")
        }
        other => panic!("expected Image error, got {:?}", other),
    }
    assert_eq!(images.launches(), 0);
}

#[test]
fn test_resolution_failure_names_step() {
    let fixture = Fixture::with_latest(r#"{"10.9": "old"}"#, r#"{"assets":[]}"#);
    let images = MockImages::new();
    let provisioner = Provisioner {
        fetcher: &fixture.fetcher,
        images: &images,
        confirm: &always_no,
        lookup_ip: loopback,
    };

    let err = provisioner
        .run(&fixture.config(), &fixture.args())
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("release resolution failed while parsing release version"));
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::MissingTagName)
    ));
}

#[test]
fn test_missing_release_store_is_fatal() {
    let fixture = Fixture::new("{}");
    fs::remove_file(fixture.dir.path().join("releases.json")).unwrap();
    let images = MockImages::new();
    let provisioner = Provisioner {
        fetcher: &fixture.fetcher,
        images: &images,
        confirm: &always_no,
        lookup_ip: loopback,
    };

    let err = provisioner
        .run(&fixture.config(), &fixture.args())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::ConfigMissing { .. })
    ));
}

#[test]
fn test_stopped_daemon_declined() {
    let fixture = Fixture::new(r#"{"10.9": "old"}"#);
    let images = MockImages::new().with_stopped_daemon(true);
    let provisioner = Provisioner {
        fetcher: &fixture.fetcher,
        images: &images,
        confirm: &always_no,
        lookup_ip: loopback,
    };

    let err = provisioner
        .run(&fixture.config(), &fixture.args())
        .unwrap_err();
    assert!(err.to_string().contains("docker daemon is not running"));
}

#[test]
fn test_stopped_daemon_started_on_confirmation() {
    let fixture = Fixture::new(r#"{"11.0": "c0ffee"}"#);
    let images = MockImages::new()
        .with_image("11.0")
        .with_stopped_daemon(true);
    let provisioner = Provisioner {
        fetcher: &fixture.fetcher,
        images: &images,
        confirm: &always_yes,
        lookup_ip: loopback,
    };

    let outcome = provisioner.run(&fixture.config(), &fixture.args()).unwrap();
    assert!(outcome.launched);
}

#[test]
fn test_ensure_project_dir() {
    let dir = TempDir::new().unwrap();
    let ppath = dir.path().join("a").join("projects");
    ensure_project_dir(&ppath).unwrap();
    assert!(ppath.is_dir());
    ensure_project_dir(&ppath).unwrap();

    let file = dir.path().join("file");
    fs::write(&file, "").unwrap();
    let err = ensure_project_dir(&file).unwrap_err();
    assert!(err.to_string().contains("is a file, not a directory"));
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Config(_))
    ));
}

#[test]
fn test_persist_config_writes_new_file_without_prompt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ghidra-server.toml");
    let config = ServerConfig::default();
    let never_asked = |_: &str| -> bool { panic!("should not prompt for a new file") };

    assert!(persist_config(&config, &path, &never_asked).unwrap());
    assert_eq!(load_config(Some(&path)).unwrap().config, config);
}

#[test]
fn test_persist_config_existing_file_needs_confirmation() {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("ghidra-server.toml");
    fs::write(&path, "users = [\"old\"]\nlocal = true\nppath = \"/old\"\n").unwrap();
    let config = ServerConfig::default();

    assert!(!persist_config(&config, &path, &always_no).unwrap());
    assert_eq!(load_config(Some(&path)).unwrap().config.users, vec!["old"]);

    assert!(persist_config(&config, &path, &always_yes).unwrap());
    assert_eq!(load_config(Some(&path)).unwrap().config, config);
}
