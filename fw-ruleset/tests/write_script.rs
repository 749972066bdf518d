use std::fs;

use fw_ruleset::{write_script, Backend, Chain, FirewallConfig, FirewallRule, WriteError};

#[test]
fn writes_script_into_new_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("plant").join("PLC01");
    let config = FirewallConfig::deny_by_default(vec![
        FirewallRule::accept(Chain::Input).interface_in("lo")
    ]);

    let path = write_script(&config, Backend::Iptables, &target).expect("write");

    assert_eq!(path, target.join("iptables.sh"));
    let written = fs::read_to_string(&path).expect("read back");
    assert!(written.contains("iptables -A INPUT -i lo -j ACCEPT"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn render_failure_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("bad");
    let config = FirewallConfig::deny_by_default(vec![
        FirewallRule::accept(Chain::Input).destination_ports(vec![80])
    ]);

    let err = write_script(&config, Backend::Iptables, &target).expect_err("should fail");
    assert!(matches!(err, WriteError::Render(_)));
    assert!(!target.exists());
}

#[test]
fn unwritable_target_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("file");
    fs::write(&blocker, "not a directory").expect("write blocker");
    let config = FirewallConfig::deny_by_default(Vec::new());

    let err = write_script(&config, Backend::Iptables, &blocker.join("sub"))
        .expect_err("should fail");
    assert!(matches!(err, WriteError::Io { .. }));
}
