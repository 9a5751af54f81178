//! The seven concrete scenarios from the design document, run end-to-end
//! against the built binary.

mod common;

use common::cli::{run_cellar, CellarWorkspace};

#[test]
fn scenario_1_set_three_times_then_history_list() {
    let ws = CellarWorkspace::new();
    run_cellar(&ws, ["set", "a", "1"]);
    run_cellar(&ws, ["set", "a", "2"]);
    run_cellar(&ws, ["set", "a", "3"]);

    let history = run_cellar(&ws, ["history", "list", "a"]);
    assert!(history.success());
    assert!(history.stdout.contains('1'));
    assert!(history.stdout.contains('2'));
    assert!(history.stdout.contains('3'));

    let latest = run_cellar(&ws, ["get", "a"]);
    assert_eq!(latest.stdout.trim(), "3");
}

#[test]
fn scenario_2_revert_one_step() {
    let ws = CellarWorkspace::new();
    run_cellar(&ws, ["set", "a", "1"]);
    run_cellar(&ws, ["set", "a", "2"]);

    let revert = run_cellar(&ws, ["history", "revert", "a", "--steps", "1"]);
    assert!(revert.success(), "revert failed: {}", revert.stderr);

    let value = run_cellar(&ws, ["get", "a"]);
    assert_eq!(value.stdout.trim(), "1");
}

#[test]
fn scenario_3_locked_key_requires_password() {
    let ws = CellarWorkspace::new();
    run_cellar(&ws, ["set", "k", "secret", "--password", "pw"]);

    let without_password = run_cellar(&ws, ["get", "k"]);
    assert!(!without_password.success());

    let with_password = run_cellar(&ws, ["get", "k", "--password", "pw"]);
    assert!(with_password.success());
    assert_eq!(with_password.stdout.trim(), "secret");
}

#[test]
fn scenario_4_hidden_key_still_readable() {
    let ws = CellarWorkspace::new();
    run_cellar(&ws, ["set", "k", "v"]);
    run_cellar(&ws, ["hide", "k"]);

    let listing = run_cellar(&ws, ["list"]);
    assert!(listing.stdout.contains("[Hidden]"));

    let value = run_cellar(&ws, ["get", "k"]);
    assert_eq!(value.stdout.trim(), "v");
}

#[test]
fn scenario_5_locked_sentinel_wins_over_hidden_then_unlock_restores_hidden() {
    let ws = CellarWorkspace::new();
    run_cellar(&ws, ["set", "k", "v", "--password", "pw"]);
    run_cellar(&ws, ["hide", "k"]);

    let locked_listing = run_cellar(&ws, ["list"]);
    assert!(locked_listing.stdout.contains("[Locked]"));
    assert!(!locked_listing.stdout.contains("[Hidden]"));

    let unlock = run_cellar(&ws, ["unlock", "k", "--password", "pw"]);
    assert!(unlock.success(), "unlock failed: {}", unlock.stderr);

    let hidden_listing = run_cellar(&ws, ["list"]);
    assert!(hidden_listing.stdout.contains("[Hidden]"));
}

#[test]
fn scenario_6_multi_key_delete_is_all_or_nothing() {
    let ws = CellarWorkspace::new();
    run_cellar(&ws, ["set", "a", "x"]);
    run_cellar(&ws, ["set", "b", "y"]);

    let delete = run_cellar(&ws, ["delete", "a", "missing", "b"]);
    assert!(!delete.success());

    assert_eq!(run_cellar(&ws, ["get", "a"]).stdout.trim(), "x");
    assert_eq!(run_cellar(&ws, ["get", "b"]).stdout.trim(), "y");
}

#[test]
fn scenario_7_negative_ttl_expires_immediately() {
    let ws = CellarWorkspace::new();
    run_cellar(&ws, ["set", "k", "v", "--expires-after", "-1s"]);

    let get = run_cellar(&ws, ["get", "k"]);
    assert!(!get.success());
    assert!(get.stderr.contains("does not exist"));
}
