// tests/cli_dispatch.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, ServiceBuilder};
use crate::common::{init_tracing, TestResult};

use clap::Parser;

use lvs::cli::{CliArgs, LvsCommand};
use lvs::execute_command;
use lvs::ipvs::Ipvs;
use lvs_test_utils::{FakeExecutor, Response};

#[test]
fn cli_parses_global_flags_and_subcommand() {
    let args = CliArgs::parse_from(["lvs", "--config", "/etc/lvs.toml", "start-daemon"]);

    assert_eq!(args.command, LvsCommand::StartDaemon);
    assert_eq!(args.config.as_deref(), Some(std::path::Path::new("/etc/lvs.toml")));
    assert!(args.log_level.is_none());
}

#[test]
fn save_writes_dump_to_output() -> TestResult {
    init_tracing();
    let fake = FakeExecutor::new().on(&["ipvsadm", "-S"], Response::output("-A -u 10.0.0.2:53 -s rr\n"));
    let ipvs = Ipvs::new(ConfigFileBuilder::new().build(), fake);
    let mut out = Vec::new();

    execute_command(&ipvs, LvsCommand::Save, &mut out)?;

    assert_eq!(out, b"-A -u 10.0.0.2:53 -s rr\n");
    Ok(())
}

#[test]
fn print_rules_runs_nothing() -> TestResult {
    init_tracing();
    let fake = FakeExecutor::new();
    let cfg = ConfigFileBuilder::new()
        .with_service(ServiceBuilder::tcp("10.0.0.1:80").build())
        .build();
    let ipvs = Ipvs::new(cfg, fake.clone());
    let mut out = Vec::new();

    execute_command(&ipvs, LvsCommand::PrintRules, &mut out)?;

    assert_eq!(String::from_utf8(out)?, "-A -t 10.0.0.1:80 -s wlc\n");
    assert!(fake.calls().is_empty());
    Ok(())
}

#[test]
fn restore_command_uses_configured_services() -> TestResult {
    init_tracing();
    let fake = FakeExecutor::new();
    let cfg = ConfigFileBuilder::new()
        .with_service(ServiceBuilder::tcp("10.0.0.1:80").build())
        .build();
    let ipvs = Ipvs::new(cfg, fake.clone());

    execute_command(&ipvs, LvsCommand::Restore, &mut Vec::new())?;

    assert_eq!(fake.command_lines(), vec!["ipvsadm -R"]);
    Ok(())
}

#[test]
fn failed_daemon_role_fails_the_command() {
    init_tracing();
    let fake = FakeExecutor::new().on(&["ipvsadm", "--stop-daemon", "backup"], Response::fail("No such process\n"));
    let ipvs = Ipvs::new(ConfigFileBuilder::new().build(), fake.clone());

    let err = execute_command(&ipvs, LvsCommand::StopDaemon, &mut Vec::new()).unwrap_err();

    assert!(format!("{err:#}").contains("No such process"));
    assert_eq!(fake.calls().len(), 2);
}

#[test]
fn missing_tool_surfaces_through_check_command() {
    init_tracing();
    let fake = FakeExecutor::new().on(&["which"], Response::fail(""));
    let ipvs = Ipvs::new(ConfigFileBuilder::new().build(), fake);

    let err = execute_command(&ipvs, LvsCommand::Check, &mut Vec::new()).unwrap_err();

    assert!(err.to_string().contains("unable to find the ipvsadm command"));
}
