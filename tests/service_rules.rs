// tests/service_rules.rs

mod common;
use crate::common::args;
use crate::common::builders::ServiceBuilder;

use lvs::ipvs::{restore_script, Forwarder, Protocol, Scheduler};

#[test]
fn restore_script_lists_services_followed_by_their_servers() {
    let services = vec![
        ServiceBuilder::tcp("10.0.0.1:443")
            .scheduler(Scheduler::Sh)
            .persistence(600)
            .server_with("192.168.0.10:443", Forwarder::Ipip, 3)
            .build(),
        ServiceBuilder::udp("10.0.0.2:53").server("192.168.0.20:53").build(),
    ];

    assert_eq!(
        restore_script(&services),
        "-A -t 10.0.0.1:443 -s sh -p 600\n\
         -a -t 10.0.0.1:443 -r 192.168.0.10:443 -i -w 3\n\
         -A -u 10.0.0.2:53 -s wlc\n\
         -a -u 10.0.0.2:53 -r 192.168.0.20:53 -g -w 1\n"
    );
}

#[test]
fn empty_service_list_renders_empty_script() {
    assert_eq!(restore_script(&[]), "");
}

#[test]
fn ipv6_addresses_are_bracketed() {
    let service = ServiceBuilder::tcp("[2001:db8::1]:80")
        .server("[2001:db8::10]:8080")
        .build();

    assert_eq!(service.target_args(), args(&["-t", "[2001:db8::1]:80"]));
    assert_eq!(
        service.servers[0].delete_args(&service),
        args(&["-d", "-t", "[2001:db8::1]:80", "-r", "[2001:db8::10]:8080"])
    );
}

#[test]
fn sctp_services_use_long_flag() {
    let service = ServiceBuilder::new(Protocol::Sctp, "10.0.0.3:3868").build();

    assert_eq!(
        service.delete_args(),
        args(&["-D", "--sctp-service", "10.0.0.3:3868"])
    );
    assert_eq!(service.to_string(), "sctp 10.0.0.3:3868");
}

#[test]
fn thresholds_are_rendered_when_set() {
    let mut service = ServiceBuilder::tcp("10.0.0.1:80").server("192.168.0.10:80").build();
    service.servers[0].upper_threshold = Some(200);
    service.servers[0].lower_threshold = Some(20);

    assert_eq!(
        service.servers[0].add_args(&service),
        args(&[
            "-a", "-t", "10.0.0.1:80", "-r", "192.168.0.10:80", "-g", "-w", "1", "-x", "200", "-y",
            "20"
        ])
    );
}
