//! HTTP probe adapter against loopback servers, and the watchdog driving
//! it into the command channel.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use crate::mock_hw::RecordingSink;
use firenode::adapters::probe::HttpProbe;
use firenode::app::events::AppEvent;
use firenode::app::ports::ProbePort;
use firenode::channels::CommandChannel;
use firenode::config::NodeConfig;
use firenode::connectivity::{ConnectivityWatchdog, ProbeError};
use firenode::led::{LedCommand, LedId};

fn config_for(host: &str, port: u16, timeout_ms: u32) -> NodeConfig {
    config_with_deadline(host, port, timeout_ms, timeout_ms * 3)
}

fn config_with_deadline(host: &str, port: u16, timeout_ms: u32, deadline_ms: u32) -> NodeConfig {
    NodeConfig::from_json(&format!(
        r#"{{"probe_host":"{host}","probe_port":{port},"probe_timeout_ms":{timeout_ms},"probe_deadline_ms":{deadline_ms}}}"#
    ))
    .unwrap()
}

/// Read one HTTP request head from the stream.
fn read_request(stream: &mut std::net::TcpStream) -> String {
    let mut req = Vec::new();
    let mut buf = [0u8; 256];
    while !req.ends_with(b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        req.extend_from_slice(&buf[..n]);
    }
    String::from_utf8(req).unwrap()
}

/// Serve one request with a short response, then close.
fn spawn_http_server() -> (u16, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let req = read_request(&mut stream);
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
            .unwrap();
        req
    });
    (port, handle)
}

#[test]
fn probe_succeeds_when_peer_closes() {
    let (port, server) = spawn_http_server();
    let mut probe = HttpProbe::new(&config_for("127.0.0.1", port, 2000));

    assert_eq!(probe.probe(), Ok(()));

    let req = server.join().unwrap();
    assert!(req.starts_with("GET /get HTTP/1.1\r\n"));
    assert!(req.contains("Host: 127.0.0.1\r\n"));
    assert!(req.contains("Connection: close\r\n"));
}

#[test]
fn refused_connection_is_connect_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut probe = HttpProbe::new(&config_for("127.0.0.1", port, 500));
    assert_eq!(probe.probe(), Err(ProbeError::ConnectFailed));
}

#[test]
fn unresolvable_host_is_dns_failure() {
    let mut probe = HttpProbe::new(&config_for("firenode.invalid", 80, 500));
    assert_eq!(probe.probe(), Err(ProbeError::DnsFailed));
}

#[test]
fn peer_that_never_closes_is_read_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        stream.write_all(b"HTTP/1.1 200 OK\r\n").unwrap();
        // Hold the connection open past the client's read timeout.
        thread::sleep(Duration::from_millis(600));
    });

    let mut probe = HttpProbe::new(&config_for("127.0.0.1", port, 200));
    assert_eq!(probe.probe(), Err(ProbeError::ReadFailed));
    server.join().unwrap();
}

#[test]
fn trickling_peer_hits_overall_deadline() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        // One byte every 100 ms: each read succeeds well inside its timeout.
        for _ in 0..40 {
            if stream.write_all(b".").is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    });

    let mut probe = HttpProbe::new(&config_with_deadline("127.0.0.1", port, 300, 800));
    let started = Instant::now();
    assert_eq!(probe.probe(), Err(ProbeError::ReadFailed));
    assert!(started.elapsed() < Duration::from_millis(2_000));
    server.join().unwrap();
}

#[test]
fn watchdog_reports_reachability_on_sim_led() {
    let (port, server) = spawn_http_server();
    let config = config_for("127.0.0.1", port, 2000);
    let ch: CommandChannel<4> = CommandChannel::new();
    let mut events = RecordingSink::default();
    let mut watchdog = ConnectivityWatchdog::new(HttpProbe::new(&config), &config);

    let delay = watchdog.run_once(&ch, &mut events);
    server.join().unwrap();

    assert_eq!(delay, Duration::from_secs(5));
    assert_eq!(ch.try_receive(), Some(LedCommand::on(LedId::Sim)));
    assert_eq!(
        events.events,
        vec![AppEvent::ProbeSucceeded {
            successes: 1,
            failures: 0
        }]
    );

    // Server gone: the next probe fails and the SIM LED blinks.
    let delay = watchdog.run_once(&ch, &mut events);
    assert_eq!(delay, Duration::from_secs(10));
    assert_eq!(ch.try_receive(), Some(LedCommand::blink(LedId::Sim, 250)));
    assert_eq!(watchdog.failures(), 1);
}
