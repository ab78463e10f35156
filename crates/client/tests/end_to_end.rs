//! Drives a real `Server` bound to a real UDP socket and a real `Client` over
//! `UdpTransport` end to end, rather than the in-process `FakeTransport` the unit tests
//! use. This is the one scenario that has to exercise actual sockets on both sides.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use roughtime_client::Client;
use roughtime_server::keys::{create_delegate, decode_cert, decode_delegate_seed, encode_public_key, generate_long_term_keypair};
use roughtime_server::Server;

const RADIUS_MICROS: u32 = 100_000;

fn start_test_server() -> (roughtime_server::ServerHandle, String) {
    let long_term = generate_long_term_keypair().unwrap();
    let server_pub_b64 = encode_public_key(&long_term);

    let (cert_b64, delegate_priv_b64) = create_delegate(&long_term, None, None).unwrap();
    let cert = decode_cert(&cert_b64).unwrap();
    let delegate = decode_delegate_seed(&delegate_priv_b64).unwrap();

    let server = Server::new(cert, delegate, RADIUS_MICROS).unwrap();
    let handle = server.start("127.0.0.1:0".parse().unwrap()).unwrap();
    (handle, server_pub_b64)
}

fn now_micros() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_micros() as u64
}

#[test]
fn a_single_query_against_a_live_server_yields_a_verified_measurement() {
    let (mut handle, server_pub_b64) = start_test_server();
    let port = handle.local_addr().port();

    let mut client = Client::new();
    let measurement = client
        .query("127.0.0.1", port, &server_pub_b64, Some(Duration::from_secs(2)))
        .unwrap();

    let wall_clock = now_micros();
    let drift = wall_clock.abs_diff(measurement.midpoint());
    assert!(drift < 2_000_000, "midpoint drifted {drift} microseconds from wall clock");
    assert_eq!(measurement.radius(), RADIUS_MICROS);
    assert!(client.verify_replies(&server_pub_b64).unwrap().is_empty());

    handle.stop();
}

#[test]
fn two_sequential_queries_chain_nonces_across_a_live_server() {
    let (mut handle, server_pub_b64) = start_test_server();
    let port = handle.local_addr().port();

    let mut client = Client::new();
    client.query("127.0.0.1", port, &server_pub_b64, Some(Duration::from_secs(2))).unwrap();
    client.query("127.0.0.1", port, &server_pub_b64, Some(Duration::from_secs(2))).unwrap();

    let entries = client.get_previous_replies();
    assert_eq!(entries.len(), 2);
    assert!(client.verify_replies(&server_pub_b64).unwrap().is_empty());

    handle.stop();
}
