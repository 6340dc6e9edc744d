//! Shared helpers: throwaway certificate issuance and loopback servers

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::JoinHandle;

use rcgen::{BasicConstraints, CertificateParams, CustomExtension, DnType, IsCa, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{ServerConfig, ServerConnection};

pub struct TestCa {
    pub cert_pem: String,
    pub cert_der: Vec<u8>,
    cert: rcgen::Certificate,
    key: KeyPair,
}

pub struct TestLeaf {
    pub cert_pem: String,
    pub cert_der: Vec<u8>,
    pub key_der: Vec<u8>,
}

pub fn issue_ca(common_name: &str) -> TestCa {
    let key = KeyPair::generate().expect("generate CA key");
    let mut params = CertificateParams::new(Vec::<String>::new()).expect("CA params");
    params.distinguished_name.push(DnType::CommonName, common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let cert = params.self_signed(&key).expect("self-signed CA");
    TestCa {
        cert_pem: cert.pem(),
        cert_der: cert.der().as_ref().to_vec(),
        cert,
        key,
    }
}

/// Issue a leaf for `host`, optionally carrying an AIA extension whose
/// CA Issuers entry points at `ca_issuers_url`.
pub fn issue_leaf(ca: &TestCa, host: &str, ca_issuers_url: Option<&str>) -> TestLeaf {
    let key = KeyPair::generate().expect("generate leaf key");
    let mut params = CertificateParams::new(vec![host.to_string()]).expect("leaf params");
    params.distinguished_name.push(DnType::CommonName, host);
    if let Some(url) = ca_issuers_url {
        params.custom_extensions.push(aia_ca_issuers(url));
    }
    let cert = params.signed_by(&key, &ca.cert, &ca.key).expect("sign leaf");
    TestLeaf {
        cert_pem: cert.pem(),
        cert_der: cert.der().as_ref().to_vec(),
        key_der: key.serialize_der(),
    }
}

/// Hand-encoded AuthorityInfoAccess with a single caIssuers URI.
fn aia_ca_issuers(url: &str) -> CustomExtension {
    // id-ad-caIssuers = 1.3.6.1.5.5.7.48.2
    let oid = [0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x02];
    let uri = url.as_bytes();
    assert!(uri.len() < 100, "test URL too long for single-byte DER lengths");
    let mut access_desc = vec![0x30, (oid.len() + 2 + uri.len()) as u8];
    access_desc.extend_from_slice(&oid);
    access_desc.push(0x86); // [6] uniformResourceIdentifier
    access_desc.push(uri.len() as u8);
    access_desc.extend_from_slice(uri);
    let mut aia = vec![0x30, access_desc.len() as u8];
    aia.extend_from_slice(&access_desc);
    CustomExtension::from_oid_content(&[1, 3, 6, 1, 5, 5, 7, 1, 1], aia)
}

/// TLS server on an ephemeral loopback port presenting only the leaf
/// certificate, serving `connections` handshakes then exiting.
pub fn spawn_tls_server(leaf: &TestLeaf, connections: usize) -> (u16, JoinHandle<()>) {
    let certs = vec![CertificateDer::from(leaf.cert_der.clone())];
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf.key_der.clone()));
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = Arc::new(
        ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .expect("server protocol versions")
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .expect("server certificate"),
    );

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local addr").port();
    let handle = std::thread::spawn(move || {
        for _ in 0..connections {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let Ok(mut conn) = ServerConnection::new(config.clone()) else {
                return;
            };
            while conn.is_handshaking() {
                if conn.complete_io(&mut stream).is_err() {
                    // client rejected us (expected in negative tests)
                    break;
                }
            }
            conn.send_close_notify();
            let _ = conn.complete_io(&mut stream);
        }
    });
    (port, handle)
}

/// One-shot HTTP/1.1 responder on an ephemeral loopback port.
pub fn spawn_http_server(status_line: &'static str, body: Vec<u8>) -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local addr").port();
    let handle = std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = [0u8; 2048];
        let _ = stream.read(&mut request);
        let head = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/pkix-cert\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(&body);
    });
    (port, handle)
}
