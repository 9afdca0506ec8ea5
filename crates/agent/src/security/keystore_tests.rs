// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, Ed25519KeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};

use super::*;

const RSA_PKCS8_PEM: &str = include_str!("../../testdata/rsa_2048.pk8.pem");
const RSA_SPKI_DER: &[u8] = include_bytes!("../../testdata/rsa_2048.spki.der");

const ED25519_SPKI_PREFIX: [u8; 12] =
    [0x30, 0x2A, 0x30, 0x05, 0x06, 0x03, 0x2B, 0x65, 0x70, 0x03, 0x21, 0x00];

fn ed25519_pkcs8() -> anyhow::Result<Vec<u8>> {
    let doc = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new())
        .map_err(|_| anyhow::anyhow!("keygen failed"))?;
    Ok(doc.as_ref().to_vec())
}

fn to_pem(label: &str, der: &[u8]) -> String {
    let encoded = STANDARD.encode(der);
    let mut pem = format!("-----BEGIN {label}-----\n");
    for chunk in encoded.as_bytes().chunks(64) {
        pem.push_str(&String::from_utf8_lossy(chunk));
        pem.push('\n');
    }
    pem.push_str(&format!("-----END {label}-----\n"));
    pem
}

fn settings(kind: KeyStoreType, path: PathBuf) -> KeyStoreSettings {
    KeyStoreSettings { kind, path, store_password: None, key_password: None }
}

#[test]
fn keystore_type_parses_case_insensitively() -> anyhow::Result<()> {
    assert_eq!("PEM".parse::<KeyStoreType>()?, KeyStoreType::Pem);
    assert_eq!("der".parse::<KeyStoreType>()?, KeyStoreType::Der);
    assert_eq!("pkcs8".parse::<KeyStoreType>()?, KeyStoreType::Der);
    assert!("pkcs12".parse::<KeyStoreType>().is_err());
    Ok(())
}

#[test]
fn loads_ed25519_key_from_pem_bundle() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pkcs8 = ed25519_pkcs8()?;
    let cert = to_pem("CERTIFICATE", b"not-a-cert");
    let bundle = format!("{cert}{}", to_pem("PRIVATE KEY", &pkcs8));
    let path = dir.path().join("store.pem");
    std::fs::write(&path, bundle)?;

    let material = KeyMaterial::load(&settings(KeyStoreType::Pem, path))?;
    assert_eq!(material.private_key().algorithm(), KeyAlgorithm::Ed25519);
    assert_eq!(material.private_key().pkcs8_der(), pkcs8.as_slice());
    assert_eq!(material.public_key().len(), 44);
    assert!(material.public_key().starts_with(&ED25519_SPKI_PREFIX));
    Ok(())
}

#[test]
fn loads_ecdsa_key_from_der() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let rng = SystemRandom::new();
    let doc = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
        .map_err(|_| anyhow::anyhow!("keygen failed"))?;
    let path = dir.path().join("store.der");
    std::fs::write(&path, doc.as_ref())?;

    let material = KeyMaterial::load(&settings(KeyStoreType::Der, path))?;
    assert_eq!(material.private_key().algorithm(), KeyAlgorithm::EcdsaP256);
    let spki = material.public_key();
    assert_eq!(spki.len(), 91);
    // id-ecPublicKey with prime256v1, then the uncompressed point.
    assert_eq!(&spki[..4], [0x30, 0x59, 0x30, 0x13]);
    assert_eq!(&spki[23..27], [0x03, 0x42, 0x00, 0x04]);
    Ok(())
}

#[test]
fn loads_rsa_key_with_openssl_compatible_spki() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("rsa.pem");
    std::fs::write(&path, RSA_PKCS8_PEM)?;

    let material = KeyMaterial::load(&settings(KeyStoreType::Pem, path))?;
    assert_eq!(material.private_key().algorithm(), KeyAlgorithm::Rsa);
    assert_eq!(material.public_key(), RSA_SPKI_DER);
    Ok(())
}

#[test]
fn der_lengths_use_long_form_past_127() {
    assert_eq!(der(0x04, &[0xAA; 3]), [0x04, 0x03, 0xAA, 0xAA, 0xAA]);
    assert_eq!(der(0x04, &[0; 200])[..3], [0x04, 0x81, 200]);
    assert_eq!(der(0x04, &[0; 300])[..4], [0x04, 0x82, 0x01, 0x2C]);
}

#[test]
fn public_key_base64_is_subject_public_key_info() -> anyhow::Result<()> {
    let pkcs8 = ed25519_pkcs8()?;
    let raw = Ed25519KeyPair::from_pkcs8(&pkcs8)
        .map_err(|_| anyhow::anyhow!("bad test key"))?
        .public_key()
        .as_ref()
        .to_vec();
    let material = KeyMaterial::from_pkcs8(pkcs8)?;

    let decoded = STANDARD.decode(material.public_key_base64())?;

    assert_eq!(decoded, material.public_key());
    assert_eq!(decoded.len(), 44);
    assert_eq!(decoded[0], 0x30);
    assert_eq!(decoded[..12], ED25519_SPKI_PREFIX);
    assert_eq!(decoded[12..], raw);
    Ok(())
}

#[test]
fn missing_file_is_keystore_error() {
    let result = KeyMaterial::load(&settings(
        KeyStoreType::Pem,
        PathBuf::from("/nonexistent/proxagent/store.pem"),
    ));
    assert!(matches!(result, Err(AgentError::KeyStore(_))));
}

#[test]
fn encrypted_entry_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("store.pem");
    std::fs::write(&path, to_pem("ENCRYPTED PRIVATE KEY", b"opaque"))?;

    let result = KeyMaterial::load(&settings(KeyStoreType::Pem, path));
    let Err(AgentError::KeyStore(msg)) = result else {
        anyhow::bail!("expected key store error");
    };
    assert!(msg.contains("encrypted"), "unexpected message: {msg}");
    Ok(())
}

#[test]
fn pem_without_private_key_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("store.pem");
    std::fs::write(&path, to_pem("CERTIFICATE", b"cert"))?;

    let result = KeyMaterial::load(&settings(KeyStoreType::Pem, path));
    assert!(matches!(result, Err(AgentError::KeyStore(_))));
    Ok(())
}

#[test]
fn mismatched_end_label_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("store.pem");
    let pem = to_pem("PRIVATE KEY", &ed25519_pkcs8()?)
        .replace("-----END PRIVATE KEY-----", "-----END CERTIFICATE-----");
    std::fs::write(&path, pem)?;

    let result = KeyMaterial::load(&settings(KeyStoreType::Pem, path));
    assert!(matches!(result, Err(AgentError::KeyStore(_))));
    Ok(())
}

#[test]
fn non_utf8_pem_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("store.pem");
    std::fs::write(&path, [0xFF, 0xFE, 0x00, 0x30])?;

    let result = KeyMaterial::load(&settings(KeyStoreType::Pem, path));
    assert!(matches!(result, Err(AgentError::KeyStore(_))));
    Ok(())
}

#[test]
fn garbage_der_is_rejected() {
    let result = KeyMaterial::from_pkcs8(vec![0x30, 0x03, 0x02, 0x01, 0x00]);
    assert!(matches!(result, Err(AgentError::KeyStore(_))));
}

#[test]
fn private_key_debug_is_redacted() -> anyhow::Result<()> {
    let material = KeyMaterial::from_pkcs8(ed25519_pkcs8()?)?;
    let rendered = format!("{:?}", material.private_key());
    assert!(rendered.contains("<redacted>"));
    Ok(())
}
