// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Participant key store: loads the private key and derives the public key.
//!
//! Stores hold a PKCS#8 private key, either as a PEM bundle (the key may sit
//! next to certificates) or as a bare DER file. Only unencrypted entries can be
//! opened; an `ENCRYPTED PRIVATE KEY` block fails with a key store error.
//!
//! The public key is kept as SubjectPublicKeyInfo DER, the form other
//! participants expect in `authenticationInfo`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ring::rand::SystemRandom;
use rustls::pki_types::pem::{PemObject, SectionKind};
use ring::signature::{
    EcdsaKeyPair, EcdsaSigningAlgorithm, Ed25519KeyPair, KeyPair, RsaKeyPair,
    ECDSA_P256_SHA256_FIXED_SIGNING, ECDSA_P384_SHA384_FIXED_SIGNING,
};

use crate::config::AgentConfig;
use crate::error::AgentError;

const PEM_ENCRYPTED_PRIVATE_KEY: &str = "ENCRYPTED PRIVATE KEY";

const TAG_SEQUENCE: u8 = 0x30;
const TAG_BIT_STRING: u8 = 0x03;

// AlgorithmIdentifier contents, DER encoded.
const ALG_ED25519: &[u8] = &[0x06, 0x03, 0x2B, 0x65, 0x70];
const ALG_EC_P256: &[u8] = &[
    0x06, 0x07, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01, // id-ecPublicKey
    0x06, 0x08, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07, // prime256v1
];
const ALG_EC_P384: &[u8] = &[
    0x06, 0x07, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01, // id-ecPublicKey
    0x06, 0x05, 0x2B, 0x81, 0x04, 0x00, 0x22, // secp384r1
];
const ALG_RSA: &[u8] = &[
    0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01, // rsaEncryption
    0x05, 0x00,
];

/// On-disk encoding of the key store.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KeyStoreType {
    #[default]
    Pem,
    Der,
}

impl fmt::Display for KeyStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pem => f.write_str("pem"),
            Self::Der => f.write_str("der"),
        }
    }
}

impl FromStr for KeyStoreType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pem" => Ok(Self::Pem),
            "der" | "pkcs8" => Ok(Self::Der),
            other => anyhow::bail!("unsupported key store type: {other}"),
        }
    }
}

/// Where and how to open the key store.
#[derive(Debug, Clone)]
pub struct KeyStoreSettings {
    pub kind: KeyStoreType,
    pub path: PathBuf,
    pub store_password: Option<String>,
    pub key_password: Option<String>,
}

impl KeyStoreSettings {
    /// Settings from config; `None` when no key store path is configured.
    pub fn from_config(config: &AgentConfig) -> Option<Self> {
        let path = config.keystore_path.clone()?;
        Some(Self {
            kind: config.keystore_type,
            path,
            store_password: config.keystore_password.clone(),
            key_password: config.key_password.clone(),
        })
    }
}

/// Signature algorithm of the participant's key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Ed25519,
    EcdsaP256,
    EcdsaP384,
    Rsa,
}

/// The participant's private key, PKCS#8 DER encoded.
#[derive(Clone)]
pub struct PrivateKey {
    algorithm: KeyAlgorithm,
    pkcs8: Vec<u8>,
}

impl PrivateKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn pkcs8_der(&self) -> &[u8] {
        &self.pkcs8
    }

    pub fn is_empty(&self) -> bool {
        self.pkcs8.is_empty()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm)
            .field("pkcs8", &"<redacted>")
            .finish()
    }
}

/// Key pair loaded from the participant's key store.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    private_key: PrivateKey,
    public_key: Vec<u8>,
}

impl KeyMaterial {
    /// Open the key store and extract the participant's key pair.
    ///
    /// Every failure (missing file, bad encoding, unknown algorithm) is reported
    /// as a single [`AgentError::KeyStore`].
    pub fn load(settings: &KeyStoreSettings) -> Result<Self, AgentError> {
        let raw = std::fs::read(&settings.path).map_err(|e| {
            AgentError::KeyStore(format!("cannot read {}: {e}", settings.path.display()))
        })?;
        let pkcs8 = match settings.kind {
            KeyStoreType::Der => raw,
            KeyStoreType::Pem => {
                private_key_from_pem(&raw, &settings.path)?
            }
        };
        if settings.key_password.is_some() {
            tracing::debug!("key password set; entry is unencrypted PKCS#8 and opens without it");
        }
        Self::from_pkcs8(pkcs8)
    }

    /// Build key material from PKCS#8 DER bytes.
    pub fn from_pkcs8(pkcs8: Vec<u8>) -> Result<Self, AgentError> {
        let (algorithm, public_key) = derive_public_key(&pkcs8).ok_or_else(|| {
            AgentError::KeyStore("private key is not a supported PKCS#8 key".to_owned())
        })?;
        Ok(Self { private_key: PrivateKey { algorithm, pkcs8 }, public_key })
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// SubjectPublicKeyInfo DER of the public key.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Base64 of the public key, as carried in `authenticationInfo`.
    pub fn public_key_base64(&self) -> String {
        STANDARD.encode(&self.public_key)
    }
}

/// Find the first PKCS#8 private key block in a PEM bundle.
fn private_key_from_pem(pem: &[u8], path: &Path) -> Result<Vec<u8>, AgentError> {
    for section in <(SectionKind, Vec<u8>) as PemObject>::pem_slice_iter(pem) {
        let (kind, der) = section.map_err(|e| {
            AgentError::KeyStore(format!("malformed PEM in {}: {e}", path.display()))
        })?;
        if kind == SectionKind::PrivateKey {
            return Ok(der);
        }
    }

    // Encrypted PKCS#8 has no section kind of its own and is skipped above.
    let encrypted = format!("-----BEGIN {PEM_ENCRYPTED_PRIVATE_KEY}-----");
    if String::from_utf8_lossy(pem).contains(&encrypted) {
        return Err(AgentError::KeyStore(format!(
            "{} holds an encrypted private key; export it as unencrypted PKCS#8",
            path.display()
        )));
    }
    Err(AgentError::KeyStore(format!("no private key found in {}", path.display())))
}

/// Detect the key algorithm by parsing and return the SPKI public key.
fn derive_public_key(pkcs8: &[u8]) -> Option<(KeyAlgorithm, Vec<u8>)> {
    if let Ok(pair) = Ed25519KeyPair::from_pkcs8_maybe_unchecked(pkcs8) {
        let spki = subject_public_key_info(ALG_ED25519, pair.public_key().as_ref());
        return Some((KeyAlgorithm::Ed25519, spki));
    }

    let rng = SystemRandom::new();
    let ecdsa: [(KeyAlgorithm, &'static EcdsaSigningAlgorithm, &[u8]); 2] = [
        (KeyAlgorithm::EcdsaP256, &ECDSA_P256_SHA256_FIXED_SIGNING, ALG_EC_P256),
        (KeyAlgorithm::EcdsaP384, &ECDSA_P384_SHA384_FIXED_SIGNING, ALG_EC_P384),
    ];
    for (algorithm, signing, alg_id) in ecdsa {
        if let Ok(pair) = EcdsaKeyPair::from_pkcs8(signing, pkcs8, &rng) {
            return Some((algorithm, subject_public_key_info(alg_id, pair.public_key().as_ref())));
        }
    }

    // ring hands out the PKCS#1 RSAPublicKey.
    if let Ok(pair) = RsaKeyPair::from_pkcs8(pkcs8) {
        let spki = subject_public_key_info(ALG_RSA, pair.public_key().as_ref());
        return Some((KeyAlgorithm::Rsa, spki));
    }

    None
}

fn subject_public_key_info(alg_id: &[u8], key: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(key.len() + 1);
    bits.push(0); // no unused bits
    bits.extend_from_slice(key);

    let mut content = der(TAG_SEQUENCE, alg_id);
    content.extend(der(TAG_BIT_STRING, &bits));
    der(TAG_SEQUENCE, &content)
}

/// Tag-length-value with a definite length.
fn der(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        out.push(0x80 | (bytes.len() - skip) as u8);
        out.extend_from_slice(&bytes[skip..]);
    }
    out.extend_from_slice(content);
    out
}

#[cfg(test)]
#[path = "keystore_tests.rs"]
mod tests;
