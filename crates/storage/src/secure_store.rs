//! Encrypted on-disk secrets (device identifiers, tokens).

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use parking_lot::Mutex;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::Zeroize;

const NONCE_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum SecureStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encryption error")]
    Encryption,

    #[error("Secret not found: {0}")]
    NotFound(String),
}

/// One encrypted value. On disk it is the nonce followed by the ciphertext.
#[derive(Clone)]
struct SealedValue {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl SealedValue {
    fn to_bytes(&self) -> Vec<u8> {
        let mut blob = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        blob.extend_from_slice(&self.nonce);
        blob.extend_from_slice(&self.ciphertext);
        blob
    }

    fn from_bytes(blob: &[u8]) -> Option<Self> {
        if blob.len() < NONCE_LEN {
            return None;
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        Some(Self {
            nonce: nonce.try_into().ok()?,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

pub struct SecureStore {
    store_path: PathBuf,
    cipher: Aes256Gcm,
    cache: Mutex<HashMap<String, SealedValue>>,
}

impl SecureStore {
    pub fn new<P: AsRef<Path>>(store_path: P, master_key: &[u8; 32]) -> Result<Self, SecureStoreError> {
        let store_path = store_path.as_ref().to_path_buf();
        fs::create_dir_all(&store_path)?;

        Ok(Self {
            store_path,
            cipher: Aes256Gcm::new(master_key.into()),
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Open a store whose master key lives in `key_path`, creating a random
    /// key on first use.
    pub fn open_with_key_file<P: AsRef<Path>, K: AsRef<Path>>(
        store_path: P,
        key_path: K,
    ) -> Result<Self, SecureStoreError> {
        let key_path = key_path.as_ref();
        let mut master_key = [0u8; 32];

        if key_path.exists() {
            let mut raw = fs::read(key_path)?;
            if raw.len() != master_key.len() {
                raw.zeroize();
                return Err(SecureStoreError::Encryption);
            }
            master_key.copy_from_slice(&raw);
            raw.zeroize();
        } else {
            rand::thread_rng().fill_bytes(&mut master_key);
            if let Some(parent) = key_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(key_path)?;
            file.write_all(&master_key)?;
            file.sync_all()?;
        }

        let store = Self::new(store_path, &master_key);
        master_key.zeroize();
        store
    }

    pub fn store_secret(&self, name: &str, value: &str) -> Result<(), SecureStoreError> {
        let sealed = self.seal(value)?;
        let path = self.secret_path(name);
        let tmp = path.with_extension("enc.tmp");
        fs::write(&tmp, sealed.to_bytes())?;
        fs::rename(&tmp, &path)?;

        self.cache.lock().insert(name.to_string(), sealed);
        Ok(())
    }

    pub fn get_secret(&self, name: &str) -> Result<String, SecureStoreError> {
        let cached = self.cache.lock().get(name).cloned();
        let sealed = match cached {
            Some(sealed) => sealed,
            None => {
                let sealed = self.read_sealed(name)?;
                self.cache.lock().insert(name.to_string(), sealed.clone());
                sealed
            }
        };
        self.unseal(&sealed)
    }

    pub fn delete_secret(&self, name: &str) -> Result<(), SecureStoreError> {
        self.cache.lock().remove(name);
        match fs::remove_file(self.secret_path(name)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Best-effort write; failures are logged and swallowed.
    pub fn save_in_store(&self, key: &str, value: &str) {
        if let Err(e) = self.store_secret(key, value) {
            tracing::warn!("Failed to save {} in secure store: {}", key, e);
        }
    }

    /// Best-effort read. Missing and empty values read as `None`.
    pub fn retrieve_from_store(&self, key: &str) -> Option<String> {
        match self.get_secret(key) {
            Ok(value) if !value.is_empty() => Some(value),
            Ok(_) | Err(SecureStoreError::NotFound(_)) => None,
            Err(e) => {
                tracing::error!("Failed to retrieve {} from secure store: {}", key, e);
                None
            }
        }
    }

    fn seal(&self, value: &str) -> Result<SealedValue, SecureStoreError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), value.as_bytes())
            .map_err(|_| SecureStoreError::Encryption)?;
        Ok(SealedValue { nonce, ciphertext })
    }

    fn unseal(&self, sealed: &SealedValue) -> Result<String, SecureStoreError> {
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_ref())
            .map_err(|_| SecureStoreError::Encryption)?;
        String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            SecureStoreError::Encryption
        })
    }

    fn read_sealed(&self, name: &str) -> Result<SealedValue, SecureStoreError> {
        let blob = match fs::read(self.secret_path(name)) {
            Ok(blob) => blob,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SecureStoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        SealedValue::from_bytes(&blob).ok_or(SecureStoreError::Encryption)
    }

    fn secret_path(&self, name: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        self.store_path.join(format!("{:x}.enc", hasher.finalize()))
    }
}

impl Drop for SecureStore {
    fn drop(&mut self) {
        self.cache.lock().clear();
    }
}
