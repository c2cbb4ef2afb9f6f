//! # AES-128 Block Cipher
//!
//! Single-block AES-128 with no IV and no chaining. The identifier codec
//! applies it block by block (ECB). Identical plaintext blocks under one key
//! produce identical ciphertext blocks; the circuit depends on this mode, so
//! it is kept as is.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Block};

use zkpa_core::{AttestError, BLOCK_LEN};

fn cipher_for(key: &[u8]) -> Result<Aes128, AttestError> {
    Aes128::new_from_slice(key).map_err(|_| AttestError::InvalidKeyLength {
        expected: zkpa_core::SYMMETRIC_KEY_LEN,
        actual: key.len(),
    })
}

/// Encrypt one 16-byte block.
pub fn encrypt_block(key: &[u8], block: &[u8; BLOCK_LEN]) -> Result<[u8; BLOCK_LEN], AttestError> {
    let cipher = cipher_for(key)?;
    let mut b = Block::clone_from_slice(block);
    cipher.encrypt_block(&mut b);
    Ok(b.into())
}

/// Decrypt one 16-byte block.
pub fn decrypt_block(key: &[u8], block: &[u8; BLOCK_LEN]) -> Result<[u8; BLOCK_LEN], AttestError> {
    let cipher = cipher_for(key)?;
    let mut b = Block::clone_from_slice(block);
    cipher.decrypt_block(&mut b);
    Ok(b.into())
}

/// Encrypt a block-aligned buffer in place, block by block.
pub(crate) fn encrypt_blocks(key: &[u8], data: &mut [u8]) -> Result<(), AttestError> {
    let cipher = cipher_for(key)?;
    for chunk in data.chunks_exact_mut(BLOCK_LEN) {
        cipher.encrypt_block(Block::from_mut_slice(chunk));
    }
    Ok(())
}

/// Decrypt a block-aligned buffer in place, block by block.
pub(crate) fn decrypt_blocks(key: &[u8], data: &mut [u8]) -> Result<(), AttestError> {
    let cipher = cipher_for(key)?;
    for chunk in data.chunks_exact_mut(BLOCK_LEN) {
        cipher.decrypt_block(Block::from_mut_slice(chunk));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 appendix C.1
    const KEY: &str = "000102030405060708090a0b0c0d0e0f";
    const PLAINTEXT: &str = "00112233445566778899aabbccddeeff";
    const CIPHERTEXT: &str = "69c4e0d86a7b0430d8cdb78070b4c55a";

    fn block(s: &str) -> [u8; 16] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn fips197_vector() {
        let key = hex::decode(KEY).unwrap();
        let ct = encrypt_block(&key, &block(PLAINTEXT)).unwrap();
        assert_eq!(hex::encode(ct), CIPHERTEXT);
        let pt = decrypt_block(&key, &ct).unwrap();
        assert_eq!(hex::encode(pt), PLAINTEXT);
    }

    #[test]
    fn wrong_key_length() {
        for len in [0usize, 15, 17, 32] {
            assert_eq!(
                encrypt_block(&vec![0u8; len], &[0u8; 16]),
                Err(AttestError::InvalidKeyLength {
                    expected: 16,
                    actual: len
                })
            );
        }
        assert!(decrypt_block(&[0u8; 24], &[0u8; 16]).is_err());
    }

    #[test]
    fn identical_blocks_encrypt_identically() {
        let key = hex::decode(KEY).unwrap();
        let mut data = [0x5au8; 32];
        encrypt_blocks(&key, &mut data).unwrap();
        assert_eq!(data[..16], data[16..]);
        decrypt_blocks(&key, &mut data).unwrap();
        assert_eq!(data, [0x5au8; 32]);
    }
}
