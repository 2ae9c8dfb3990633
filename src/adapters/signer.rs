use crate::domain::ports::EventSigner;
use crate::utils::error::{GachaError, Result};
use bech32::{Bech32, Hrp};
use secp256k1::{All, Keypair, Message, Secp256k1, SecretKey, XOnlyPublicKey};

const NSEC_HRP: &str = "nsec";
const NPUB_HRP: &str = "npub";

/// BIP-340 Schnorr signer over secp256k1, as used by Nostr.
pub struct NostrSigner {
    secp: Secp256k1<All>,
    keypair: Keypair,
    public_key: XOnlyPublicKey,
}

impl NostrSigner {
    /// Accepts a bech32 `nsec1...` key or 64 hex characters.
    pub fn from_secret(secret: &str) -> Result<Self> {
        let bytes = decode_secret(secret.trim())?;
        let secret_key = SecretKey::from_slice(&bytes).map_err(|e| GachaError::KeyError {
            message: format!("invalid secret key: {}", e),
        })?;

        let secp = Secp256k1::new();
        let keypair = Keypair::from_secret_key(&secp, &secret_key);
        let (public_key, _parity) = keypair.x_only_public_key();

        Ok(Self {
            secp,
            keypair,
            public_key,
        })
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Bech32 `npub1...` form of the public key.
    pub fn npub(&self) -> Result<String> {
        let hrp = Hrp::parse(NPUB_HRP).map_err(|e| GachaError::KeyError {
            message: e.to_string(),
        })?;
        bech32::encode::<Bech32>(hrp, &self.public_key.serialize()).map_err(|e| {
            GachaError::KeyError {
                message: format!("cannot encode npub: {}", e),
            }
        })
    }
}

impl EventSigner for NostrSigner {
    fn public_key(&self) -> Result<String> {
        Ok(self.public_key_hex())
    }

    fn sign(&self, digest: &[u8; 32]) -> Result<String> {
        let message = Message::from_digest(*digest);
        let aux_rand: [u8; 32] = rand::random();
        let signature = self
            .secp
            .sign_schnorr_with_aux_rand(&message, &self.keypair, &aux_rand);

        self.secp
            .verify_schnorr(&signature, &message, &self.public_key)
            .map_err(|e| GachaError::SigningError {
                message: e.to_string(),
            })?;

        Ok(hex::encode(signature.serialize()))
    }
}

fn decode_secret(secret: &str) -> Result<[u8; 32]> {
    let bytes = if secret.len() == 64 && secret.chars().all(|c| c.is_ascii_hexdigit()) {
        hex::decode(secret).map_err(|e| GachaError::KeyError {
            message: format!("cannot decode hex secret: {}", e),
        })?
    } else {
        let (hrp, data) = bech32::decode(secret).map_err(|e| GachaError::KeyError {
            message: format!("secret is neither nsec nor hex: {}", e),
        })?;
        if !hrp.as_str().eq_ignore_ascii_case(NSEC_HRP) {
            return Err(GachaError::KeyError {
                message: format!("unexpected bech32 prefix: {}", hrp),
            });
        }
        data
    };

    bytes.try_into().map_err(|b: Vec<u8>| GachaError::KeyError {
        message: format!("secret key must be 32 bytes, got {}", b.len()),
    })
}
