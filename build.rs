#![recursion_limit = "512"]

use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        rustcrypto_aead_base: {
            any(
                feature = "rustcrypto-aes-gcm"
            )
        },
        rustcrypto_sign_base: {
            any(
                feature = "rustcrypto-ecdsa"
            )
        },
        rustcrypto_mac_base: {
            any(
                feature = "rustcrypto-hmac"
            )
        },
        rustcrypto_kdf_base: {
            any(
                feature = "rustcrypto-hkdf"
            )
        },
        rustcrypto_key_agreement_base: {
            any(
                feature = "rustcrypto-ecdh"
            )
        },
        rustcrypto_base: {
            any(
                rustcrypto_aead_base,
                rustcrypto_sign_base,
                rustcrypto_mac_base,
                rustcrypto_kdf_base,
                rustcrypto_key_agreement_base
            )
        },
        rustcrypto_full: {
            all(
                rustcrypto_aead_base,
                rustcrypto_sign_base,
                rustcrypto_mac_base,
                rustcrypto_kdf_base,
                rustcrypto_key_agreement_base
            )
        },
    }
}
