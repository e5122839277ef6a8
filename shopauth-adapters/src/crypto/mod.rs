pub mod token_cipher;

pub use token_cipher::{Envelope, TokenCipher, TokenCipherError, CIPHER_KEY_LEN};
