//! The two call shapes.
//!
//! Both shapes share one derivation path and differ only in how the
//! password and salt become bytes and how the key is handed back.

use std::borrow::Cow;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::backend::ScryptBackend;
use crate::error::{Field, Result, ScryptError};
use crate::gateway::{DerivationRequest, DerivedKey, Gateway};
use crate::options::ScryptOptions;

/// Standard alphabet; trailing `=` padding is optional on decode.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How a call shape turns its textual inputs into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Standard base64, padding optional. Embedded whitespace is ignored.
    Base64,
    /// The UTF-8 bytes of the string.
    Utf8,
}

impl Input {
    pub fn decode<'a>(&self, value: &'a str, field: Field) -> Result<Cow<'a, [u8]>> {
        match self {
            Input::Utf8 => Ok(Cow::Borrowed(value.as_bytes())),
            Input::Base64 => {
                let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                LENIENT
                    .decode(compact)
                    .map(Cow::Owned)
                    .map_err(|e| ScryptError::Encoding {
                        field,
                        reason: e.to_string(),
                    })
            }
        }
    }
}

/// How a call shape hands back the derived key.
pub trait Output: Sized {
    fn encode(key: DerivedKey) -> Self;
}

impl Output for Vec<u8> {
    fn encode(key: DerivedKey) -> Self {
        key.to_vec()
    }
}

impl Output for DerivedKey {
    fn encode(key: DerivedKey) -> Self {
        key
    }
}

/// Lowercase hex string.
impl Output for String {
    fn encode(key: DerivedKey) -> Self {
        key.to_hex()
    }
}

impl<B: ScryptBackend> Gateway<B> {
    /// Decodes `password` and `salt` with `input`, derives, and encodes the
    /// key as `O`.
    pub fn call<O: Output>(
        &self,
        input: Input,
        password: &str,
        salt: &str,
        options: &ScryptOptions,
        progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<O> {
        let password = input.decode(password, Field::Password)?;
        let salt = input.decode(salt, Field::Salt)?;
        let request = DerivationRequest::new(&password, &salt, *options);
        self.derive(&request, progress).map(O::encode)
    }

    /// Binary-oriented call: base64 password and salt in, raw key bytes out.
    pub fn scrypt_binary(
        &self,
        password_b64: &str,
        salt_b64: &str,
        options: &ScryptOptions,
        progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<Vec<u8>> {
        self.call(Input::Base64, password_b64, salt_b64, options, progress)
    }

    /// Text-oriented call: UTF-8 password and salt in, lowercase hex out.
    pub fn scrypt_text(
        &self,
        password: &str,
        salt: &str,
        options: &ScryptOptions,
        progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<String> {
        self.call(Input::Utf8, password, salt, options, progress)
    }
}

/// [`Gateway::scrypt_binary`] on the default backend.
pub fn scrypt_binary(
    password_b64: &str,
    salt_b64: &str,
    options: &ScryptOptions,
    progress: Option<&mut dyn FnMut(f64)>,
) -> Result<Vec<u8>> {
    Gateway::new().scrypt_binary(password_b64, salt_b64, options, progress)
}

/// [`Gateway::scrypt_text`] on the default backend.
pub fn scrypt_text(
    password: &str,
    salt: &str,
    options: &ScryptOptions,
    progress: Option<&mut dyn FnMut(f64)>,
) -> Result<String> {
    Gateway::new().scrypt_text(password, salt, options, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn fast() -> ScryptOptions {
        ScryptOptions::new(16, 1, 1, 32)
    }

    #[test]
    fn base64_input_tolerates_line_breaks() {
        let bytes = Input::Base64
            .decode("c2FsdHNh\nbHQ=\n", Field::Salt)
            .unwrap();
        assert_eq!(&*bytes, b"saltsalt");
    }

    #[test]
    fn base64_padding_is_optional() {
        let padded = Input::Base64.decode("cGFzc3dvcmQ=", Field::Password).unwrap();
        let unpadded = Input::Base64.decode("cGFzc3dvcmQ", Field::Password).unwrap();
        assert_eq!(&*padded, b"password");
        assert_eq!(padded, unpadded);
    }

    #[test]
    fn unpadded_and_padded_inputs_derive_the_same_key() {
        let options = ScryptOptions::new(16, 1, 1, 16);
        let unpadded = scrypt_binary("cGFzc3dvcmQ", "c2FsdHNhbHQ", &options, None).unwrap();
        let padded = scrypt_binary("cGFzc3dvcmQ=", "c2FsdHNhbHQ=", &options, None).unwrap();
        assert_eq!(unpadded, padded);
        assert_eq!(unpadded.len(), 16);
    }

    #[test]
    fn bad_base64_names_the_field() {
        let err = Input::Base64.decode("***", Field::Password).unwrap_err();
        assert!(matches!(
            err,
            ScryptError::Encoding {
                field: Field::Password,
                ..
            }
        ));
    }

    #[test]
    fn text_shape_returns_lowercase_hex() {
        let hex = scrypt_text("password", "saltsalt", &fast(), None).unwrap();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn shapes_agree_on_the_same_bytes() {
        let text = scrypt_text("password", "saltsalt", &fast(), None).unwrap();
        let binary = scrypt_binary(
            &STANDARD.encode("password"),
            &STANDARD.encode("saltsalt"),
            &fast(),
            None,
        )
        .unwrap();
        assert_eq!(hex::decode(text).unwrap(), binary);
    }

    #[test]
    fn empty_base64_is_an_empty_password() {
        let err = scrypt_binary("", &STANDARD.encode("saltsalt"), &fast(), None).unwrap_err();
        assert_eq!(err.validation(), Some(&crate::ValidationError::EmptyPassword));
    }
}
