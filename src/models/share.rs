//! Share links
//!
//! A share link carries the code in its `code` query parameter as
//! `base64(encodeURIComponent(code))`, matching what the web playground
//! produces, so links can travel in both directions.

use anyhow::{Context, Result, anyhow, bail};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::prelude::*;

use crate::models::storage::{CODE_KEY, StorageManager};

const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode_payload(code: &str) -> String {
    BASE64_STANDARD.encode(encode_uri_component(code))
}

pub fn decode_payload(payload: &str) -> Result<String> {
    // Query-string decoding may have turned `+` into a space
    let normalized: String = payload
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();

    let bytes = LENIENT_BASE64
        .decode(normalized.as_bytes())
        .context("Share payload is not valid base64")?;
    let escaped = String::from_utf8(bytes).context("Share payload is not text")?;

    decode_uri_component(&escaped)
}

pub fn share_url(base_url: &str, code: &str) -> String {
    format!("{}?code={}", base_url, encode_payload(code))
}

/// Percent-encodes everything except the characters `encodeURIComponent`
/// leaves alone
pub fn encode_uri_component(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

pub fn decode_uri_component(input: &str) -> Result<String> {
    let bytes = percent_decode(input, false)?;
    String::from_utf8(bytes).map_err(|_| anyhow!("Malformed percent-encoded UTF-8"))
}

fn percent_decode(input: &str, plus_as_space: bool) -> Result<Vec<u8>> {
    let raw = input.as_bytes();
    let mut decoded = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        match raw[i] {
            b'%' => {
                let hex = raw
                    .get(i + 1..i + 3)
                    .filter(|pair| pair.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|pair| std::str::from_utf8(pair).ok())
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok());
                match hex {
                    Some(byte) => decoded.push(byte),
                    None => bail!("Malformed percent escape at offset {}", i),
                }
                i += 3;
            }
            b'+' if plus_as_space => {
                decoded.push(b' ');
                i += 1;
            }
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }

    Ok(decoded)
}

/// Value of the `code` query parameter, decoded the way a browser's
/// `URLSearchParams` would
pub fn code_param(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let (_, query) = without_fragment.split_once('?')?;

    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != "code" {
            return None;
        }
        percent_decode(value, true)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    })
}

/// The URL with its query string and fragment removed
pub fn clean_url(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedImport {
    pub code: String,
    pub cleaned_url: String,
}

/// One-shot import of a shared link into the persisted code buffer.
///
/// Links without a `code` parameter and payloads that fail to decode are
/// ignored (the latter logged); the existing buffer stays as it was.
pub fn import_shared_code(storage: &mut StorageManager, url: &str) -> Option<SharedImport> {
    let payload = code_param(url)?;

    let code = match decode_payload(&payload) {
        Ok(code) => code,
        Err(e) => {
            log::warn!("Failed to decode shared code: {:#}", e);
            return None;
        }
    };

    if let Err(e) = storage.set(CODE_KEY, &code) {
        log::warn!("Failed to store shared code: {:#}", e);
        return None;
    }

    let cleaned_url = clean_url(url).to_string();
    log::info!("Imported shared code from {}", cleaned_url);

    Some(SharedImport { code, cleaned_url })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_browser_encoding() {
        // btoa(encodeURIComponent("hi")) and btoa(encodeURIComponent("é"))
        assert_eq!(encode_payload("hi"), "aGk=");
        assert_eq!(encode_payload("é"), "JUMzJUE5");
        assert_eq!(encode_uri_component("a b&c=d/(x)!"), "a%20b%26c%3Dd%2F(x)!");
    }

    #[test]
    fn payload_round_trips_any_text() {
        for code in [
            "",
            "console.log(\"hi\"); 42",
            "const s = `naïve — 日本語 🚀`;\n\treturn s;",
            "a+b=c?d&e#f%20",
        ] {
            assert_eq!(decode_payload(&encode_payload(code)).unwrap(), code);
        }
    }

    #[test]
    fn share_url_round_trips_through_query_parsing() {
        let code = "let x = [1, 2, 3].map(n => n * 2);\nconsole.log(x, 'ü');";
        let url = share_url("http://localhost:3000", code);
        assert!(url.starts_with("http://localhost:3000?code="));

        let payload = code_param(&url).unwrap();
        assert_eq!(decode_payload(&payload).unwrap(), code);
    }

    #[test]
    fn plus_signs_survive_form_decoding() {
        // "~~~" lands on base64 index 62, which is '+'
        let code = "~~~>~~~>";
        let payload = encode_payload(code);
        assert!(payload.contains('+'));
        let mangled = payload.replace('+', " ");
        assert_eq!(decode_payload(&mangled).unwrap(), code);
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(decode_payload("***").is_err());
        // base64 of "%E0%A4%A"
        assert!(decode_payload(&BASE64_STANDARD.encode("%E0%A4%A")).is_err());
        assert!(decode_uri_component("%FF").is_err());
    }

    #[test]
    fn percent_escapes_need_two_hex_digits() {
        assert!(decode_uri_component("%+1").is_err());
        assert!(decode_uri_component("%-1").is_err());
        assert!(decode_uri_component("a%2").is_err());
        assert_eq!(decode_uri_component("%2b%2B").unwrap(), "++");
    }

    #[test]
    fn code_param_and_clean_url() {
        let url = "https://play.example/app?theme=dark&code=aGk%3D#top";
        assert_eq!(code_param(url).as_deref(), Some("aGk="));
        assert_eq!(clean_url(url), "https://play.example/app");
        assert_eq!(code_param("https://play.example/?theme=dark"), None);
        assert_eq!(code_param("https://play.example/"), None);
    }

    #[test]
    fn import_overwrites_buffer() {
        let mut storage = StorageManager::in_memory();
        storage.set(CODE_KEY, "old").unwrap();

        let url = share_url("http://localhost:3000", "new();");
        let imported = import_shared_code(&mut storage, &url).unwrap();

        assert_eq!(imported.code, "new();");
        assert_eq!(imported.cleaned_url, "http://localhost:3000");
        assert_eq!(storage.get(CODE_KEY).as_deref(), Some("new();"));
    }

    #[test]
    fn failed_import_leaves_buffer_untouched() {
        let mut storage = StorageManager::in_memory();
        storage.set(CODE_KEY, "old").unwrap();

        assert!(import_shared_code(&mut storage, "http://x/?code=%%%").is_none());
        assert!(import_shared_code(&mut storage, "http://x/?other=1").is_none());
        assert_eq!(storage.get(CODE_KEY).as_deref(), Some("old"));
    }
}
