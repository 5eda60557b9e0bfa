//! Properties of the generated literals, checked with a decoder that follows
//! C++ escape rules: `\x` takes every following hex digit, octal escapes take
//! up to three digits.

use embedgen_core::encode::TextLines;
use embedgen_core::{
    generate, BinaryEncoder, ChunkLayout, ChunkPlanner, GeneratorConfig, IdentifierRegistry,
    IdentifierSanitizer, LiteralChunk,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

/// Decodes a literal body, failing if a hex escape would exceed one byte
fn decode_literal(text: &str) -> Result<Vec<u8>, String> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let kind = *bytes.get(i + 1).ok_or("dangling backslash")?;
        i += 2;
        match kind {
            b'x' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                    i += 1;
                }
                let digits = &text[start..i];
                let value = u32::from_str_radix(digits, 16)
                    .map_err(|_| format!("bad hex escape at {start}"))?;
                if value > 0xFF || digits.len() > 2 {
                    return Err(format!("hex escape \\x{digits} runs past one byte"));
                }
                out.push(value as u8);
            }
            b'0'..=b'7' => {
                let start = i - 1;
                while i < bytes.len() && i - start < 3 && (b'0'..=b'7').contains(&bytes[i]) {
                    i += 1;
                }
                let value = u32::from_str_radix(&text[start..i], 8).map_err(|e| e.to_string())?;
                out.push(value as u8);
            }
            b'n' => out.push(b'\n'),
            b'"' | b'\\' | b'\'' | b'?' => out.push(kind),
            other => return Err(format!("unexpected escape \\{}", other as char)),
        }
    }
    Ok(out)
}

fn decode_layout(layout: &ChunkLayout) -> Vec<u8> {
    layout
        .chunks()
        .iter()
        .flat_map(|chunk: &LiteralChunk| decode_literal(&chunk.text).unwrap())
        .collect()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[test]
fn null_then_digit_stays_two_bytes() {
    let layout = ChunkPlanner::default().plan_binary(BinaryEncoder::new(&[0x00, 0x31]));
    assert_eq!(layout.chunks()[0].text, "\\x00\\x31");
    assert_eq!(decode_layout(&layout), [0x00, 0x31]);
}

#[test]
fn header_for_large_zero_file() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("zeros.bin"), vec![0u8; 20_000]).unwrap();

    let header = generate(GeneratorConfig::new(root.path())).unwrap();
    let contents = &header.contents;
    assert!(contents.contains("constexpr int zeros_bin__blob_chunks = 2;"));
    assert!(contents.contains("constexpr int zeros_bin_size_0 = 16300;"));
    assert!(contents.contains("constexpr int zeros_bin_size_1 = 3700;"));
    assert!(contents.contains("constexpr char zeros_bin__blob_chunk_0[16301] = \"\\x00\\x00"));
    assert!(contents.contains("constexpr char zeros_bin__blob_chunk_1[3701] = \""));
    assert!(contents.contains("zeros_bin_name = std::string_view(\"zeros.bin\");"));
}

#[test]
fn header_for_text_and_collisions() {
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("docs")).unwrap();
    fs::write(root.path().join("a.b"), "1").unwrap();
    fs::write(root.path().join("a-b"), "2").unwrap();
    fs::write(root.path().join("docs/ascii_readme.md"), "# Title\r\n\"quoted\" \\ path\r\n").unwrap();

    let header = generate(GeneratorConfig::new(root.path()).max_literal_len(100)).unwrap();
    let contents = &header.contents;
    assert!(contents.contains("a_b_name"));
    assert!(contents.contains("a_b__name"));
    assert!(contents.contains(
        "docs_readme_md = std::string_view(\"# Title\\n\\\"quoted\\\" \\\\ path\");"
    ));
    assert!(contents.contains("docs_readme_md_name = std::string_view(\"docs/readme.md\");"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn binary_round_trip_and_bound(
        data in prop::collection::vec(any::<u8>(), 0..1500),
        max in 1usize..400,
    ) {
        let layout = ChunkPlanner::new(max).unwrap().plan_binary(BinaryEncoder::new(&data));
        let mut decoded = Vec::new();
        for chunk in layout.chunks() {
            let bytes = decode_literal(&chunk.text).map_err(TestCaseError::fail)?;
            prop_assert!(chunk.len <= max);
            prop_assert_eq!(bytes.len(), chunk.len);
            decoded.extend(bytes);
        }
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn binary_hex_escapes_never_followed_by_digit(
        data in prop::collection::vec(
            prop_oneof![Just(0u8), Just(b'a'), Just(b'F'), Just(b'7'), Just(b'g'), any::<u8>()],
            0..300,
        ),
    ) {
        let layout = ChunkPlanner::default().plan_binary(BinaryEncoder::new(&data));
        let text = layout.chunks()[0].text.as_bytes();
        let mut i = 0;
        while i < text.len() {
            if text[i] == b'\\' {
                if text[i + 1] == b'x' {
                    if let Some(next) = text.get(i + 4) {
                        prop_assert!(!next.is_ascii_hexdigit());
                    }
                    i += 4;
                } else {
                    i += 2;
                }
            } else {
                i += 1;
            }
        }
    }

    #[test]
    fn text_round_trip_and_bound(
        lines in prop::collection::vec("[ -~\t]{0,60}", 0..20),
        max in 1usize..80,
    ) {
        let content = lines.join("\n");
        let text = TextLines::decode(content.as_bytes());
        let layout = ChunkPlanner::new(max).unwrap().plan_text(&text.lines);

        for chunk in layout.chunks() {
            prop_assert!(chunk.len <= max);
        }
        let decoded = String::from_utf8(decode_layout(&layout)).unwrap();
        prop_assert_eq!(&decoded, &text.lines.join("\n"));
        if !content.ends_with('\n') {
            prop_assert_eq!(decoded, content);
        }
    }

    #[test]
    fn identifiers_valid_and_unique(
        paths in prop::collection::vec("[a-zA-Z0-9 ._/+-]{1,16}", 1..40),
    ) {
        let sanitizer = IdentifierSanitizer::default();
        let mut registry = IdentifierRegistry::new();
        let mut seen = HashSet::new();
        for path in &paths {
            let named = sanitizer.sanitize(&mut registry, path);
            prop_assert!(is_identifier(&named.identifier), "{}", named.identifier);
            prop_assert!(seen.insert(named.identifier));
        }
        prop_assert_eq!(registry.len(), paths.len());
    }
}
