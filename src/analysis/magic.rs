//! File-signature detection and inclusion filter

/// A file type signature: fixed bytes at a known offset.
#[derive(Debug, Clone, Copy)]
pub struct MagicSignature {
    pub name: &'static str,
    pub magic: &'static [u8],
    pub offset: usize,
}

/// Canonical signature table. First match wins.
pub const SIGNATURES: &[MagicSignature] = &[
    // Executables
    MagicSignature { name: "ELF", magic: &[0x7F, b'E', b'L', b'F'], offset: 0 },
    MagicSignature { name: "MZ", magic: &[b'M', b'Z'], offset: 0 }, // DOS/Windows PE
    MagicSignature { name: "MACH-O", magic: &[0xFE, 0xED, 0xFA, 0xCE], offset: 0 },
    MagicSignature { name: "MACH-O64", magic: &[0xFE, 0xED, 0xFA, 0xCF], offset: 0 },
    // Archives
    MagicSignature { name: "ZIP", magic: &[b'P', b'K', 0x03, 0x04], offset: 0 },
    MagicSignature { name: "GZIP", magic: &[0x1F, 0x8B], offset: 0 },
    MagicSignature { name: "RAR", magic: &[b'R', b'a', b'r', b'!', 0x1A, 0x07], offset: 0 },
    MagicSignature { name: "7Z", magic: &[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C], offset: 0 },
    MagicSignature { name: "TAR", magic: b"ustar", offset: 257 },
    MagicSignature { name: "XZ", magic: &[0xFD, b'7', b'z', b'X', b'Z', 0x00], offset: 0 },
    MagicSignature { name: "BZIP2", magic: b"BZh", offset: 0 },
    // Documents
    MagicSignature { name: "PDF", magic: b"%PDF", offset: 0 },
    // Images
    MagicSignature { name: "PNG", magic: &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], offset: 0 },
    MagicSignature { name: "JPEG", magic: &[0xFF, 0xD8, 0xFF], offset: 0 },
    MagicSignature { name: "GIF", magic: b"GIF8", offset: 0 },
    MagicSignature { name: "BMP", magic: b"BM", offset: 0 },
    MagicSignature { name: "WEBP", magic: b"RIFF", offset: 0 }, // RIFF container
    // Media
    MagicSignature { name: "MP3", magic: &[0xFF, 0xFB], offset: 0 },
    MagicSignature { name: "MP3_ID3", magic: b"ID3", offset: 0 },
    MagicSignature { name: "OGG", magic: b"OggS", offset: 0 },
    MagicSignature { name: "FLAC", magic: b"fLaC", offset: 0 },
    // Java
    MagicSignature { name: "CLASS", magic: &[0xCA, 0xFE, 0xBA, 0xBE], offset: 0 },
    MagicSignature { name: "DEX", magic: b"dex\n", offset: 0 },
    // Scripts (shebang)
    MagicSignature { name: "SCRIPT", magic: b"#!", offset: 0 },
    // Databases
    MagicSignature { name: "SQLITE", magic: b"SQLite format", offset: 0 },
];

/// Detected file type by magic bytes, or `"unknown"`.
pub fn detect_magic(data: &[u8]) -> &'static str {
    for sig in SIGNATURES {
        let end = sig.offset + sig.magic.len();
        if data.len() >= end && &data[sig.offset..end] == sig.magic {
            return sig.name;
        }
    }
    "unknown"
}

/// An empty filter admits everything; otherwise the detected name must be
/// in the filter set.
pub fn matches_magic_filter(data: &[u8], filter: &[String]) -> bool {
    if filter.is_empty() {
        return true;
    }
    let detected = detect_magic(data);
    filter.iter().any(|f| f == detected)
}
