//! Metrics and text encoding for the standard Helvetica fonts.
//!
//! Reports only use the two Helvetica faces every PDF reader ships with, so no
//! font files are embedded. Text is written with the WinAnsi encoding, one
//! byte per glyph.

use unicode_segmentation::UnicodeSegmentation;

use crate::report::style::Font;

/// Glyph widths of Helvetica for the printable ASCII range, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Glyph widths of Helvetica-Bold for the printable ASCII range, in 1/1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Used for glyphs outside of the ASCII range, close to the average letter width.
const FALLBACK_WIDTH: u16 = 556;

const REPLACEMENT: u8 = b'?';

/// Rounding slack when checking whether text fits, in points.
const WIDTH_TOLERANCE: f32 = 0.01;

/// Map a single character to its WinAnsi code.
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => u8::try_from(u32::from(c)).ok(),
        '\t' | '\n' | '\r' => Some(b' '),
        '€' => Some(0x80),
        '…' => Some(0x85),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        _ => None,
    }
}

/// Encode `text` as WinAnsi with one byte per user-perceived character.
///
/// Characters the encoding cannot represent, including letters written with
/// combining marks, become '?'.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.graphemes(true)
        .map(|grapheme| {
            let mut chars = grapheme.chars();

            match (chars.next(), chars.next()) {
                (Some(c), None) => win_ansi_byte(c).unwrap_or(REPLACEMENT),
                _ => REPLACEMENT,
            }
        })
        .collect()
}

fn glyph_width(byte: u8, font: Font) -> u16 {
    let widths = match font {
        Font::Helvetica => &HELVETICA_WIDTHS,
        Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
    };

    match byte {
        b' '..=b'~' => widths[usize::from(byte - b' ')],
        0x85 | 0x97 => 1000,
        0x91 | 0x92 => 278,
        0x93 | 0x94 => 500,
        0x95 => 350,
        0xA0 => 278,
        _ => FALLBACK_WIDTH,
    }
}

/// The width of WinAnsi encoded `text` set in `font` at `font_size` points.
pub fn text_width(text: &[u8], font: Font, font_size: f32) -> f32 {
    let units: u32 = text
        .iter()
        .map(|&byte| u32::from(glyph_width(byte, font)))
        .sum();

    units as f32 * font_size / 1000.0
}

/// Shorten `text` so that it fits within `max_width`, marking the cut with "...".
pub fn truncate_to_width(text: &[u8], font: Font, font_size: f32, max_width: f32) -> Vec<u8> {
    if text_width(text, font, font_size) <= max_width + WIDTH_TOLERANCE {
        return text.to_vec();
    }

    const ELLIPSIS: &[u8] = b"...";
    let ellipsis_width = text_width(ELLIPSIS, font, font_size);
    let mut width = 0.0;
    let mut truncated = Vec::with_capacity(text.len());

    for &byte in text {
        let next = text_width(&[byte], font, font_size);

        if width + next + ellipsis_width > max_width {
            break;
        }

        width += next;
        truncated.push(byte);
    }

    truncated.extend_from_slice(ELLIPSIS);
    truncated
}
