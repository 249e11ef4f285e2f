// The tracker's output character set is CP437. Everything typed through the
// composition machines has to land on a glyph from this table.

const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

// two typed characters -> one glyph, looked up in either order
const DIGRAPHS: &[(char, char, char)] = &[
    ('C', ',', 'Ç'), ('u', ':', 'ü'), ('e', '\'', 'é'), ('a', '>', 'â'),
    ('a', ':', 'ä'), ('a', '!', 'à'), ('a', 'a', 'å'), ('c', ',', 'ç'),
    ('e', '>', 'ê'), ('e', ':', 'ë'), ('e', '!', 'è'), ('i', ':', 'ï'),
    ('i', '>', 'î'), ('i', '!', 'ì'), ('A', ':', 'Ä'), ('A', 'A', 'Å'),
    ('E', '\'', 'É'), ('a', 'e', 'æ'), ('A', 'E', 'Æ'), ('o', '>', 'ô'),
    ('o', ':', 'ö'), ('o', '!', 'ò'), ('u', '>', 'û'), ('u', '!', 'ù'),
    ('y', ':', 'ÿ'), ('O', ':', 'Ö'), ('U', ':', 'Ü'), ('C', 't', '¢'),
    ('P', 'd', '£'), ('Y', 'e', '¥'), ('P', 't', '₧'), ('f', '2', 'ƒ'),
    ('a', '\'', 'á'), ('i', '\'', 'í'), ('o', '\'', 'ó'), ('u', '\'', 'ú'),
    ('n', '?', 'ñ'), ('N', '?', 'Ñ'), ('-', 'a', 'ª'), ('-', 'o', 'º'),
    ('?', 'I', '¿'), ('N', 'O', '¬'), ('1', '2', '½'), ('1', '4', '¼'),
    ('!', 'I', '¡'), ('<', '<', '«'), ('>', '>', '»'), ('s', 's', 'ß'),
    ('a', '*', 'α'), ('G', '*', 'Γ'), ('p', '*', 'π'), ('S', '*', 'Σ'),
    ('s', '*', 'σ'), ('M', 'y', 'µ'), ('t', '*', 'τ'), ('F', '*', 'Φ'),
    ('H', '*', 'Θ'), ('W', '*', 'Ω'), ('d', '*', 'δ'), ('0', '0', '∞'),
    ('f', '*', 'φ'), ('e', '*', 'ε'), ('3', '=', '≡'), ('+', '-', '±'),
    ('>', '=', '≥'), ('=', '<', '≤'), ('-', ':', '÷'), ('?', '2', '≈'),
    ('D', 'G', '°'), ('.', 'M', '·'), ('R', 'T', '√'), ('2', 'S', '²'),
];

pub fn cp437_to_char(byte: u8) -> char {
    match byte {
        0x20..=0x7e => byte as char,
        0x80..=0xff => CP437_HIGH[(byte - 0x80) as usize],
        _ => '?',
    }
}

pub fn unicode_to_cp437(cp: u32) -> Option<u8> {
    if (0x20..=0x7e).contains(&cp) {
        return Some(cp as u8);
    }
    let ch = char::from_u32(cp)?;
    CP437_HIGH.iter().position(|&c| c == ch).map(|i| 0x80 + i as u8)
}

pub fn char_digraph(a: char, b: char) -> Option<char> {
    DIGRAPHS
        .iter()
        .find(|&&(x, y, _)| (x, y) == (a, b) || (y, x) == (a, b))
        .map(|&(_, _, out)| out)
}
