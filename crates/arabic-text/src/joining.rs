//! Contextual joining for Arabic letters
//!
//! Replaces each Arabic letter with the presentation form (isolated, final,
//! initial or medial) dictated by its neighbours, and folds lam + alef pairs
//! into their mandatory ligatures.

const LAM: char = '\u{0644}';

/// How a letter connects to its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoiningType {
    /// Never connects (hamza, Latin, digits, spaces)
    NonJoining,
    /// Connects only to the preceding letter (alef, dal, reh, waw...)
    Right,
    /// Connects on both sides
    Dual,
    /// Forces a connection without a form of its own (tatweel, ZWJ)
    JoinCausing,
    /// Skipped when looking for neighbours (harakat and other marks)
    Transparent,
}

/// A letter with its four presentation forms
///
/// Order is isolated, final, initial, medial. Right-joining letters repeat
/// their isolated/final forms in the initial/medial slots.
#[derive(Debug, Clone, Copy)]
struct Letter {
    joining: JoiningType,
    forms: [char; 4],
}

const fn dual(isolated: char, fin: char, initial: char, medial: char) -> Letter {
    Letter {
        joining: JoiningType::Dual,
        forms: [isolated, fin, initial, medial],
    }
}

const fn right(isolated: char, fin: char) -> Letter {
    Letter {
        joining: JoiningType::Right,
        forms: [isolated, fin, isolated, fin],
    }
}

const fn non_joining(isolated: char) -> Letter {
    Letter {
        joining: JoiningType::NonJoining,
        forms: [isolated; 4],
    }
}

fn letter(c: char) -> Option<Letter> {
    let letter = match c {
        '\u{0621}' => non_joining('\u{FE80}'),
        '\u{0622}' => right('\u{FE81}', '\u{FE82}'),
        '\u{0623}' => right('\u{FE83}', '\u{FE84}'),
        '\u{0624}' => right('\u{FE85}', '\u{FE86}'),
        '\u{0625}' => right('\u{FE87}', '\u{FE88}'),
        '\u{0626}' => dual('\u{FE89}', '\u{FE8A}', '\u{FE8B}', '\u{FE8C}'),
        '\u{0627}' => right('\u{FE8D}', '\u{FE8E}'),
        '\u{0628}' => dual('\u{FE8F}', '\u{FE90}', '\u{FE91}', '\u{FE92}'),
        '\u{0629}' => right('\u{FE93}', '\u{FE94}'),
        '\u{062A}' => dual('\u{FE95}', '\u{FE96}', '\u{FE97}', '\u{FE98}'),
        '\u{062B}' => dual('\u{FE99}', '\u{FE9A}', '\u{FE9B}', '\u{FE9C}'),
        '\u{062C}' => dual('\u{FE9D}', '\u{FE9E}', '\u{FE9F}', '\u{FEA0}'),
        '\u{062D}' => dual('\u{FEA1}', '\u{FEA2}', '\u{FEA3}', '\u{FEA4}'),
        '\u{062E}' => dual('\u{FEA5}', '\u{FEA6}', '\u{FEA7}', '\u{FEA8}'),
        '\u{062F}' => right('\u{FEA9}', '\u{FEAA}'),
        '\u{0630}' => right('\u{FEAB}', '\u{FEAC}'),
        '\u{0631}' => right('\u{FEAD}', '\u{FEAE}'),
        '\u{0632}' => right('\u{FEAF}', '\u{FEB0}'),
        '\u{0633}' => dual('\u{FEB1}', '\u{FEB2}', '\u{FEB3}', '\u{FEB4}'),
        '\u{0634}' => dual('\u{FEB5}', '\u{FEB6}', '\u{FEB7}', '\u{FEB8}'),
        '\u{0635}' => dual('\u{FEB9}', '\u{FEBA}', '\u{FEBB}', '\u{FEBC}'),
        '\u{0636}' => dual('\u{FEBD}', '\u{FEBE}', '\u{FEBF}', '\u{FEC0}'),
        '\u{0637}' => dual('\u{FEC1}', '\u{FEC2}', '\u{FEC3}', '\u{FEC4}'),
        '\u{0638}' => dual('\u{FEC5}', '\u{FEC6}', '\u{FEC7}', '\u{FEC8}'),
        '\u{0639}' => dual('\u{FEC9}', '\u{FECA}', '\u{FECB}', '\u{FECC}'),
        '\u{063A}' => dual('\u{FECD}', '\u{FECE}', '\u{FECF}', '\u{FED0}'),
        '\u{0641}' => dual('\u{FED1}', '\u{FED2}', '\u{FED3}', '\u{FED4}'),
        '\u{0642}' => dual('\u{FED5}', '\u{FED6}', '\u{FED7}', '\u{FED8}'),
        '\u{0643}' => dual('\u{FED9}', '\u{FEDA}', '\u{FEDB}', '\u{FEDC}'),
        '\u{0644}' => dual('\u{FEDD}', '\u{FEDE}', '\u{FEDF}', '\u{FEE0}'),
        '\u{0645}' => dual('\u{FEE1}', '\u{FEE2}', '\u{FEE3}', '\u{FEE4}'),
        '\u{0646}' => dual('\u{FEE5}', '\u{FEE6}', '\u{FEE7}', '\u{FEE8}'),
        '\u{0647}' => dual('\u{FEE9}', '\u{FEEA}', '\u{FEEB}', '\u{FEEC}'),
        '\u{0648}' => right('\u{FEED}', '\u{FEEE}'),
        '\u{0649}' => right('\u{FEEF}', '\u{FEF0}'),
        '\u{064A}' => dual('\u{FEF1}', '\u{FEF2}', '\u{FEF3}', '\u{FEF4}'),
        // Persian and Urdu letters that show up in names
        '\u{067E}' => dual('\u{FB56}', '\u{FB57}', '\u{FB58}', '\u{FB59}'),
        '\u{0686}' => dual('\u{FB7A}', '\u{FB7B}', '\u{FB7C}', '\u{FB7D}'),
        '\u{0698}' => right('\u{FB8A}', '\u{FB8B}'),
        '\u{06A9}' => dual('\u{FB8E}', '\u{FB8F}', '\u{FB90}', '\u{FB91}'),
        '\u{06AF}' => dual('\u{FB92}', '\u{FB93}', '\u{FB94}', '\u{FB95}'),
        '\u{06CC}' => dual('\u{FBFC}', '\u{FBFD}', '\u{FBFE}', '\u{FBFF}'),
        _ => return None,
    };
    Some(letter)
}

/// Lam-alef ligature (isolated, final) for the alef following a lam
fn lam_alef(alef: char) -> Option<(char, char)> {
    match alef {
        '\u{0622}' => Some(('\u{FEF5}', '\u{FEF6}')),
        '\u{0623}' => Some(('\u{FEF7}', '\u{FEF8}')),
        '\u{0625}' => Some(('\u{FEF9}', '\u{FEFA}')),
        '\u{0627}' => Some(('\u{FEFB}', '\u{FEFC}')),
        _ => None,
    }
}

/// Check if a character is an Arabic combining mark
pub fn is_transparent(c: char) -> bool {
    matches!(c,
        '\u{0610}'..='\u{061A}' |
        '\u{064B}'..='\u{065F}' |
        '\u{0670}' |
        '\u{06D6}'..='\u{06DC}' |
        '\u{06DF}'..='\u{06E4}' |
        '\u{06E7}' | '\u{06E8}' |
        '\u{06EA}'..='\u{06ED}'
    )
}

/// Get the joining type of a character
pub fn joining_type(c: char) -> JoiningType {
    if is_transparent(c) {
        return JoiningType::Transparent;
    }
    if c == '\u{0640}' || c == '\u{200D}' {
        return JoiningType::JoinCausing;
    }
    letter(c)
        .map(|l| l.joining)
        .unwrap_or(JoiningType::NonJoining)
}

fn joins_to_next(c: char) -> bool {
    matches!(
        joining_type(c),
        JoiningType::Dual | JoiningType::JoinCausing
    )
}

fn joins_to_previous(c: char) -> bool {
    matches!(
        joining_type(c),
        JoiningType::Right | JoiningType::Dual | JoiningType::JoinCausing
    )
}

fn previous_significant(chars: &[char], index: usize) -> Option<char> {
    chars[..index]
        .iter()
        .rev()
        .copied()
        .find(|&c| !is_transparent(c))
}

fn next_significant(chars: &[char], index: usize) -> Option<char> {
    chars[index + 1..]
        .iter()
        .copied()
        .find(|&c| !is_transparent(c))
}

/// Replace Arabic letters with their contextual presentation forms
///
/// Input and output are both in logical order; only the code points change.
/// Characters outside the Arabic letter table pass through untouched.
pub fn reshape(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let Some(current) = letter(c) else {
            result.push(c);
            i += 1;
            continue;
        };

        let connects_back = current.joining != JoiningType::NonJoining
            && previous_significant(&chars, i).is_some_and(joins_to_next);

        if c == LAM {
            // Harakat between lam and alef still form the ligature; they follow it
            let alef_at = (i + 1..chars.len()).find(|&j| !is_transparent(chars[j]));
            if let Some((j, (isolated, fin))) =
                alef_at.and_then(|j| lam_alef(chars[j]).map(|forms| (j, forms)))
            {
                result.push(if connects_back { fin } else { isolated });
                result.extend(&chars[i + 1..j]);
                i = j + 1;
                continue;
            }
        }

        let connects_forward = current.joining == JoiningType::Dual
            && next_significant(&chars, i).is_some_and(joins_to_previous);

        let form = match (connects_back, connects_forward) {
            (false, false) => current.forms[0],
            (true, false) => current.forms[1],
            (false, true) => current.forms[2],
            (true, true) => current.forms[3],
        };
        result.push(form);
        i += 1;
    }

    result
}
