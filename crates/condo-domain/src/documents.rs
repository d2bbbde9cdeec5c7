//! Brazilian document helpers: CNPJ, CPF, CEP, phone numbers, vehicle plates
//! and boleto digitable lines.
//!
//! Forms accept these values with or without punctuation
//! (`11.222.333/0001-81`, `01310-100`); the API only ever receives digits.

/// Keeps ASCII digits only.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// Checks length and both check digits of a company registration number.
pub fn is_valid_cnpj(value: &str) -> bool {
    if !has_document_chars(value, &['.', '/', '-', ' ']) {
        return false;
    }
    let digits = to_digits(value);
    if digits.len() != 14 || all_same(&digits) {
        return false;
    }
    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let first = cnpj_check_digit(&digits[..12], &FIRST);
    let second = cnpj_check_digit(&digits[..13], &SECOND);
    digits[12] == first && digits[13] == second
}

/// Checks length and both check digits of an individual taxpayer number.
pub fn is_valid_cpf(value: &str) -> bool {
    if !has_document_chars(value, &['.', '-', ' ']) {
        return false;
    }
    let digits = to_digits(value);
    if digits.len() != 11 || all_same(&digits) {
        return false;
    }
    let first = cpf_check_digit(&digits[..9]);
    let second = cpf_check_digit(&digits[..10]);
    digits[9] == first && digits[10] == second
}

/// Postal codes carry exactly eight digits.
pub fn is_valid_cep(value: &str) -> bool {
    has_document_chars(value, &['-', '.', ' ']) && digits_only(value).len() == 8
}

/// Landlines have 10 digits (area code + 8), mobiles 11.
pub fn is_valid_phone(value: &str) -> bool {
    let len = digits_only(value).len();
    len == 10 || len == 11
}

/// Upper-cased plate without separators, in either the legacy (`ABC1234`) or
/// the Mercosul (`ABC1D23`) layout.
pub fn normalize_plate(value: &str) -> Option<String> {
    if !has_document_chars_or_letters(value, &['-', ' ']) {
        return None;
    }
    let plate: String = value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    let bytes = plate.as_bytes();
    let layout = bytes.len() == 7
        && bytes[..3].iter().all(u8::is_ascii_uppercase)
        && bytes[3].is_ascii_digit()
        && bytes[4].is_ascii_alphanumeric()
        && bytes[5..].iter().all(u8::is_ascii_digit);
    layout.then_some(plate)
}

/// Bank boletos carry 47 digits with a mod-10 check digit closing each of the
/// first three fields. Utility slips carry 48 digits and are length-checked.
pub fn is_valid_digitable_line(value: &str) -> bool {
    if !has_document_chars(value, &['.', ' ', '-']) {
        return false;
    }
    let digits = to_digits(value);
    match digits.len() {
        47 => [(0, 9), (10, 20), (21, 31)]
            .iter()
            .all(|&(start, check)| mod10_check_digit(&digits[start..check]) == digits[check]),
        48 => true,
        _ => false,
    }
}

const STATE_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Returns the upper-cased federative unit code when `value` names one.
pub fn normalize_state_code(value: &str) -> Option<String> {
    let upper = value.trim().to_ascii_uppercase();
    STATE_CODES
        .iter()
        .any(|code| *code == upper)
        .then_some(upper)
}

/// Digits plus the given separators, nothing else.
fn has_document_chars(value: &str, separators: &[char]) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_digit() || separators.contains(&ch))
}

fn has_document_chars_or_letters(value: &str, separators: &[char]) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || separators.contains(&ch))
}

fn to_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|ch| ch.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rest = sum % 11;
    if rest < 2 {
        0
    } else {
        11 - rest
    }
}

fn mod10_check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, d)| {
            let product = d * if idx % 2 == 0 { 2 } else { 1 };
            product / 10 + product % 10
        })
        .sum();
    (10 - sum % 10) % 10
}

fn cpf_check_digit(digits: &[u32]) -> u32 {
    let start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(idx, d)| d * (start - idx as u32))
        .sum();
    (sum * 10) % 11 % 10
}
