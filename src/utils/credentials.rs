use rand::Rng;

/// Retries before giving up on a collision-free login id.
pub const MAX_LOGIN_ID_ATTEMPTS: u32 = 10;

const PASSWORD_LEN: usize = 10;
const PASSWORD_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%&*";

fn ascii_prefix(text: &str, len: usize) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(len)
        .collect::<String>()
        .to_lowercase()
}

/// Build a login id from an operator's name and area: the first name,
/// three letters of the last name, three letters of the area, and a
/// random three-digit suffix.
pub fn generate_login_id(name: &str, area: &str) -> String {
    let mut parts = name.split_whitespace();
    let first = ascii_prefix(parts.next().unwrap_or(""), usize::MAX);
    let last = ascii_prefix(parts.next_back().unwrap_or(""), 3);
    let area = ascii_prefix(area, 3);

    let digits: u32 = rand::rng().random_range(100..1000);
    format!("{first}{last}{area}{digits}")
}

/// Random 10-character password over letters, digits and `!@#$%&*`.
pub fn generate_password() -> String {
    let mut rng = rand::rng();
    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..PASSWORD_ALPHABET.len());
            PASSWORD_ALPHABET[idx] as char
        })
        .collect()
}
