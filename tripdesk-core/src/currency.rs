/// Picks a currency code out of free-form text.
///
/// Returns the first whitespace-delimited token that is exactly three
/// uppercase letters. Any earlier acronym (a country, an exchange) wins over
/// the real currency code; callers must treat the result as a guess.
pub fn extract_currency_code(text: &str) -> Option<&str> {
    text.split_whitespace().find(|token| is_code_like(token))
}

fn is_code_like(token: &str) -> bool {
    token.chars().count() == 3 && token.chars().all(char::is_uppercase)
}
