use rand::Rng;

/// Number of digits in an issued passcode
pub const OTP_LENGTH: usize = 6;

/// Generate a numeric passcode, each digit drawn independently.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        for _ in 0..100 {
            let code = generate_code(OTP_LENGTH);
            assert_eq!(code.len(), OTP_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_code(OTP_LENGTH)).collect();
        assert!(codes.len() > 40);
    }
}
