use super::{AuthError, AuthResult};

pub(super) fn hash(plain: &str, cost: u32) -> AuthResult<String> {
    Ok(bcrypt::hash(plain, cost)?)
}

pub(super) fn verify(plain: &str, hash: &str) -> AuthResult<()> {
    if bcrypt::verify(plain, hash)? {
        Ok(())
    } else {
        Err(AuthError::PasswordMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifies() {
        let first = hash("pw", 4).unwrap();
        let second = hash("pw", 4).unwrap();
        assert_ne!(first, second);
        assert_ne!(first, "pw");

        verify("pw", &first).unwrap();
        assert!(matches!(verify("nope", &first), Err(AuthError::PasswordMismatch)));
    }

    #[test]
    fn garbage_hash_fails_closed() {
        assert!(verify("pw", "not-a-bcrypt-hash").is_err());
    }
}
